use regsweep_core::{MemoryStore, RegistryValue};

pub const VENDOR: &str = "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor";
pub const APP: &str = "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor\\App";
pub const CACHE: &str = "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor\\App\\Cache";
pub const TOOLS: &str = "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor\\Tools";
pub const EMPTY: &str = "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor\\Empty";

/// Create a new empty store for testing
#[allow(dead_code)]
pub fn new_store() -> MemoryStore {
    MemoryStore::new()
}

/// Build a small vendor tree
///
/// ```text
/// Vendor            @="Vendor Inc", Count=dword:255
///   App             Version="1.0", Path="C:\App", InstallDate=dword
///     Cache         Size=qword, Blob=binary
///   Tools           Version="2.0", Env=expand, Names=multi
///   Empty
/// ```
#[allow(dead_code)]
pub fn vendor_store() -> MemoryStore {
    let mut store = MemoryStore::new();

    set(&mut store, VENDOR, "", RegistryValue::String("Vendor Inc".to_string()));
    set(&mut store, VENDOR, "Count", RegistryValue::DWord(255));

    set(&mut store, APP, "Version", RegistryValue::String("1.0".to_string()));
    set(&mut store, APP, "Path", RegistryValue::String("C:\\App".to_string()));
    set(&mut store, APP, "InstallDate", RegistryValue::DWord(0x0134_d6e5));

    set(&mut store, CACHE, "Size", RegistryValue::QWord(0x0102));
    set(&mut store, CACHE, "Blob", RegistryValue::Binary(vec![0xde, 0xad]));

    set(&mut store, TOOLS, "Version", RegistryValue::String("2.0".to_string()));
    set(
        &mut store,
        TOOLS,
        "Env",
        RegistryValue::ExpandString("%A".to_string()),
    );
    set(
        &mut store,
        TOOLS,
        "Names",
        RegistryValue::MultiString(vec!["a".to_string(), "b".to_string()]),
    );

    store.insert_key(EMPTY).unwrap();
    store
}

#[allow(dead_code)]
pub fn set(store: &mut MemoryStore, key: &str, name: &str, value: RegistryValue) {
    store.set_value(key, name, value).unwrap();
}

/// (key path, value name) pairs of a result list, for order assertions
#[allow(dead_code)]
pub fn result_keys(results: &[regsweep_core::ResultItem]) -> Vec<(String, String)> {
    results
        .iter()
        .map(|r| (r.key_path().to_string(), r.value_name().to_string()))
        .collect()
}
