//! Result enrichment: probe every key already in the results for one more
//! named value.

use crate::errors::{RegistryError, Result};
use crate::format::format_value;
use crate::model::{ErrorItem, ResultItem};
use crate::resolver::open_full_path;
use crate::store::{RegistryKey, RegistryStore};

/// Add `value_name` to every distinct key of `results` that holds it
///
/// Keys are probed in first-occurrence order. A found value is inserted
/// right after the last item of that key's first run, so key groups stay
/// contiguous in the export. Keys that already carry `value_name` are left
/// alone, which makes a repeated call a no-op. The filter allow-list does
/// not apply here.
///
/// Recoverable failures become `ErrorItem`s named after `value_name`; keys
/// that no longer exist are skipped.
///
/// # Arguments
/// * `store` - Store the results were read from
/// * `results` - Accumulated results, updated in place
/// * `errors` - Accumulated errors, appended to
/// * `value_name` - Value to probe for
///
/// # Returns
/// Number of results added
///
/// # Errors
/// * `InvalidInput` - If `value_name` is blank
/// * Any fatal store or formatting error
pub fn add_value_name<S: RegistryStore>(
    store: &S,
    results: &mut Vec<ResultItem>,
    errors: &mut Vec<ErrorItem>,
    value_name: &str,
) -> Result<usize> {
    if value_name.trim().is_empty() {
        return Err(RegistryError::InvalidInput {
            reason: "value name cannot be empty or contain only white space".to_string(),
        });
    }

    let mut enriched = Vec::with_capacity(results.len());
    let mut probed: Vec<String> = Vec::new();
    let mut added = 0;

    let mut index = 0;
    while index < results.len() {
        let key_path = results[index].key_path().to_string();
        let run_end = results[index..]
            .iter()
            .position(|item| item.key_path() != key_path)
            .map_or(results.len(), |offset| index + offset);

        enriched.extend_from_slice(&results[index..run_end]);
        index = run_end;

        if probed.contains(&key_path) {
            continue;
        }
        probed.push(key_path.clone());

        if has_value(results, &key_path, value_name) {
            continue;
        }

        match probe(store, &key_path, value_name) {
            Ok(Some(item)) => {
                enriched.push(item);
                added += 1;
            }
            Ok(None) => {}
            Err(err) if err.is_recoverable() => {
                tracing::warn!(
                    key_path = %key_path,
                    value_name = %value_name,
                    error = %err,
                    "recoverable failure while enriching"
                );
                errors.push(ErrorItem::from_error(&key_path, value_name, &err)?);
            }
            Err(err) => return Err(err),
        }
    }

    *results = enriched;
    Ok(added)
}

fn has_value(results: &[ResultItem], key_path: &str, value_name: &str) -> bool {
    results
        .iter()
        .any(|item| item.key_path() == key_path && item.value_name() == value_name)
}

fn probe<S: RegistryStore>(
    store: &S,
    key_path: &str,
    value_name: &str,
) -> Result<Option<ResultItem>> {
    let key = match open_full_path(store, key_path) {
        Ok(key) => key,
        Err(RegistryError::KeyNotFound { .. }) => return Ok(None),
        Err(err) => return Err(err),
    };

    let Some(value) = key.get_value(value_name)? else {
        return Ok(None);
    };

    let formatted = format_value(key.name(), value_name, &value)?;
    if formatted.is_empty() {
        return Ok(None);
    }
    ResultItem::new(key_path, value_name, formatted).map(Some)
}
