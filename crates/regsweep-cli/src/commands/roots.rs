//! Roots command
//!
//! Usage: regsweep roots

use regsweep_core::RootKeyType;

/// Execute roots command
pub fn execute() -> Result<(), Box<dyn std::error::Error>> {
    for root in RootKeyType::ALL {
        println!("{:<24}{}", root.canonical_name(), root.alias());
    }
    Ok(())
}
