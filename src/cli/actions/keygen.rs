use crate::site::signing::generate_key;
use anyhow::Result;

/// Print a fresh cookie signing key.
#[allow(clippy::unnecessary_wraps)]
pub fn execute() -> Result<()> {
    println!("{}", generate_key());
    Ok(())
}
