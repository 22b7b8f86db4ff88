use crate::site::password::hash_password;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub password: SecretString,
    pub output: PathBuf,
}

/// Hash the password and write it where `--password-file` will find it.
/// # Errors
/// Returns an error if hashing or writing the file fails.
pub async fn execute(args: Args) -> Result<()> {
    let password = args.password;
    let phc = tokio::task::spawn_blocking(move || hash_password(password.expose_secret()))
        .await
        .context("Password hashing task failed")??;

    write_private(&args.output, &phc).await?;
    info!("Password hash written to {}", args.output.display());
    println!("{}", args.output.display());

    Ok(())
}

async fn write_private(path: &Path, contents: &str) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.flush().await?;

    Ok(())
}
