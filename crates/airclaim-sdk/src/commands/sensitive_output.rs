//! Owner-only output files for tweaks and other blinding secrets.

use std::path::Path;

use tokio::io::AsyncWriteExt as _;

/// Write `contents` to `path`, readable by the owner only.
///
/// On Unix the mode is forced to `0o600` even when the file already existed.
///
/// # Errors
/// Returns an error if the file cannot be created, written, flushed, or permission-adjusted.
pub(super) async fn write_sensitive_output(path: &Path, contents: &str) -> eyre::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.create(true).truncate(true).write(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;

        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }

    Ok(())
}
