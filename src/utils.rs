use tokio::fs;
use std::path::Path;
use log::{error, info};

/// Asynchronously ensures that a directory exists, creating it if it does not.
/// This function is idempotent.
pub async fn ensure_directory_exists<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    let path = path.as_ref();
    if fs::try_exists(path).await? {
        return Ok(());
    }
    if let Err(e) = fs::create_dir_all(path).await {
        error!("Failed to create directory at {:?}: {}", path, e);
        return Err(e);
    }
    info!("Created directory at: {:?}", path);
    Ok(())
}

/// Last `n` characters of `s`, counted in chars rather than bytes.
pub fn tail_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    let (start, _) = s
        .char_indices()
        .nth(count - n)
        .unwrap_or((0, ' '));
    &s[start..]
}
