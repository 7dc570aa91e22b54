use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::errors::{Result, ResolveError};

/// Write rendered env content to `output`, or to stdout when `None`.
///
/// The target is created or truncated in place, so symlinks, device
/// paths such as `/dev/stdout` and existing permissions are honored.
/// Callers only get here once every reference has resolved.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => write_file(content, path),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| ResolveError::Write { source })
        }
    }
}

fn write_file(content: &str, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| ResolveError::OutputCreate {
        path: path.to_path_buf(),
        source,
    })?;

    file.write_all(content.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|source| ResolveError::Write { source })
}
