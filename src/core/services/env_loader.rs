use std::path::Path;

use tracing::debug;

use crate::core::errors::{Result, ResolveError};
use crate::core::models::env_map::EnvMap;
use crate::core::traits::parser::EnvParser;

/// Read an env file from disk and parse it into an `EnvMap`.
///
/// # Errors
///
/// - `FileRead` if the file cannot be opened or read.
/// - `ParseError` if the content is not UTF-8 or not valid env syntax.
pub fn load_env_file<P: EnvParser>(parser: &P, path: &Path) -> Result<EnvMap> {
    let bytes = std::fs::read(path).map_err(|source| ResolveError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let content = String::from_utf8(bytes).map_err(|_| ResolveError::ParseError {
        file: path.to_path_buf(),
        detail: "content is not valid UTF-8".into(),
    })?;

    let file = parser.parse(&content, path)?;
    let env = EnvMap::from(&file);

    debug!(path = %path.display(), lines = file.lines.len(), entries = env.len(), "loaded env file");
    Ok(env)
}
