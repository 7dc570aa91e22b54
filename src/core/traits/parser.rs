use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::env_file::EnvFile;

/// Port for parsing env files.
///
/// Only `DotenvParser` ships today; the trait keeps the loader
/// independent of the concrete syntax.
pub trait EnvParser: Send + Sync {
    /// Parse raw file content into a structured `EnvFile`.
    ///
    /// `source` is used to label errors with the offending file.
    fn parse(&self, content: &str, source: &Path) -> Result<EnvFile>;
}
