use std::path::PathBuf;

/// All failures of a resolve run.
///
/// None of them are recovered: `main` prints the message and exits
/// non-zero. Each variant carries enough context (path, line, resource
/// name) to diagnose the problem without a debugger.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(
        "Failed to read input file {path}: {source}\n\n  \
         Check that the path is correct and the file is readable."
    )]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Parse error in {file}: {detail}\n\n  \
         Expected format: KEY=value (one per line).\n  \
         Comments (#), blank lines and 'export' prefixes are allowed."
    )]
    ParseError { file: PathBuf, detail: String },

    #[error(
        "Failed to set up Secret Manager client: {reason}\n\n  \
         Solutions:\n    \
         → Pass a service account key: --credential <path>\n    \
         → Or set GOOGLE_APPLICATION_CREDENTIALS\n    \
         → Or run 'gcloud auth application-default login'"
    )]
    ClientSetup { reason: String },

    #[error("Failed to get secret ({name}): {reason}")]
    SecretAccess { name: String, reason: String },

    #[error("Failed to decode secret ({name}): {reason}")]
    Decode { name: String, reason: String },

    #[error("Failed to create output file {path}: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResolveError>;
