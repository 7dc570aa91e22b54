use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::adapters::secret_manager::client::DEFAULT_ENDPOINT;
use crate::cli::Cli;
use crate::core::errors::{Result, ResolveError};
use crate::core::models::resolve_mode::ResolveMode;

/// Everything a resolve run needs, fixed before the first file is read.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub credential: PathBuf,
    pub mode: ResolveMode,
    pub escape_whitespace: bool,
    pub sort_keys: bool,
    pub endpoint: String,
    pub quiet: bool,
}

/// Optional TOML settings file passed with `--config`.
///
/// ```toml
/// [resolve]
/// mode = "plain"
/// credential = "~/keys/ci.json"
/// remove_whitespace = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub resolve: ResolveSection,
}

/// The `[resolve]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveSection {
    pub mode: Option<ResolveMode>,
    pub credential: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub remove_whitespace: Option<bool>,
    pub sort: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ResolveError::InvalidConfig {
            detail: format!("cannot read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| ResolveError::InvalidConfig {
            detail: format!("failed to parse {}: {e}", path.display()),
        })
    }
}

impl Settings {
    /// Build settings from the command line, reading `--config` if given.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    /// Command line (and its environment defaults) wins over the file,
    /// the file wins over built-in defaults.
    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let section = file.resolve;

        let mode = cli.mode.or(section.mode).unwrap_or_default();
        let escape_whitespace = cli.remove_whitespace || section.remove_whitespace.unwrap_or(false);

        if escape_whitespace && mode == ResolveMode::Base64 {
            return Err(ResolveError::InvalidConfig {
                detail: "--remove-whitespace only applies to --mode plain".into(),
            });
        }

        let credential = cli
            .credential
            .clone()
            .or(section.credential)
            .map(|p| expand_home(&p))
            .unwrap_or_else(default_credential_path);

        let endpoint = cli
            .endpoint
            .clone()
            .or(section.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Settings {
            input: cli.input.clone(),
            output: cli.output.clone(),
            credential,
            mode,
            escape_whitespace,
            sort_keys: cli.sort || section.sort.unwrap_or(false),
            endpoint,
            quiet: cli.quiet,
        })
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// gcloud's application-default credential file.
fn default_credential_path() -> PathBuf {
    let relative = Path::new("gcloud").join("application_default_credentials.json");
    if cfg!(windows) {
        if let Some(config) = dirs::config_dir() {
            return config.join(relative);
        }
    }
    match dirs::home_dir() {
        Some(home) => home.join(".config").join(relative),
        None => Path::new("~/.config").join(relative),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["envresolve", "in.env"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    fn file(toml_src: &str) -> FileConfig {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn defaults_without_file() {
        let settings = Settings::merge(&cli(&["--credential", "/k.json"]), FileConfig::default())
            .unwrap();

        assert_eq!(settings.input, PathBuf::from("in.env"));
        assert_eq!(settings.output, None);
        assert_eq!(settings.credential, PathBuf::from("/k.json"));
        assert_eq!(settings.mode, ResolveMode::Plain);
        assert!(!settings.escape_whitespace);
        assert!(!settings.sort_keys);
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn file_values_fill_gaps() {
        let settings = Settings::merge(
            &cli(&[]),
            file(
                r#"
                [resolve]
                mode = "base64"
                credential = "/etc/creds.json"
                endpoint = "http://localhost:8080"
                sort = true
                "#,
            ),
        )
        .unwrap();

        assert_eq!(settings.mode, ResolveMode::Base64);
        assert_eq!(settings.endpoint, "http://localhost:8080");
        assert!(settings.sort_keys);
    }

    #[test]
    fn command_line_overrides_file() {
        let settings = Settings::merge(
            &cli(&["--mode", "plain", "--credential", "/cli.json"]),
            file("[resolve]\nmode = \"base64\"\ncredential = \"/file.json\""),
        )
        .unwrap();

        assert_eq!(settings.mode, ResolveMode::Plain);
        assert_eq!(settings.credential, PathBuf::from("/cli.json"));
    }

    #[test]
    fn escaping_with_base64_mode_is_rejected() {
        let err = Settings::merge(
            &cli(&["--mode", "base64", "--remove-whitespace", "--credential", "/k"]),
            FileConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ResolveError::InvalidConfig { .. }));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("[resolve]\ncolour = \"blue\"").is_err());
    }

    #[test]
    fn tilde_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_home(Path::new("~/k.json")), home.join("k.json"));
        assert_eq!(expand_home(Path::new("/abs/k.json")), PathBuf::from("/abs/k.json"));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = FileConfig::load(Path::new("/no/such/settings.toml")).unwrap_err();
        assert!(err.to_string().contains("/no/such/settings.toml"));
    }
}
