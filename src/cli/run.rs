use tracing::{debug, info};

use crate::adapters::output::env_writer::write_output;
use crate::adapters::parsers::dotenv_parser::DotenvParser;
use crate::adapters::secret_manager::client::SecretManagerClient;
use crate::cli::output;
use crate::config::settings::Settings;
use crate::core::errors::Result;
use crate::core::services::env_loader::load_env_file;
use crate::core::services::secret_resolver::{SequentialResolver, has_references};
use crate::core::services::serializer::EnvSerializer;
use crate::core::traits::resolver::{ResolveReport, SecretResolver};

/// Run the whole pipeline: load, resolve, serialize, write.
///
/// Nothing is written unless every reference resolved. The Secret
/// Manager client is only set up when the file holds at least one
/// reference.
pub fn execute(settings: &Settings) -> Result<()> {
    let mut env = load_env_file(&DotenvParser, &settings.input)?;

    if env.is_empty() && !settings.quiet {
        output::warning(&format!("{} has no variables", settings.input.display()));
    }

    let report = if has_references(&env, settings.mode) {
        let client = SecretManagerClient::new(&settings.credential, &settings.endpoint)?;
        let resolver =
            SequentialResolver::new(&client, settings.mode, settings.escape_whitespace);
        resolver.resolve(&mut env)?
    } else {
        debug!(mode = settings.mode.name(), "no secret references found");
        ResolveReport::default()
    };

    let serializer = EnvSerializer {
        mode: settings.mode,
        sort_keys: settings.sort_keys,
    };
    let content = serializer.serialize(&env);

    write_output(&content, settings.output.as_deref())?;

    let destination = settings
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    info!(destination = %destination, variables = env.len(), "env file written");

    if !settings.quiet {
        output::success(&format!(
            "Resolved {} secret(s), wrote {} variable(s) to {destination}",
            report.resolved,
            env.len()
        ));
    }

    Ok(())
}
