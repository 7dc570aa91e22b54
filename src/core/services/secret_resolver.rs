use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use tracing::{debug, info};

use crate::core::errors::{Result, ResolveError};
use crate::core::models::env_map::EnvMap;
use crate::core::models::resolve_mode::ResolveMode;
use crate::core::traits::resolver::{ResolveReport, SecretResolver};
use crate::core::traits::secret_accessor::SecretAccessor;

/// Resolves references one at a time, in map order.
///
/// Every reference costs one call to the accessor: no deduplication,
/// no retry. The first failure aborts the pass.
pub struct SequentialResolver<'a, A: SecretAccessor> {
    pub accessor: &'a A,
    pub mode: ResolveMode,
    pub escape_whitespace: bool,
}

impl<'a, A: SecretAccessor> SequentialResolver<'a, A> {
    pub fn new(accessor: &'a A, mode: ResolveMode, escape_whitespace: bool) -> Self {
        Self {
            accessor,
            mode,
            escape_whitespace,
        }
    }

    /// Turn a raw payload into the value written to the env file.
    fn decode_payload(&self, name: &str, payload: Vec<u8>) -> Result<String> {
        let bytes = match self.mode {
            ResolveMode::Plain => payload,
            ResolveMode::Base64 => {
                STANDARD_NO_PAD
                    .decode(&payload)
                    .map_err(|e| ResolveError::Decode {
                        name: name.to_string(),
                        reason: e.to_string(),
                    })?
            }
        };

        let text = String::from_utf8(bytes).map_err(|_| ResolveError::Decode {
            name: name.to_string(),
            reason: "payload is not valid UTF-8".into(),
        })?;

        if self.escape_whitespace && self.mode == ResolveMode::Plain {
            Ok(escape_for_single_quotes(&text))
        } else {
            Ok(text)
        }
    }
}

impl<A: SecretAccessor> SecretResolver for SequentialResolver<'_, A> {
    fn resolve(&self, env: &mut EnvMap) -> Result<ResolveReport> {
        let mut report = ResolveReport::default();

        for (key, value) in env.iter_mut() {
            if !self.mode.is_reference(value) {
                continue;
            }

            debug!(key, name = %value, "accessing secret version");
            let payload = self.accessor.access_secret_version(value)?;
            let resolved = self.decode_payload(value, payload)?;

            *value = resolved;
            report.resolved += 1;
        }

        info!(resolved = report.resolved, "secret references resolved");
        Ok(report)
    }
}

/// Make a secret safe inside a single-quoted shell string on one line.
///
/// `'` becomes `'"'"'`, newline becomes the two characters `\n`,
/// tab becomes the two characters `\t`.
pub fn escape_for_single_quotes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' => out.push_str(r#"'"'"'"#),
            '\n' => out.push_str(r"\n"),
            '\t' => out.push_str(r"\t"),
            other => out.push(other),
        }
    }
    out
}

/// Returns true if `env` still holds any reference-shaped value.
pub fn has_references(env: &EnvMap, mode: ResolveMode) -> bool {
    env.iter().any(|(_, value)| mode.is_reference(value))
}
