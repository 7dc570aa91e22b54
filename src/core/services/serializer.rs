use crate::core::models::env_map::EnvMap;
use crate::core::models::resolve_mode::ResolveMode;

/// Renders an `EnvMap` back into env file text.
///
/// Plain mode writes `key='value'` so the output can be sourced by a
/// shell; base64 mode writes bare `key=value`. Every line, including the
/// last, ends with `\n`.
///
/// Values are written as-is, so the output does not always parse back to
/// the same pairs: in plain mode a value containing `'` breaks the quoting
/// unless `--remove-whitespace` escaped it, and in base64 mode a ` #`
/// starts an inline comment and surrounding whitespace is trimmed on the
/// next read.
pub struct EnvSerializer {
    pub mode: ResolveMode,
    pub sort_keys: bool,
}

impl EnvSerializer {
    pub fn serialize(&self, env: &EnvMap) -> String {
        let pairs: Vec<(&str, &str)> = if self.sort_keys {
            env.sorted()
        } else {
            env.iter().collect()
        };

        let mut output = String::new();
        for (key, value) in pairs {
            output.push_str(key);
            output.push('=');
            if self.mode.quotes_values() {
                output.push('\'');
                output.push_str(value);
                output.push('\'');
            } else {
                output.push_str(value);
            }
            output.push('\n');
        }
        output
    }
}
