use serde::Deserialize;

/// Which secret-reference convention a run follows.
///
/// The two conventions differ in the reference prefix, in how the
/// payload is decoded, and in how values are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// `projects/...` resource names, plain-text payloads, `KEY='value'` output.
    #[default]
    Plain,
    /// `/...` resource paths, base64 payloads, `KEY=value` output.
    Base64,
}

impl ResolveMode {
    /// Prefix that marks a value as a secret reference.
    pub fn reference_prefix(self) -> &'static str {
        match self {
            ResolveMode::Plain => "projects/",
            ResolveMode::Base64 => "/",
        }
    }

    /// Returns true if `value` points at a remote secret version.
    pub fn is_reference(self, value: &str) -> bool {
        value.starts_with(self.reference_prefix())
    }

    /// Whether serialized values are wrapped in single quotes.
    pub fn quotes_values(self) -> bool {
        matches!(self, ResolveMode::Plain)
    }

    pub fn name(self) -> &'static str {
        match self {
            ResolveMode::Plain => "plain",
            ResolveMode::Base64 => "base64",
        }
    }
}
