use crate::core::errors::Result;
use crate::core::models::env_map::EnvMap;

/// Outcome of a successful resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Number of entries whose value was replaced by a secret payload.
    pub resolved: usize,
}

/// Port for the resolution loop.
///
/// The loader and serializer only see this trait, so a concurrent or
/// retrying strategy can replace `SequentialResolver` without touching them.
pub trait SecretResolver {
    /// Replace every reference-shaped value in `env` with its secret.
    ///
    /// Stops at the first failure; `env` may then be partially resolved
    /// and must not be written.
    fn resolve(&self, env: &mut EnvMap) -> Result<ResolveReport>;
}
