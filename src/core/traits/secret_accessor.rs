use crate::core::errors::Result;

/// Port for the remote secret store.
///
/// Implementations live in `adapters::secret_manager`. The core layer
/// only depends on this trait, never on a concrete client.
pub trait SecretAccessor {
    /// Fetch the payload of a secret version by its resource name.
    fn access_secret_version(&self, name: &str) -> Result<Vec<u8>>;
}
