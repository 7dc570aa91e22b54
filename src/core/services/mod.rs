pub mod env_loader;
pub mod secret_resolver;
pub mod serializer;
