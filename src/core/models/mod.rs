pub mod env_file;
pub mod env_map;
pub mod resolve_mode;
