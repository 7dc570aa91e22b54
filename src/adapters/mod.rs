pub mod output;
pub mod parsers;
pub mod secret_manager;
