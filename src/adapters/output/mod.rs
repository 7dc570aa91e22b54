pub mod env_writer;
