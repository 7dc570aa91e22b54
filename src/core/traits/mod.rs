pub mod parser;
pub mod resolver;
pub mod secret_accessor;
