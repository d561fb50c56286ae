pub mod abstract_trait;
pub mod config;
pub mod domain;
pub mod schema;
pub mod utils;
