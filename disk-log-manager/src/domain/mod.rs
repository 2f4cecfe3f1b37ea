pub mod config;
pub mod models;
pub mod paths;
pub mod selection;
pub mod traits;
