pub mod models;
pub mod schema;
pub mod services;
pub mod workers;

pub use workers::SeedRunner;
