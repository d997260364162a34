pub mod config;
pub mod error;
pub mod safety;
pub mod types;

pub use config::Config;
pub use error::FactLensError;
pub use safety::validate_external_url;
pub use types::*;
