pub mod config;
pub mod error;
pub mod types;
pub mod value;

pub use config::*;
pub use error::*;
pub use types::*;
pub use value::*;
