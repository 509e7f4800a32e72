pub mod config;
pub mod definitions;
pub mod engine;
pub mod error;
pub mod providers;
pub mod types;

pub use config::Config;
pub use engine::Coordinator;
pub use error::{ConsultError, GraphError, InvokeError};
pub use types::*;
