pub mod config;
pub mod error;
pub mod types;

pub use config::PanicConfig;
pub use error::{PanicError, Result};
pub use types::{UnitId, UnitKind};
