pub mod clock;
pub mod config;
pub mod error;
pub mod keys;
pub mod session;

// Re-export common types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ApiConfig, SessionConfig};
pub use error::{Result, SessionError};
