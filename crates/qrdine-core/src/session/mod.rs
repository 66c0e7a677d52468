//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Canonical session record (`SessionRecord`) and partial updates
//! - `expiry`: Expiry arithmetic (`ExpiryInfo`, `ExpirySource`)
//! - `repository`: Key-value storage trait the persistence adapter wraps
//! - `api`: Backend collaborator trait for session extension
//!
//! # Usage
//!
//! ```ignore
//! use qrdine_core::session::{SessionRecord, SessionPatch, ExpiryInfo};
//! use qrdine_core::session::{KeyValueStore, StorageScope, TableSessionApi};
//! ```

mod api;
mod expiry;
mod model;
mod repository;

// Re-export public API
pub use api::{ApiError, ApiErrorCode, ExtendSessionResponse, TableSessionApi};
pub use expiry::{ExpiryInfo, ExpirySource, resolve_expires_at};
pub use model::{
    META_GUEST_NAME, META_IS_HOST, META_MIGRATION, META_RESTAURANT_NAME, META_TABLE_NAME,
    SESSION_RECORD_VERSION, SessionPatch, SessionRecord,
};
pub use repository::{KeyValueStore, StorageScope};
