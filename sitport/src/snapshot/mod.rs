//! The aggregated snapshot document and its persistence.
//!
//! On disk a snapshot looks like:
//!
//! ```text
//! {
//!   "refreshed_utc": "2025-03-01T12:00:00+00:00",
//!   "base": "https://orion.directemar.cl/sitport/back/users",
//!   "data": {
//!     "Totalgeneral": { "method": "GET", "payload": { ... } }
//!   }
//! }
//! ```

mod types;
mod writer;

pub use types::{Snapshot, SnapshotEntry};
pub use writer::{SnapshotReadError, SnapshotWriteError, SnapshotWriter};
