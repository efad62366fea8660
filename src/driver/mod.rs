//! Driver orchestration and external seams
//!
//! The driver owns one store connection and runs the execution path:
//! cache resolution, translation, dispatch, normalization, identity
//! tracking, audit logging and cache population. The connection, the
//! shared cache tier and the audit sink are external collaborators behind
//! traits; transactions are deliberate no-ops because the store offers no
//! cross-statement atomicity.

mod cache;
mod config;
mod connection;
mod errors;
mod log;
mod orchestrator;

pub use cache::{CacheStorage, QueryCache};
pub use config::ConnectionConfig;
pub use connection::{FindOptions, StoreConnection};
pub use errors::{DriverError, DriverResult};
pub use log::QueryLog;
pub use orchestrator::DocumentDriver;
