pub mod controller;
pub mod delete_gate;
pub mod enrich;
pub mod error;
pub mod host;
pub mod query;
pub mod sort;
pub mod status_alerts;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{Controller, ControllerConfig, FetchMode, ListParams, Poller, ViewState};
pub use error::{ConsoleError, Result, ServiceError};
pub use host::Capabilities;
