pub mod app;
pub mod config;
pub mod genesis;
pub mod service;

pub use app::{LedgerApp, SubmitError};
pub use config::NodeConfig;
pub use service::{LedgerHandle, LedgerService};
