//! procdeck_core: host roster, process snapshots, selection state and signal routing.
//!
//! The terminal layer talks to this crate through [`manager::Display`]: it receives a
//! [`manager::DisplayModel`] to draw and hands back [`manager::Key`] codes.

pub mod action;
pub mod config;
pub mod error;
pub mod local;
pub mod manager;
pub mod message;
pub mod remote;
pub mod roster;
pub mod selection;
pub mod session;
pub mod types;

pub use error::{
    AcquisitionError, AdmitError, ConfigError, ConnectionError, ExecError, ManagerError,
    RosterError,
};
pub use types::{ProcessEntry, Snapshot};
