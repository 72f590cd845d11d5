//! Operator console layout management.
//!
//! [`BlueprintManager`] ties the kernel (edits, drafts, defaults) to the
//! catalogue client for one live session. [`ConsoleConfig`] carries the
//! settings shared by the manager and the `blueprint` tool.

pub mod config;
pub mod manager;

pub use config::{ConfigError, ConsoleConfig};
pub use manager::{
    BlueprintManager, Dispatch, ManagerError, ManagerResult, ManagerSnapshot, Notice, NoticeLevel,
};
