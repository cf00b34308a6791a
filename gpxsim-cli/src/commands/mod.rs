//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`init`] - Configuration initialization
//! - [`inspect`] - Track log summary
//! - [`run`] - Main command (play a track log)

pub mod init;
pub mod inspect;
pub mod run;
