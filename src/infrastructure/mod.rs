//! Infrastructure layer providing external service integrations.
//!
//! This module contains the quote store client, configuration loading,
//! logging setup, clipboard access and CSV export.

pub mod clipboard;
pub mod config;
pub mod export;
pub mod logging;
pub mod remote_store;

pub use clipboard::*;
pub use config::*;
pub use export::*;
pub use logging::*;
pub use remote_store::*;
