//! Quote Wizard Library
//!
//! A three-step freight quote request form with validation, an asynchronous
//! submission client for the hosted quote store, and a terminal front end.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
