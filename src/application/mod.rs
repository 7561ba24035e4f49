//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! managing the quote wizard, the dialog host and the submission workflow.

pub mod state;
pub mod submission;
pub mod wizard;

pub use state::*;
pub use submission::*;
pub use wizard::*;
