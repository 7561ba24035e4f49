//! Presentation layer handling terminal UI and user input.
//!
//! This module manages the terminal user interface using ratatui,
//! handles keyboard input, renders the home page and quote dialog,
//! and defines the command line.

pub mod cli;
pub mod input;
pub mod terminal;
pub mod ui;

pub use cli::*;
pub use input::*;
pub use terminal::*;
pub use ui::*;
