//! **sift** -- a searchable dropdown for [`ratatui`] applications.
//!
//! This is the umbrella crate that re-exports everything a host needs from a
//! single dependency:
//!
//! ```toml
//! [dependencies]
//! sift = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`sift_core`] are available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Subscription`], [`Program`],
//!   [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports [`sift_widgets`], including
//!   [`widgets::SearchableDropdown`].
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use sift::widgets::searchable_dropdown::{Message as DropdownMsg, SearchableDropdown};
//! use sift::{Command, Component, Model, TerminalEvent};
//! use ratatui::Frame;
//!
//! struct Picker {
//!     dropdown: SearchableDropdown,
//! }
//!
//! enum Msg {
//!     Dropdown(DropdownMsg),
//! }
//!
//! impl Model for Picker {
//!     type Message = Msg;
//!     type Flags = Vec<String>;
//!
//!     fn init(options: Vec<String>) -> (Self, Command<Msg>) {
//!         (Picker { dropdown: SearchableDropdown::new(options) }, Command::none())
//!     }
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Dropdown(m) => self.dropdown.update(m).map(Msg::Dropdown),
//!         }
//!     }
//!     fn view(&self, frame: &mut Frame) {
//!         self.dropdown.view(frame, frame.area());
//!     }
//! }
//! ```
//!
//! See `demos/names.rs` for a complete host.

pub use sift_core::*;
pub mod widgets {
    pub use sift_widgets::*;
}

// Re-export dependencies for demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
