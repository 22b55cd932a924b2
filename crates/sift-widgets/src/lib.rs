//! Widgets for **sift**.
//!
//! The centrepiece is [`SearchableDropdown`], a combobox that filters a list
//! of options as the user types. It implements [`sift_core::Component`], so
//! a host [`sift_core::Model`] embeds it, forwards terminal events as
//! [`searchable_dropdown::Message`]s, and hears about commits through
//! [`searchable_dropdown::Message::Selected`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`searchable_dropdown`] | Dropdown controller, rendering and pointer hit-testing |
//! | [`highlight`] | Clamped highlight cursor with scroll offset |
//! | [`search_field`] | Single-line text buffer with a caret |
//! | [`key`] | Key bindings and the dropdown's default key map |
//! | [`chrome`] | Shared border styling |

pub mod chrome;
pub mod highlight;
pub mod key;
pub mod search_field;
pub mod searchable_dropdown;

pub use highlight::Direction;
pub use searchable_dropdown::{
    DropdownError, DropdownState, FocusRequest, SearchableDropdown, VisibleOption,
};
