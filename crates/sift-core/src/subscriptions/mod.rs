//! Built-in subscription sources.
//!
//! - **Terminal events** ([`terminal_events`]) -- keyboard, mouse, resize,
//!   focus, and paste events from the terminal.
//! - **Timers** ([`Every`]) -- a repeating tick, used for animations.

mod terminal;
mod timer;

pub use terminal::*;
pub use timer::*;
