use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};

/// Terminal events delivered through the
/// [`terminal_events`](crate::subscriptions::terminal_events) subscription.
///
/// Key releases and repeats reported by kitty-protocol terminals are dropped
/// during conversion, so every `Key` is a press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A key press.
    Key(KeyEvent),
    /// A mouse click, move, drag or wheel event.
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl TerminalEvent {
    /// Convert a crossterm event, discarding non-press key events.
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event::Event;
        Some(match event {
            Event::Key(k) if k.kind != KeyEventKind::Press => return None,
            Event::Key(k) => TerminalEvent::Key(k),
            Event::Mouse(m) => TerminalEvent::Mouse(m),
            Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            Event::FocusGained => TerminalEvent::FocusGained,
            Event::FocusLost => TerminalEvent::FocusLost,
            Event::Paste(s) => TerminalEvent::Paste(s),
        })
    }
}
