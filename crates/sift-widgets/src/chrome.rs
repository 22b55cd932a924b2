//! Border chrome shared by the dropdown's header box and option panel.

use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders};

/// Rounded bordered block, cyan while active and dark gray otherwise.
pub fn focus_block(active: bool) -> Block<'static> {
    let color = if active { Color::Cyan } else { Color::DarkGray };
    Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}
