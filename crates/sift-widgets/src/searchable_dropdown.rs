//! Searchable dropdown (combobox) over a list of string options.
//!
//! Closed, the widget shows a header box with the committed selection (or a
//! placeholder) and a chevron. Open, the header turns into a search field and
//! a panel below it lists the options containing the search text. Arrow keys
//! move the highlight, Enter commits it, Esc or losing focus closes without
//! committing, and clicking an option commits it directly.
//!
//! A committed choice is reported to the parent as [`Message::Selected`],
//! exactly once per commit and never for plain open/close.
//!
//! # Example
//!
//! ```ignore
//! use sift_widgets::searchable_dropdown::SearchableDropdown;
//!
//! let dropdown = SearchableDropdown::new(vec!["Albert".into(), "Lisa".into(), "Lars".into()])
//!     .with_placeholder("Select Option")
//!     .with_max_visible(6);
//! ```

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::chrome::focus_block;
use crate::highlight::{Direction, Highlight};
use crate::key::DropdownKeyMap;
use crate::search_field::SearchField;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;
use sift_core::{subscribe, Command, Component, Every, Subscription};
use unicode_width::UnicodeWidthChar;

/// Header label shown while nothing has been committed.
pub const DEFAULT_PLACEHOLDER: &str = "Select Option";

const ARROW_WIDTH: u16 = 3;
const HEADER_HEIGHT: u16 = 3;
const NO_MATCHES: &str = "No matches";

/// Source of per-instance reveal timer ids.
static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

/// Contract violations reported by the controller operations. None of them
/// changes any state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropdownError {
    /// The search text was set while the panel was closed.
    #[error("search text can only change while the dropdown is open")]
    Closed,
    /// A direct selection named a value that is not an option.
    #[error("{0:?} is not one of the dropdown's options")]
    UnknownOption(String),
    /// A hover or direct highlight pointed past the filtered list.
    #[error("highlight index {index} is out of range for {len} matching options")]
    HighlightOutOfRange { index: usize, len: usize },
}

/// Snapshot of the interaction state.
///
/// `version` increases with every transition that changes the state, so a
/// host can tell two snapshots apart without comparing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownState {
    pub open: bool,
    pub search_text: String,
    /// Index into the filtered options.
    pub highlighted: usize,
    pub selected: Option<String>,
    pub version: u64,
}

/// One row of [`SearchableDropdown::visible_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleOption<'a> {
    /// Position within the filtered list.
    pub index: usize,
    pub value: &'a str,
    pub highlighted: bool,
    pub selected: bool,
}

/// Intent to move keyboard focus into the search field, issued by
/// [`SearchableDropdown::open`]. It goes stale as soon as the panel closes
/// (or reopens), and a stale request is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    generation: u64,
}

/// Pointer targets for hosts that do their own hit-testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The header box (label or search field).
    Header,
    /// The chevron at the right of the header.
    Arrow,
    /// An option, by value.
    Option(String),
}

/// Open/close reveal animation of the option panel. Presentation only: the
/// logical open state flips immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Closed,
    Opening { frame: u16 },
    Open,
    Closing { frame: u16 },
}

impl Animation {
    pub fn is_running(self) -> bool {
        matches!(self, Animation::Opening { .. } | Animation::Closing { .. })
    }

    fn opening(frames: u16) -> Self {
        if frames == 0 {
            Animation::Open
        } else {
            Animation::Opening { frame: 0 }
        }
    }

    fn closing(frames: u16) -> Self {
        if frames == 0 {
            Animation::Closed
        } else {
            Animation::Closing { frame: 0 }
        }
    }

    fn advance(self, frames: u16) -> Self {
        match self {
            Animation::Opening { frame } if frame + 1 < frames => {
                Animation::Opening { frame: frame + 1 }
            }
            Animation::Opening { .. } => Animation::Open,
            Animation::Closing { frame } if frame + 1 < frames => {
                Animation::Closing { frame: frame + 1 }
            }
            Animation::Closing { .. } => Animation::Closed,
            settled => settled,
        }
    }

    /// How many of `rows` are drawn at this point of the animation.
    fn revealed(self, rows: usize, frames: u16) -> usize {
        let steps = frames as usize + 1;
        let part = match self {
            Animation::Closed => return 0,
            Animation::Open => return rows,
            Animation::Opening { frame } => frame as usize + 1,
            Animation::Closing { frame } => (frames as usize).saturating_sub(frame as usize),
        };
        (rows * part).div_ceil(steps)
    }
}

/// Style configuration for the dropdown.
#[derive(Debug, Clone)]
pub struct DropdownStyle {
    /// Committed selection in the header.
    pub label: Style,
    /// Placeholder in the header.
    pub placeholder: Style,
    /// Search text.
    pub search: Style,
    /// The character under the caret.
    pub cursor: Style,
    /// Chevron.
    pub arrow: Style,
    /// Plain option rows.
    pub item: Style,
    /// The highlighted row.
    pub highlighted_item: Style,
    /// The row equal to the committed selection.
    pub selected_item: Style,
    /// "No matches" row.
    pub empty: Style,
}

impl Default for DropdownStyle {
    fn default() -> Self {
        Self {
            label: Style::default().add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::DarkGray),
            search: Style::default(),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            arrow: Style::default().fg(Color::Cyan),
            item: Style::default(),
            highlighted_item: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            selected_item: Style::default().fg(Color::Green),
            empty: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

/// Messages for the dropdown component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press forwarded by the host.
    KeyPress(KeyEvent),
    /// Bracketed paste into the search field.
    Paste(String),
    /// A raw mouse event, hit-tested against the last render.
    Mouse(MouseEvent),
    /// A click the host has already resolved.
    Click(Target),
    /// Pointer over a filtered row, by index.
    Hover(usize),
    /// The terminal regained focus.
    FocusGained,
    /// The terminal lost focus. Closes without committing.
    FocusLost,
    /// Deferred focus issued by `open`, delivered back on the next loop pass.
    FocusSearch(FocusRequest),
    /// One frame of the reveal animation.
    AnimationTick,
    /// Emitted when the user commits an option.
    Selected(String),
}

/// Screen regions of the last render, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
struct HitMap {
    header: Rect,
    arrow: Rect,
    panel: Rect,
    rows: Rect,
    offset: usize,
}

/// A searchable dropdown selector.
pub struct SearchableDropdown {
    options: Vec<String>,
    open: bool,
    selected: Option<String>,
    version: u64,
    field: SearchField,
    search_focused: bool,
    highlight: Highlight,
    focus_generation: u64,
    animation: Animation,
    animation_frames: u16,
    animation_interval: Duration,
    placeholder: String,
    max_visible: usize,
    style: DropdownStyle,
    block: Option<Block<'static>>,
    keys: DropdownKeyMap,
    hit_map: Cell<HitMap>,
    instance: u64,
}

impl SearchableDropdown {
    /// Create a closed dropdown over `options` with nothing selected.
    pub fn new(options: Vec<String>) -> Self {
        let count = options.len();
        Self {
            options,
            open: false,
            selected: None,
            version: 0,
            field: SearchField::new(),
            search_focused: false,
            highlight: Highlight::new(count, 8),
            focus_generation: 0,
            animation: Animation::Closed,
            animation_frames: 4,
            animation_interval: Duration::from_millis(16),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            max_visible: 8,
            style: DropdownStyle::default(),
            block: None,
            keys: DropdownKeyMap::default(),
            hit_map: Cell::new(HitMap::default()),
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Header text while nothing is selected.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Maximum option rows before the panel scrolls.
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = max.max(1);
        self.highlight.set_visible(self.max_visible);
        self
    }

    pub fn with_style(mut self, style: DropdownStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the default header border.
    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_key_map(mut self, keys: DropdownKeyMap) -> Self {
        self.keys = keys;
        self
    }

    /// Number of ticks the panel takes to open or close. 0 disables the
    /// animation.
    pub fn with_animation_frames(mut self, frames: u16) -> Self {
        self.animation_frames = frames;
        self
    }

    pub fn with_animation_interval(mut self, interval: Duration) -> Self {
        self.animation_interval = interval;
        self
    }

    /// Replace the option list. The highlight is pulled back inside the new
    /// filtered list; the committed selection is kept even if it is gone.
    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
        self.highlight.set_count(self.filtered_len());
        self.bump();
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn search_text(&self) -> String {
        self.field.value()
    }

    pub fn highlighted(&self) -> usize {
        self.highlight.index()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Header text: the committed selection, or the placeholder.
    pub fn label(&self) -> &str {
        self.selected.as_deref().unwrap_or(&self.placeholder)
    }

    /// Whether a focus request has been applied since the last open.
    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn animation(&self) -> Animation {
        self.animation
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn state(&self) -> DropdownState {
        DropdownState {
            open: self.open,
            search_text: self.field.value(),
            highlighted: self.highlight.index(),
            selected: self.selected.clone(),
            version: self.version,
        }
    }

    /// Options containing the search text (case-sensitive), in list order.
    pub fn filtered_options(&self) -> Vec<&str> {
        let needle = self.field.value();
        self.options
            .iter()
            .filter(|option| option.contains(needle.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Filtered options with their highlight and selection flags.
    pub fn visible_options(&self) -> Vec<VisibleOption<'_>> {
        let highlighted = self.highlight.index();
        self.filtered_options()
            .into_iter()
            .enumerate()
            .map(|(index, value)| VisibleOption {
                index,
                value,
                highlighted: index == highlighted,
                selected: self.selected.as_deref() == Some(value),
            })
            .collect()
    }

    /// Open the panel with an empty search and the first option highlighted.
    ///
    /// Returns a [`FocusRequest`] for the host to deliver later, or `None`
    /// when the panel was already open.
    pub fn open(&mut self) -> Option<FocusRequest> {
        if self.open {
            return None;
        }
        self.open = true;
        self.field.clear();
        self.highlight.reset(self.options.len());
        self.search_focused = false;
        self.focus_generation += 1;
        self.animation = Animation::opening(self.animation_frames);
        self.bump();
        tracing::debug!(options = self.options.len(), "dropdown opened");
        Some(FocusRequest {
            generation: self.focus_generation,
        })
    }

    /// Close the panel. Selection and search text are left alone.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.search_focused = false;
        self.focus_generation += 1;
        self.animation = Animation::closing(self.animation_frames);
        self.bump();
        tracing::debug!("dropdown closed");
    }

    /// Close without committing anything (Esc, focus loss).
    pub fn cancel(&mut self) {
        self.close();
    }

    /// Replace the search text and highlight the first match.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> Result<(), DropdownError> {
        if !self.open {
            return Err(DropdownError::Closed);
        }
        let text = text.into();
        if self.field.value() != text {
            self.field.set_value(&text);
        }
        self.highlight.reset(self.filtered_len());
        self.bump();
        Ok(())
    }

    /// Move the highlight one row, clamped to the filtered list.
    pub fn move_highlight(&mut self, direction: Direction) {
        self.highlight.set_count(self.filtered_len());
        let before = self.highlight.index();
        self.highlight.step(direction);
        if self.highlight.index() != before {
            self.bump();
        }
    }

    /// Highlight a filtered row directly (pointer hover).
    pub fn set_highlight(&mut self, index: usize) -> Result<(), DropdownError> {
        let len = self.filtered_len();
        self.highlight.set_count(len);
        if !self.highlight.select(index) {
            return Err(DropdownError::HighlightOutOfRange { index, len });
        }
        self.bump();
        Ok(())
    }

    /// Commit the highlighted option and close.
    ///
    /// Returns the committed value; `None` (still closing) when nothing
    /// matches the search.
    pub fn commit_highlighted(&mut self) -> Option<String> {
        let value = {
            let filtered = self.filtered_options();
            let index = self.highlight.index().min(filtered.len().saturating_sub(1));
            filtered.get(index).map(|v| v.to_string())
        };
        match value {
            Some(value) => {
                self.commit(value.clone());
                Some(value)
            }
            None => {
                tracing::debug!(search = %self.field.value(), "nothing to commit");
                self.close();
                None
            }
        }
    }

    /// Commit `option` directly (pointer click) and close.
    pub fn select_option(&mut self, option: &str) -> Result<String, DropdownError> {
        if !self.options.iter().any(|o| o == option) {
            return Err(DropdownError::UnknownOption(option.to_string()));
        }
        self.commit(option.to_string());
        Ok(option.to_string())
    }

    /// Apply a focus request if it still belongs to the current open panel.
    pub fn apply_focus(&mut self, request: FocusRequest) -> bool {
        if !self.open || request.generation != self.focus_generation {
            tracing::trace!(?request, "stale focus request ignored");
            return false;
        }
        self.search_focused = true;
        true
    }

    fn commit(&mut self, value: String) {
        tracing::debug!(%value, "option selected");
        self.selected = Some(value);
        self.bump();
        self.close();
    }

    fn filtered_len(&self) -> usize {
        let needle = self.field.value();
        self.options
            .iter()
            .filter(|option| option.contains(needle.as_str()))
            .count()
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    fn open_command(&mut self) -> Command<Message> {
        match self.open() {
            Some(request) => Command::message(Message::FocusSearch(request)),
            None => Command::none(),
        }
    }

    fn commit_command(&mut self) -> Command<Message> {
        match self.commit_highlighted() {
            Some(value) => Command::message(Message::Selected(value)),
            None => Command::none(),
        }
    }

    fn select_command(&mut self, option: &str) -> Command<Message> {
        match self.select_option(option) {
            Ok(value) => Command::message(Message::Selected(value)),
            Err(err) => {
                tracing::warn!(%err, "ignored selection");
                Command::none()
            }
        }
    }

    fn hover(&mut self, index: usize) {
        if let Err(err) = self.set_highlight(index) {
            tracing::warn!(%err, "ignored hover");
        }
    }

    /// Push the edited field text through the search-text transition.
    fn edited(&mut self) {
        let text = self.field.value();
        if let Err(err) = self.set_search_text(text) {
            tracing::warn!(%err, "ignored search edit");
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if !self.open {
            return if self.keys.open.matches(&key) {
                self.open_command()
            } else {
                Command::none()
            };
        }

        // Up/Down never reach the field, so the caret stays put.
        if self.keys.move_up.matches(&key) {
            self.move_highlight(Direction::Up);
            return Command::none();
        }
        if self.keys.move_down.matches(&key) {
            self.move_highlight(Direction::Down);
            return Command::none();
        }
        if self.keys.commit.matches(&key) {
            return self.commit_command();
        }
        if self.keys.cancel.matches(&key) {
            self.cancel();
            return Command::none();
        }

        let changed = match (key.code, key.modifiers) {
            (KeyCode::Backspace, _) => self.field.delete_back(),
            (KeyCode::Delete, _) => self.field.delete_forward(),
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => self.field.delete_word_back(),
            (KeyCode::Left, _) => {
                self.field.move_left();
                false
            }
            (KeyCode::Right, _) => {
                self.field.move_right();
                false
            }
            (KeyCode::Home, _) => {
                self.field.move_home();
                false
            }
            (KeyCode::End, _) => {
                self.field.move_end();
                false
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.field.insert_char(c)
            }
            _ => false,
        };
        if changed {
            self.edited();
        }
        Command::none()
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Command<Message> {
        let map = self.hit_map.get();
        let pos = Position::new(event.column, event.row);
        let row = if self.open && map.rows.contains(pos) {
            Some(map.offset + (event.row - map.rows.y) as usize)
        } else {
            None
        };

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if map.arrow.contains(pos) {
                    self.update(Message::Click(Target::Arrow))
                } else if map.header.contains(pos) {
                    self.update(Message::Click(Target::Header))
                } else if let Some(index) = row {
                    let value = self.filtered_options().get(index).map(|v| v.to_string());
                    match value {
                        Some(value) => self.select_command(&value),
                        None => Command::none(),
                    }
                } else if self.open && !map.panel.contains(pos) {
                    // Clicking elsewhere is a blur.
                    self.cancel();
                    Command::none()
                } else {
                    Command::none()
                }
            }
            MouseEventKind::Moved => {
                if let Some(index) = row {
                    if index < self.filtered_len() && index != self.highlight.index() {
                        self.hover(index);
                    }
                }
                Command::none()
            }
            MouseEventKind::ScrollUp if self.open && map.panel.contains(pos) => {
                self.move_highlight(Direction::Up);
                Command::none()
            }
            MouseEventKind::ScrollDown if self.open && map.panel.contains(pos) => {
                self.move_highlight(Direction::Down);
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn header_line(&self, width: u16) -> Line<'static> {
        let width = width as usize;
        if !self.open {
            let style = if self.selected.is_some() {
                self.style.label
            } else {
                self.style.placeholder
            };
            return Line::from(Span::styled(truncate(self.label(), width), style));
        }

        let chars = self.field.chars();
        if !self.search_focused {
            let text: String = chars.iter().collect();
            return Line::from(Span::styled(truncate(&text, width), self.style.search));
        }

        // Keep the caret on screen: show the tail when the text is too long.
        let cursor = self.field.cursor();
        let start = cursor.saturating_sub(width.saturating_sub(1));
        let before: String = chars[start..cursor].iter().collect();
        let at: String = chars.get(cursor).map_or(" ".to_string(), |c| c.to_string());
        let after: String = chars.iter().skip(cursor + 1).collect();
        Line::from(vec![
            Span::styled(before, self.style.search),
            Span::styled(at, self.style.cursor),
            Span::styled(after, self.style.search),
        ])
    }
}

/// Cut `text` to `width` terminal columns, ending in an ellipsis when cut.
fn truncate(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

impl Component for SearchableDropdown {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Paste(text) => {
                if self.open && self.field.insert_str(&text) {
                    self.edited();
                }
                Command::none()
            }
            Message::Mouse(event) => self.handle_mouse(event),
            Message::Click(Target::Header) => {
                if self.open {
                    // Clicking into the search field focuses it.
                    self.search_focused = true;
                    Command::none()
                } else {
                    self.open_command()
                }
            }
            Message::Click(Target::Arrow) => {
                if self.open {
                    self.close();
                    Command::none()
                } else {
                    self.open_command()
                }
            }
            Message::Click(Target::Option(value)) => {
                if self.open {
                    self.select_command(&value)
                } else {
                    tracing::debug!(%value, "option click while closed ignored");
                    Command::none()
                }
            }
            Message::Hover(index) => {
                self.hover(index);
                Command::none()
            }
            Message::FocusGained => {
                if self.open {
                    self.search_focused = true;
                }
                Command::none()
            }
            Message::FocusLost => {
                self.cancel();
                Command::none()
            }
            Message::FocusSearch(request) => {
                self.apply_focus(request);
                Command::none()
            }
            Message::AnimationTick => {
                self.animation = self.animation.advance(self.animation_frames);
                Command::none()
            }
            Message::Selected(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mut map = HitMap::default();
        if area.height == 0 || area.width < ARROW_WIDTH + 3 {
            self.hit_map.set(map);
            return;
        }

        // Header box: label or search field, plus the chevron.
        let header = Rect {
            height: area.height.min(HEADER_HEIGHT),
            ..area
        };
        let block = self
            .block
            .clone()
            .unwrap_or_else(|| focus_block(self.open));
        let inner = block.inner(header);
        frame.render_widget(block, header);

        let arrow_width = ARROW_WIDTH.min(inner.width);
        let arrow = Rect {
            x: inner.right() - arrow_width,
            width: arrow_width,
            ..inner
        };
        let text_area = Rect {
            x: inner.x + 1u16.min(inner.width),
            width: inner.width.saturating_sub(arrow_width + 1),
            ..inner
        };
        frame.render_widget(Paragraph::new(self.header_line(text_area.width)), text_area);
        let chevron = if self.open { " ▴ " } else { " ▾ " };
        frame.render_widget(
            Paragraph::new(Span::styled(chevron, self.style.arrow)),
            arrow,
        );
        map.header = header;
        map.arrow = arrow;

        // Option panel, revealed progressively while animating.
        let filtered = self.filtered_options();
        let rows = if filtered.is_empty() {
            1
        } else {
            filtered.len().min(self.max_visible)
        };
        let shown = self.animation.revealed(rows, self.animation_frames);
        let top = header.bottom();
        let room = frame.area().bottom().saturating_sub(top);
        let height = (shown as u16).saturating_add(2).min(room);
        if shown == 0 || height <= 2 {
            self.hit_map.set(map);
            return;
        }

        let panel = Rect::new(area.x, top, area.width, height);
        frame.render_widget(Clear, panel);
        let block = focus_block(self.open);
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        if filtered.is_empty() {
            let line = Span::styled(truncate(NO_MATCHES, inner.width as usize), self.style.empty);
            frame.render_widget(Paragraph::new(line), Rect { height: 1, ..inner });
            self.hit_map.set(map);
            return;
        }

        // The frame may cut the panel below max_visible; scroll against the
        // rows actually drawn so the highlight stays on screen.
        let fits = (inner.height as usize).max(1);
        let highlighted = self.highlight.index();
        let mut offset = self.highlight.offset();
        if highlighted >= offset + fits {
            offset = highlighted + 1 - fits;
        } else if highlighted < offset {
            offset = highlighted;
        }
        let offset = offset.min(filtered.len().saturating_sub(fits));
        let mut drawn = 0u16;
        for (index, value) in filtered.iter().enumerate().skip(offset) {
            if drawn >= inner.height {
                break;
            }
            let is_highlighted = index == highlighted;
            let is_selected = self.selected.as_deref() == Some(*value);
            let style = if is_highlighted {
                self.style.highlighted_item
            } else if is_selected {
                self.style.selected_item
            } else {
                self.style.item
            };
            let prefix = if is_highlighted { "▸ " } else { "  " };
            let suffix = if is_selected { " ✓" } else { "" };
            let room = (inner.width as usize).saturating_sub(2 + suffix.chars().count());
            let text = format!("{prefix}{}{suffix}", truncate(value, room));
            let row = Rect {
                y: inner.y + drawn,
                height: 1,
                ..inner
            };
            frame.render_widget(Paragraph::new(Span::styled(text, style)), row);
            drawn += 1;
        }

        map.panel = panel;
        if self.open {
            map.rows = Rect {
                height: drawn,
                ..inner
            };
            map.offset = offset;
        }
        self.hit_map.set(map);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if !self.animation.is_running() {
            return vec![];
        }
        let id = format!("sift-dropdown-reveal-{}", self.instance);
        vec![subscribe(Every::new(self.animation_interval, id)).map(|_| Message::AnimationTick)]
    }

    fn focused(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sift_core::testing::buffer_to_string;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn click(column: u16, row: u16) -> Message {
        Message::Mouse(mouse(MouseEventKind::Down(MouseButton::Left), column, row))
    }

    fn dropdown(options: &[&str]) -> SearchableDropdown {
        SearchableDropdown::new(options.iter().map(|s| s.to_string()).collect())
            .with_animation_frames(0)
    }

    fn names() -> SearchableDropdown {
        dropdown(&["Albert", "Lisa", "Lars", "Jesper", "Monica", "Randal", "Lynea"])
    }

    fn type_text(dd: &mut SearchableDropdown, text: &str) {
        for c in text.chars() {
            dd.update(Message::KeyPress(key(KeyCode::Char(c))));
        }
    }

    fn render(dd: &SearchableDropdown, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| dd.view(frame, Rect::new(0, 0, width, height)))
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    // --- controller operations ---

    #[test]
    fn new_is_closed_with_placeholder() {
        let dd = names();
        assert!(!dd.is_open());
        assert_eq!(dd.selected(), None);
        assert_eq!(dd.label(), "Select Option");
        assert_eq!(dd.search_text(), "");
    }

    #[test]
    fn filtering_is_ordered_case_sensitive_containment() {
        let mut dd = names();
        dd.open();
        for needle in ["", "a", "La", "la", "er", "Lisa", "zzz", " "] {
            dd.set_search_text(needle).unwrap();
            let expected: Vec<&str> = dd
                .options()
                .iter()
                .filter(|o| o.contains(needle))
                .map(String::as_str)
                .collect();
            assert_eq!(dd.filtered_options(), expected, "needle {needle:?}");
        }
        dd.set_search_text("la").unwrap();
        assert_eq!(dd.filtered_options(), vec!["Randal"]);
    }

    #[test]
    fn move_highlight_stays_in_bounds() {
        let mut dd = names();
        dd.open();
        for _ in 0..20 {
            dd.move_highlight(Direction::Down);
            assert!(dd.highlighted() < dd.filtered_options().len());
        }
        assert_eq!(dd.highlighted(), 6);
        for _ in 0..20 {
            dd.move_highlight(Direction::Up);
        }
        assert_eq!(dd.highlighted(), 0);

        dd.set_search_text("nothing").unwrap();
        dd.move_highlight(Direction::Down);
        assert_eq!(dd.highlighted(), 0);
    }

    #[test]
    fn set_search_text_resets_highlight() {
        let mut dd = names();
        dd.open();
        dd.move_highlight(Direction::Down);
        dd.move_highlight(Direction::Down);
        assert_eq!(dd.highlighted(), 2);
        dd.set_search_text("a").unwrap();
        assert_eq!(dd.highlighted(), 0);
        dd.move_highlight(Direction::Down);
        dd.set_search_text("a").unwrap();
        assert_eq!(dd.highlighted(), 0);
    }

    #[test]
    fn open_clears_search_and_is_idempotent() {
        let mut dd = names();
        assert!(dd.open().is_some());
        dd.set_search_text("Li").unwrap();
        dd.close();
        assert_eq!(dd.search_text(), "Li");

        assert!(dd.open().is_some());
        assert!(dd.is_open());
        assert_eq!(dd.search_text(), "");

        let before = dd.state();
        assert!(dd.open().is_none());
        assert_eq!(dd.state(), before);
    }

    #[test]
    fn close_keeps_selection_and_search() {
        let mut dd = names();
        dd.open();
        dd.select_option("Lisa").unwrap();
        dd.open();
        dd.set_search_text("Mon").unwrap();
        dd.close();
        assert!(!dd.is_open());
        assert_eq!(dd.selected(), Some("Lisa"));
        assert_eq!(dd.search_text(), "Mon");
    }

    #[test]
    fn commit_emits_once_when_something_matches() {
        let mut dd = names();
        dd.open();
        dd.set_search_text("a").unwrap();
        let cmd = dd.update(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(
            cmd.into_messages()
                .into_iter()
                .filter(|m| matches!(m, Message::Selected(_)))
                .count(),
            1
        );
        assert_eq!(dd.selected(), Some("Lisa"));
    }

    #[test]
    fn commit_emits_nothing_without_matches() {
        let mut dd = names();
        dd.open();
        dd.set_search_text("xyz").unwrap();
        let cmd = dd.update(Message::KeyPress(key(KeyCode::Enter)));
        assert!(cmd.is_none());
        assert!(!dd.is_open());
        assert_eq!(dd.selected(), None);
    }

    #[test]
    fn commit_on_empty_option_list_just_closes() {
        let mut dd = dropdown(&[]);
        dd.open();
        assert_eq!(dd.commit_highlighted(), None);
        assert!(!dd.is_open());
    }

    #[test]
    fn cancel_and_blur_never_emit() {
        let mut dd = names();
        dd.open();
        dd.set_search_text("Li").unwrap();
        let cmd = dd.update(Message::KeyPress(key(KeyCode::Esc)));
        assert!(cmd.is_none());
        assert!(!dd.is_open());

        dd.open();
        dd.move_highlight(Direction::Down);
        let cmd = dd.update(Message::FocusLost);
        assert!(cmd.is_none());
        assert!(!dd.is_open());
        assert_eq!(dd.selected(), None);
    }

    #[test]
    fn scenario_filter_then_commit() {
        let mut dd = dropdown(&["Albert", "Lisa", "Lars"]);
        dd.open();
        dd.set_search_text("La").unwrap();
        assert_eq!(dd.filtered_options(), vec!["Lars"]);
        assert_eq!(dd.highlighted(), 0);

        let cmd = dd.update(Message::KeyPress(key(KeyCode::Enter)));
        match cmd.into_message() {
            Some(Message::Selected(value)) => assert_eq!(value, "Lars"),
            other => panic!("Expected Selected(Lars), got {other:?}"),
        }
        assert!(!dd.is_open());
    }

    #[test]
    fn scenario_no_match_commit() {
        let mut dd = dropdown(&["Albert", "Lisa"]);
        dd.open();
        dd.set_search_text("xyz").unwrap();
        assert!(dd.filtered_options().is_empty());
        assert_eq!(dd.commit_highlighted(), None);
        assert!(!dd.is_open());
    }

    #[test]
    fn scenario_highlight_clamps_at_end() {
        let mut dd = dropdown(&["A", "B", "C"]);
        dd.open();
        dd.move_highlight(Direction::Down);
        dd.move_highlight(Direction::Down);
        assert_eq!(dd.highlighted(), 2);
        dd.move_highlight(Direction::Down);
        assert_eq!(dd.highlighted(), 2);
    }

    #[test]
    fn scenario_direct_selection() {
        let mut dd = dropdown(&["A", "B", "C"]);
        dd.open();
        let cmd = dd.update(Message::Click(Target::Option("B".into())));
        match cmd.into_message() {
            Some(Message::Selected(value)) => assert_eq!(value, "B"),
            other => panic!("Expected Selected(B), got {other:?}"),
        }
        assert!(!dd.is_open());
        assert_eq!(dd.selected(), Some("B"));
        assert_eq!(dd.label(), "B");
    }

    #[test]
    fn option_click_while_closed_is_ignored() {
        let mut dd = names();
        let cmd = dd.update(Message::Click(Target::Option("Lisa".into())));
        assert!(cmd.is_none());
        assert_eq!(dd.selected(), None);
    }

    #[test]
    fn search_while_closed_is_rejected() {
        let mut dd = names();
        let before = dd.state();
        assert_eq!(dd.set_search_text("Li"), Err(DropdownError::Closed));
        assert_eq!(dd.state(), before);
    }

    #[test]
    fn unknown_option_is_rejected_without_change() {
        let mut dd = names();
        dd.open();
        let before = dd.state();
        assert_eq!(
            dd.select_option("Zelda"),
            Err(DropdownError::UnknownOption("Zelda".into()))
        );
        assert_eq!(dd.state(), before);

        let cmd = dd.update(Message::Click(Target::Option("Zelda".into())));
        assert!(cmd.is_none());
        assert!(dd.is_open());
    }

    #[test]
    fn set_highlight_checks_filtered_range() {
        let mut dd = names();
        dd.open();
        dd.set_search_text("L").unwrap(); // Lisa, Lars, Lynea
        assert!(dd.set_highlight(2).is_ok());
        assert_eq!(dd.highlighted(), 2);
        assert_eq!(
            dd.set_highlight(3),
            Err(DropdownError::HighlightOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(dd.highlighted(), 2);
    }

    #[test]
    fn shrinking_options_reclamp_highlight() {
        let mut dd = names();
        dd.open();
        dd.set_highlight(6).unwrap();
        dd.set_options(vec!["Albert".into(), "Lisa".into()]);
        assert_eq!(dd.highlighted(), 1);
        dd.set_options(vec![]);
        assert_eq!(dd.highlighted(), 0);
        assert_eq!(dd.commit_highlighted(), None);
    }

    #[test]
    fn visible_options_flag_highlight_and_selection() {
        let mut dd = dropdown(&["Albert", "Lisa", "Lars"]);
        dd.open();
        dd.select_option("Lars").unwrap();
        dd.open();
        dd.move_highlight(Direction::Down);

        let rows = dd.visible_options();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].highlighted && !rows[1].selected);
        assert!(rows[2].selected && !rows[2].highlighted);
        assert!(!rows[0].highlighted && !rows[0].selected);
        assert_eq!(rows[2].value, "Lars");
    }

    #[test]
    fn version_moves_with_every_transition() {
        let mut dd = names();
        let v0 = dd.version();
        dd.open();
        let v1 = dd.version();
        assert!(v1 > v0);
        dd.move_highlight(Direction::Up); // already at 0
        assert_eq!(dd.version(), v1);
        dd.move_highlight(Direction::Down);
        assert!(dd.version() > v1);
    }

    // --- keyboard routing ---

    #[test]
    fn typing_filters_and_arrows_skip_the_caret() {
        let mut dd = names();
        dd.update(Message::KeyPress(key(KeyCode::Enter)));
        assert!(dd.is_open());

        type_text(&mut dd, "La");
        assert_eq!(dd.search_text(), "La");
        assert_eq!(dd.filtered_options(), vec!["Lars"]);

        dd.update(Message::KeyPress(key(KeyCode::Left)));
        dd.update(Message::KeyPress(key(KeyCode::Up)));
        dd.update(Message::KeyPress(key(KeyCode::Down)));
        dd.update(Message::KeyPress(key(KeyCode::Char('i'))));
        // Caret was at 1 after Left; Up/Down did not move it.
        assert_eq!(dd.search_text(), "Lia");
    }

    #[test]
    fn backspace_widens_the_filter() {
        let mut dd = names();
        dd.open();
        type_text(&mut dd, "Lis");
        assert_eq!(dd.filtered_options(), vec!["Lisa"]);
        dd.update(Message::KeyPress(key(KeyCode::Backspace)));
        dd.update(Message::KeyPress(key(KeyCode::Backspace)));
        assert_eq!(dd.filtered_options(), vec!["Lisa", "Lars", "Lynea"]);
    }

    #[test]
    fn paste_edits_search() {
        let mut dd = names();
        dd.update(Message::Paste("Li".into()));
        assert_eq!(dd.search_text(), "");
        dd.open();
        dd.update(Message::Paste("Mon".into()));
        assert_eq!(dd.filtered_options(), vec!["Monica"]);
    }

    #[test]
    fn closed_keys_only_open() {
        let mut dd = names();
        let cmd = dd.update(Message::KeyPress(key(KeyCode::Esc)));
        assert!(cmd.is_none());
        assert!(!dd.is_open());

        let cmd = dd.update(Message::KeyPress(key(KeyCode::Char('x'))));
        assert!(cmd.is_none());
        assert!(!dd.is_open());

        let cmd = dd.update(Message::KeyPress(key(KeyCode::Down)));
        assert!(matches!(cmd.into_message(), Some(Message::FocusSearch(_))));
        assert!(dd.is_open());
    }

    #[test]
    fn custom_key_map_replaces_defaults() {
        use crate::key::{Binding, KeyCombination};

        let keys = DropdownKeyMap {
            commit: Binding::new(vec![KeyCombination::new(KeyCode::Tab)]),
            ..DropdownKeyMap::default()
        };
        let mut dd = names().with_key_map(keys);
        dd.open();
        dd.move_highlight(Direction::Down);
        assert!(dd.update(Message::KeyPress(key(KeyCode::Enter))).is_none());
        assert!(dd.is_open());
        match dd.update(Message::KeyPress(key(KeyCode::Tab))).into_message() {
            Some(Message::Selected(value)) => assert_eq!(value, "Lisa"),
            other => panic!("Expected Selected(Lisa), got {other:?}"),
        }
    }

    // --- deferred focus ---

    #[test]
    fn focus_request_applies_while_open() {
        let mut dd = names();
        let cmd = dd.update(Message::Click(Target::Header));
        let msg = cmd.into_message().expect("open issues a focus request");
        assert!(!dd.search_focused());
        dd.update(msg);
        assert!(dd.search_focused());
    }

    #[test]
    fn stale_focus_request_is_swallowed() {
        let mut dd = names();
        let request = dd.open().unwrap();
        dd.close();
        assert!(!dd.apply_focus(request));
        assert!(!dd.search_focused());

        // Reopened: the old request belongs to the previous panel.
        let fresh = dd.open().unwrap();
        assert!(!dd.apply_focus(request));
        assert!(dd.apply_focus(fresh));
    }

    #[test]
    fn focus_gained_focuses_open_search() {
        let mut dd = names();
        dd.update(Message::FocusGained);
        assert!(!dd.search_focused());
        dd.open();
        dd.update(Message::FocusGained);
        assert!(dd.search_focused());
    }

    // --- animation ---

    #[test]
    fn animation_runs_then_settles() {
        let mut dd = names().with_animation_frames(2);
        assert!(dd.subscriptions().is_empty());

        dd.open();
        assert_eq!(dd.animation(), Animation::Opening { frame: 0 });
        assert_eq!(dd.subscriptions().len(), 1);
        dd.update(Message::AnimationTick);
        assert_eq!(dd.animation(), Animation::Opening { frame: 1 });
        dd.update(Message::AnimationTick);
        assert_eq!(dd.animation(), Animation::Open);
        assert!(dd.subscriptions().is_empty());

        dd.close();
        assert_eq!(dd.animation(), Animation::Closing { frame: 0 });
        dd.update(Message::AnimationTick);
        dd.update(Message::AnimationTick);
        assert_eq!(dd.animation(), Animation::Closed);
    }

    #[test]
    fn reveal_grows_with_frames() {
        let frames = 4;
        let opening: Vec<usize> = (0..frames)
            .map(|frame| Animation::Opening { frame }.revealed(10, frames))
            .collect();
        assert_eq!(opening, vec![2, 4, 6, 8]);
        assert_eq!(Animation::Open.revealed(10, frames), 10);
        assert_eq!(Animation::Closing { frame: 3 }.revealed(10, frames), 2);
        assert_eq!(Animation::Closed.revealed(10, frames), 0);
    }

    #[test]
    fn each_instance_gets_its_own_reveal_timer() {
        let mut a = names().with_animation_frames(2);
        let mut b = names().with_animation_frames(2);
        a.open();
        b.open();
        let a_subs = a.subscriptions();
        let b_subs = b.subscriptions();
        assert_ne!(a_subs[0].id(), b_subs[0].id());
    }

    #[test]
    fn two_dropdowns_animate_at_once() {
        let mut a = names().with_animation_frames(2);
        let mut b = names().with_animation_frames(2);
        a.open();
        a.update(Message::AnimationTick);
        a.update(Message::AnimationTick);
        assert_eq!(a.animation(), Animation::Open);

        // Moving to the second dropdown blurs the first.
        a.update(Message::FocusLost);
        b.open();
        assert!(a.animation().is_running() && b.animation().is_running());
        let ids: Vec<_> = a
            .subscriptions()
            .iter()
            .chain(b.subscriptions().iter())
            .map(|s| s.id().clone())
            .collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);

        for _ in 0..2 {
            a.update(Message::AnimationTick);
            b.update(Message::AnimationTick);
        }
        assert_eq!(a.animation(), Animation::Closed);
        assert_eq!(b.animation(), Animation::Open);
        assert!(a.subscriptions().is_empty() && b.subscriptions().is_empty());
    }

    #[test]
    fn without_frames_open_is_immediate() {
        let mut dd = names();
        dd.open();
        assert_eq!(dd.animation(), Animation::Open);
        dd.close();
        assert_eq!(dd.animation(), Animation::Closed);
    }

    // --- rendering and pointer ---

    #[test]
    fn closed_render_shows_label_and_chevron() {
        let dd = names();
        let out = render(&dd, 30, 10);
        assert!(out.contains("Select Option"));
        assert!(out.contains('▾'));
        assert!(!out.contains("Albert"));
    }

    #[test]
    fn open_render_lists_matches_with_marker() {
        let mut dd = names();
        dd.open();
        dd.set_search_text("L").unwrap();
        dd.move_highlight(Direction::Down);
        let out = render(&dd, 30, 10);
        assert!(out.contains('▴'));
        assert!(out.contains("  Lisa"));
        assert!(out.contains("▸ Lars"));
        assert!(out.contains("  Lynea"));
        assert!(!out.contains("Albert"));
    }

    #[test]
    fn render_reports_no_matches() {
        let mut dd = names();
        dd.open();
        dd.set_search_text("qq").unwrap();
        assert!(render(&dd, 30, 10).contains("No matches"));
    }

    #[test]
    fn render_marks_selected_option() {
        let mut dd = names();
        dd.open();
        dd.select_option("Lisa").unwrap();
        assert!(render(&dd, 30, 10).contains("Lisa"));
        dd.open();
        assert!(render(&dd, 30, 12).contains("Lisa ✓"));
    }

    #[test]
    fn panel_scrolls_with_highlight() {
        let mut dd = names().with_max_visible(3);
        dd.open();
        for _ in 0..4 {
            dd.move_highlight(Direction::Down);
        }
        let out = render(&dd, 30, 10);
        assert!(out.contains("▸ Monica"));
        assert!(!out.contains("Albert"));
    }

    #[test]
    fn short_frame_keeps_highlight_on_screen() {
        let mut dd = dropdown(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        dd.open();
        for _ in 0..5 {
            dd.move_highlight(Direction::Down);
        }
        // Header takes 3 rows, leaving a panel with 3 option rows.
        let out = render(&dd, 30, 8);
        assert!(out.contains("▸ F"));
        assert!(out.contains("  D"));
        assert!(!out.contains("  A"));

        // Row hit-testing follows the offset that was drawn.
        let cmd = dd.update(click(5, 4));
        match cmd.into_message() {
            Some(Message::Selected(value)) => assert_eq!(value, "D"),
            other => panic!("Expected Selected(D), got {other:?}"),
        }
    }

    #[test]
    fn arrow_click_toggles() {
        let mut dd = names();
        render(&dd, 30, 12);
        // Inner header spans x 1..29 on row 1; the chevron takes the last 3.
        let cmd = dd.update(click(27, 1));
        assert!(dd.is_open());
        assert!(matches!(cmd.into_message(), Some(Message::FocusSearch(_))));

        render(&dd, 30, 12);
        dd.update(click(27, 1));
        assert!(!dd.is_open());
    }

    #[test]
    fn header_click_opens() {
        let mut dd = names();
        render(&dd, 30, 12);
        dd.update(click(5, 1));
        assert!(dd.is_open());
    }

    #[test]
    fn option_click_selects_row_under_pointer() {
        let mut dd = names();
        dd.open();
        render(&dd, 30, 12);
        // Panel border on row 3, first option on row 4.
        let cmd = dd.update(click(5, 5));
        match cmd.into_message() {
            Some(Message::Selected(value)) => assert_eq!(value, "Lisa"),
            other => panic!("Expected Selected(Lisa), got {other:?}"),
        }
        assert!(!dd.is_open());
    }

    #[test]
    fn hover_moves_highlight() {
        let mut dd = names();
        dd.open();
        render(&dd, 30, 12);
        dd.update(Message::Mouse(mouse(MouseEventKind::Moved, 5, 6)));
        assert_eq!(dd.highlighted(), 2);

        dd.update(Message::Hover(4));
        assert_eq!(dd.highlighted(), 4);
        dd.update(Message::Hover(40));
        assert_eq!(dd.highlighted(), 4);
    }

    #[test]
    fn wheel_over_panel_moves_highlight() {
        let mut dd = names();
        dd.open();
        render(&dd, 30, 12);
        dd.update(Message::Mouse(mouse(MouseEventKind::ScrollDown, 5, 6)));
        assert_eq!(dd.highlighted(), 1);
        dd.update(Message::Mouse(mouse(MouseEventKind::ScrollUp, 5, 6)));
        assert_eq!(dd.highlighted(), 0);
    }

    #[test]
    fn click_outside_cancels() {
        let mut dd = names();
        dd.open();
        dd.set_search_text("Li").unwrap();
        render(&dd, 40, 20);
        let cmd = dd.update(click(35, 18));
        assert!(cmd.is_none());
        assert!(!dd.is_open());
        assert_eq!(dd.selected(), None);
    }

    #[test]
    fn clicks_ignored_while_closing() {
        let mut dd = names().with_animation_frames(3);
        dd.open();
        for _ in 0..3 {
            dd.update(Message::AnimationTick);
        }
        dd.close();
        render(&dd, 30, 12);
        let cmd = dd.update(click(5, 4));
        assert!(cmd.is_none());
        assert_eq!(dd.selected(), None);
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("Antonietta", 20), "Antonietta");
        assert_eq!(truncate("Antonietta", 5), "Anto…");
        assert_eq!(truncate("日本語", 4), "日…");
        assert_eq!(truncate("abc", 0), "");
    }
}
