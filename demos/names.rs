//! # Names Example
//!
//! A host for the searchable dropdown: a title, the dropdown, and a status
//! line that shows the last name picked.
//!
//! Click the header or press Enter to open, type to filter, Up/Down or the
//! mouse to highlight, Enter or click to pick. `q` or Esc quits while the
//! dropdown is closed; Ctrl+C always quits.
//!
//! Run with: `cargo run --example names`
//! Log to a file with: `SIFT_LOG=sift.log cargo run --example names`

use sift::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sift::ratatui::layout::{Constraint, Layout, Rect};
use sift::ratatui::style::{Color, Modifier, Style};
use sift::ratatui::text::{Line, Span};
use sift::ratatui::widgets::Paragraph;
use sift::ratatui::Frame;
use sift::widgets::searchable_dropdown::{self, SearchableDropdown};
use sift::{
    terminal_events, Command, Component, Model, MouseMode, ProgramOptions, Subscription,
    TerminalEvent,
};

const TITLE: &str = "Searchable dropdown";
const DROPDOWN_WIDTH: u16 = 40;

const NAMES: &[&str] = &[
    "Albert",
    "Lisa",
    "Lars",
    "Jesper",
    "Monica",
    "Randal",
    "Lynea",
    "Elspeth",
    "Rosalinde",
    "Marketa",
    "Jeremie",
    "Celesta",
    "Antonietta",
    "Sebastian",
];

struct NamesApp {
    dropdown: SearchableDropdown,
    picked: Option<String>,
}

#[derive(Debug)]
enum Msg {
    Key(KeyEvent),
    Dropdown(searchable_dropdown::Message),
}

impl Model for NamesApp {
    type Message = Msg;
    type Flags = Vec<String>;

    fn init(names: Vec<String>) -> (Self, Command<Msg>) {
        (
            NamesApp {
                dropdown: SearchableDropdown::new(names),
                picked: None,
            },
            Command::none(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Key(key) => match (key.code, key.modifiers) {
                (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Command::quit(),
                (KeyCode::Char('q') | KeyCode::Esc, _) if !self.dropdown.is_open() => {
                    Command::quit()
                }
                _ => self
                    .dropdown
                    .update(searchable_dropdown::Message::KeyPress(key))
                    .map(Msg::Dropdown),
            },
            Msg::Dropdown(searchable_dropdown::Message::Selected(name)) => {
                self.picked = Some(name);
                Command::none()
            }
            Msg::Dropdown(m) => self.dropdown.update(m).map(Msg::Dropdown),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [title_area, status_area, dropdown_area, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let title = Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, title_area);

        let status = match self.picked {
            Some(ref name) => Line::from(vec![
                Span::raw("You picked: "),
                Span::styled(
                    name.as_str(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            None => Line::from(Span::styled(
                "Nothing picked yet",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(status), status_area);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("Type", Style::default().fg(Color::DarkGray)),
            Span::raw(" to filter  "),
            Span::styled("Up/Down", Style::default().fg(Color::DarkGray)),
            Span::raw(" navigate  "),
            Span::styled("Enter", Style::default().fg(Color::DarkGray)),
            Span::raw(" select  "),
            Span::styled("q", Style::default().fg(Color::DarkGray)),
            Span::raw(" quit"),
        ]));
        frame.render_widget(help, help_area);

        // The panel may draw past dropdown_area, over the help line.
        let area = Rect {
            width: dropdown_area.width.min(DROPDOWN_WIDTH),
            ..dropdown_area
        };
        self.dropdown.view(frame, area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|ev| match ev {
            TerminalEvent::Key(key) => Some(Msg::Key(key)),
            TerminalEvent::Mouse(mouse) => {
                Some(Msg::Dropdown(searchable_dropdown::Message::Mouse(mouse)))
            }
            TerminalEvent::Paste(text) => {
                Some(Msg::Dropdown(searchable_dropdown::Message::Paste(text)))
            }
            TerminalEvent::FocusGained => {
                Some(Msg::Dropdown(searchable_dropdown::Message::FocusGained))
            }
            TerminalEvent::FocusLost => Some(Msg::Dropdown(searchable_dropdown::Message::FocusLost)),
            TerminalEvent::Resize(..) => None,
        })];
        subs.extend(
            self.dropdown
                .subscriptions()
                .into_iter()
                .map(|s| s.map(Msg::Dropdown)),
        );
        subs
    }
}

#[sift::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ProgramOptions {
        title: Some(TITLE.to_string()),
        mouse_mode: Some(MouseMode::AllMotion),
        focus_reporting: true,
        log_file: std::env::var_os("SIFT_LOG").map(Into::into),
        ..ProgramOptions::default()
    };
    let names = NAMES.iter().map(|s| s.to_string()).collect();
    let app = sift::run_with::<NamesApp>(names, options).await?;
    if let Some(name) = app.picked {
        println!("{name}");
    }
    Ok(())
}
