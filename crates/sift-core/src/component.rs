use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// A `Component` is owned directly by its parent model; there is no registry
/// or lookup by name. The parent wraps the component's message type in one of
/// its own variants, forwards events to [`update`](Component::update), and
/// lifts the returned command with [`Command::map`]:
///
/// ```rust,ignore
/// use sift_core::{Command, Component, Model};
/// use sift_widgets::searchable_dropdown::{self, SearchableDropdown};
///
/// struct App { picker: SearchableDropdown, chosen: Option<String> }
///
/// enum Msg { Picker(searchable_dropdown::Message) }
///
/// impl Model for App {
///     type Message = Msg;
///     type Flags = Vec<String>;
///
///     fn init(options: Vec<String>) -> (Self, Command<Msg>) {
///         let picker = SearchableDropdown::new(options);
///         (App { picker, chosen: None }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Picker(searchable_dropdown::Message::Selected(value)) => {
///                 self.chosen = Some(value);
///                 Command::none()
///             }
///             Msg::Picker(m) => self.picker.update(m).map(Msg::Picker),
///         }
///     }
///
///     fn view(&self, frame: &mut ratatui::Frame) {
///         self.picker.view(frame, frame.area());
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations should confine drawing to it,
    /// except for overlays that deliberately extend below their anchor.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Subscriptions the component needs right now. The parent includes
    /// them (mapped) in its own [`Model::subscriptions`](crate::Model::subscriptions).
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently wants keyboard input.
    fn focused(&self) -> bool {
        false
    }
}
