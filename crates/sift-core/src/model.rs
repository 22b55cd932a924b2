use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait, following the [Elm Architecture].
///
/// The runtime drives an **init -> update -> view** cycle:
///
/// 1. [`init`](Model::init) creates the initial state.
/// 2. [`view`](Model::view) renders the current state to a [`ratatui::Frame`].
/// 3. Terminal events arrive as messages through [`Subscription`]s.
/// 4. [`update`](Model::update) applies each message and may return a
///    [`Command`].
/// 5. Steps 2--4 repeat until a [`Command::quit`].
///
/// State changes are observed by re-rendering after every update, so models
/// never notify the view themselves.
///
/// [Elm Architecture]: https://guide.elm-lang.org/architecture/
pub trait Model: Sized + Send + 'static {
    /// The application's message type.
    type Message: Send + 'static;

    /// Initialization data passed to [`Model::init`].
    type Flags: Send + 'static;

    /// Create the initial model state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Must be a pure function of `&self` apart
    /// from interior layout caches used for hit-testing.
    fn view(&self, frame: &mut Frame);

    /// Declare active subscriptions. Called after every update; the runtime
    /// starts new ones and cancels the ones no longer returned.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
