use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use std::collections::VecDeque;

/// A headless harness that drives a [`Model`] without a real terminal.
///
/// Immediate messages ([`Command::message`]) are queued exactly like the
/// runtime queues them: [`send`](TestProgram::send) applies one update and
/// leaves follow-up messages pending until
/// [`drain_messages`](TestProgram::drain_messages). That keeps deferred work
/// (such as a focus request issued on open) observable between the two
/// steps.
///
/// ```rust,ignore
/// use sift_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<App>::new(names());
/// prog.send(Msg::Key(enter));
/// prog.drain_messages();
/// assert!(prog.render_string(40, 10).contains("Select Option"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: VecDeque<M::Message>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: VecDeque::new(),
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Apply one update; resulting immediate messages stay pending.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process pending messages, including ones they produce, until the queue
    /// is empty.
    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.pending_messages.pop_front() {
            let cmd = self.model.update(msg);
            self.collect(cmd);
        }
    }

    /// Number of messages waiting to be delivered.
    pub fn pending(&self) -> usize {
        self.pending_messages.len()
    }

    /// Whether any update returned [`Command::quit`].
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Render the model into a buffer of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("test backend never fails");
        terminal
            .draw(|frame| self.model.view(frame))
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// Render the model and return its rows joined by newlines.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => self.pending_messages.push_back(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

/// Flatten a buffer into text, one line per row.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}
