//! Line-oriented chat front end.
//!
//! The controller publishes snapshots through a subscription that forwards them
//! over a channel; [`Repl`] drains that channel on the input thread so terminal
//! output never races the readline prompt.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use chat_session::{ChatController, SessionSnapshot, SubscriptionId};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;

use crate::view::{render_loading, TranscriptView, ViewOptions};

pub const TITLE: &str = "AI Agent Chat";
pub const PROMPT: &str = "> ";
pub const INPUT_HINT: &str =
    "Ask your agent anything... (try 'search the web for the latest AI news')";
const HELP_TEXT: &str = "Type a message and press Enter to send it. /help shows this text, /quit or /exit leaves.";
const CLEAR_LINE: &str = "\r\x1b[2K";

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("terminal input failed: {0}")]
    Readline(#[from] ReadlineError),

    #[error("terminal output failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Quit,
}

/// Recognizes front-end commands. Any other input, slash-prefixed or not, is a
/// chat message.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    match trimmed.split_whitespace().next()? {
        "/help" => Some(SlashCommand::Help),
        "/quit" | "/exit" => Some(SlashCommand::Quit),
        _ => None,
    }
}

/// Writes transcript growth and the loading indicator to a terminal sink.
pub struct Frontend<W: Write> {
    out: W,
    view: TranscriptView,
    options: ViewOptions,
    loader_visible: bool,
}

impl<W: Write> Frontend<W> {
    pub fn new(out: W, options: ViewOptions) -> Self {
        Self {
            out,
            view: TranscriptView::default(),
            options,
            loader_visible: false,
        }
    }

    pub fn loader_visible(&self) -> bool {
        self.loader_visible
    }

    pub fn apply(&mut self, snapshot: &SessionSnapshot) -> io::Result<()> {
        let update = self.view.update(snapshot, &self.options);

        if self.loader_visible && (!update.lines.is_empty() || !update.show_loader) {
            write!(self.out, "{CLEAR_LINE}")?;
            self.loader_visible = false;
        }

        for line in &update.lines {
            writeln!(self.out, "{line}")?;
        }

        if update.show_loader && !self.loader_visible {
            write!(self.out, "{}", render_loading(&self.options))?;
            self.loader_visible = true;
        }

        self.out.flush()
    }

    pub fn write_notice(&mut self, text: &str) -> io::Result<()> {
        let line = if self.options.color {
            text.bright_black().to_string()
        } else {
            text.to_string()
        };
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Continue,
    Exit,
}

/// Binds a [`Frontend`] to a controller's snapshot stream.
pub struct Repl<W: Write> {
    controller: Arc<ChatController>,
    frontend: Frontend<W>,
    snapshots: Receiver<SessionSnapshot>,
    subscription: SubscriptionId,
}

impl<W: Write> Repl<W> {
    pub fn new(controller: Arc<ChatController>, out: W, options: ViewOptions) -> Self {
        let (tx, snapshots) = mpsc::channel();
        let subscription = controller.subscribe(Box::new(move |snapshot: &SessionSnapshot| {
            let _ = tx.send(snapshot.clone());
        }));

        Self {
            controller,
            frontend: Frontend::new(out, options),
            snapshots,
            subscription,
        }
    }

    pub fn write_banner(&mut self) -> io::Result<()> {
        self.frontend.write_notice(TITLE)?;
        self.frontend.write_notice(INPUT_HINT)
    }

    /// Handles one line of input, blocking until an accepted message resolves.
    pub fn handle_line(&mut self, line: &str) -> io::Result<LineAction> {
        match parse_slash_command(line) {
            Some(SlashCommand::Quit) => return Ok(LineAction::Exit),
            Some(SlashCommand::Help) => {
                self.frontend.write_notice(HELP_TEXT)?;
                return Ok(LineAction::Continue);
            }
            None => {}
        }

        self.controller.update_input(line);
        match self.controller.submit() {
            Some(request_id) => {
                tracing::debug!(request_id, "waiting for chat reply");
                self.wait_for_resolution()?;
            }
            None => self.drain_pending()?,
        }

        Ok(LineAction::Continue)
    }

    /// Blocks until the snapshot stream shows the request entering and then
    /// leaving flight. Relies on the controller always reconciling an accepted
    /// request, including when the transport panics; the sender lives in the
    /// session listener, so `recv` never disconnects on its own.
    fn wait_for_resolution(&mut self) -> io::Result<()> {
        let mut seen_flight = false;
        while let Ok(snapshot) = self.snapshots.recv() {
            self.frontend.apply(&snapshot)?;
            if snapshot.in_flight {
                seen_flight = true;
            } else if seen_flight {
                break;
            }
        }
        Ok(())
    }

    fn drain_pending(&mut self) -> io::Result<()> {
        while let Ok(snapshot) = self.snapshots.try_recv() {
            self.frontend.apply(&snapshot)?;
        }
        Ok(())
    }

    pub fn finish(self) -> W {
        self.controller.unsubscribe(self.subscription);
        self.frontend.into_inner()
    }
}

/// Runs the interactive loop on stdin/stdout until `/quit` or end of input.
pub fn run(controller: Arc<ChatController>, options: ViewOptions) -> Result<(), ReplError> {
    let mut editor = DefaultEditor::new()?;
    let mut repl = Repl::new(controller, io::stdout(), options);
    repl.write_banner()?;

    let result = loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                match repl.handle_line(&line) {
                    Ok(LineAction::Continue) => {}
                    Ok(LineAction::Exit) => break Ok(()),
                    Err(error) => break Err(error.into()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                if let Err(error) = repl.frontend.write_notice("Interrupted. Type /quit to exit.") {
                    break Err(error.into());
                }
            }
            Err(ReadlineError::Eof) => break Ok(()),
            Err(error) => break Err(error.into()),
        }
    };

    repl.finish();
    result
}
