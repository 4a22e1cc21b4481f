//! Pure rendering of session snapshots into terminal lines.

use chat_protocol::{Message, Role};
use chat_session::SessionSnapshot;
use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LOADING_TEXT: &str = "AI is thinking...";
pub const DEFAULT_COLUMNS: usize = 80;
const MIN_COLUMNS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub columns: usize,
    pub color: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            color: true,
        }
    }
}

impl ViewOptions {
    fn columns(&self) -> usize {
        self.columns.max(MIN_COLUMNS)
    }

    /// Widest a message bubble may grow before wrapping.
    fn bubble_width(&self) -> usize {
        (self.columns() * 2 / 3).max(MIN_COLUMNS / 2)
    }
}

/// Renders one message: user messages right-aligned, assistant messages left-aligned.
pub fn render_message(message: &Message, options: &ViewOptions) -> Vec<String> {
    let columns = options.columns();
    let mut lines = Vec::new();

    for line in wrap_text(&message.content, options.bubble_width()) {
        let width = line.width();
        let padded = match message.role {
            Role::User => format!("{}{line}", " ".repeat(columns.saturating_sub(width))),
            Role::Assistant => line,
        };

        lines.push(if options.color {
            match message.role {
                Role::User => padded.bright_blue().to_string(),
                Role::Assistant => padded.normal().to_string(),
            }
        } else {
            padded
        });
    }

    lines
}

/// Renders the in-flight indicator centered in the view.
pub fn render_loading(options: &ViewOptions) -> String {
    let columns = options.columns();
    let pad = columns.saturating_sub(LOADING_TEXT.width()) / 2;
    let line = format!("{}{LOADING_TEXT}", " ".repeat(pad));
    if options.color {
        line.bright_black().to_string()
    } else {
        line
    }
}

/// Full-screen rendering of a snapshot.
pub fn render_snapshot(snapshot: &SessionSnapshot, options: &ViewOptions) -> Vec<String> {
    let mut lines = Vec::new();
    for message in &snapshot.transcript {
        lines.extend(render_message(message, options));
        lines.push(String::new());
    }
    if snapshot.in_flight {
        lines.push(render_loading(options));
    }
    lines
}

/// Incremental scrollback renderer: emits only messages not yet printed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranscriptView {
    rendered: usize,
}

/// Lines to append plus the desired loader state after a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewUpdate {
    pub lines: Vec<String>,
    pub show_loader: bool,
}

impl TranscriptView {
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn update(&mut self, snapshot: &SessionSnapshot, options: &ViewOptions) -> ViewUpdate {
        let mut lines = Vec::new();
        for message in snapshot.transcript.iter().skip(self.rendered) {
            lines.extend(render_message(message, options));
            lines.push(String::new());
        }
        self.rendered = self.rendered.max(snapshot.transcript.len());

        ViewUpdate {
            lines,
            show_loader: snapshot.in_flight,
        }
    }
}

/// Word-wraps `text` to `max_width` display columns, splitting overlong words.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let separator = usize::from(!current.is_empty());

            if current_width + separator + word_width <= max_width {
                if separator == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += separator + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= max_width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }

        lines.push(current);
    }

    lines
}
