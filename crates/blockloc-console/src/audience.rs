//! Coloured notices on the terminal.

use std::io::{self, Write};

use blockloc::{Audience, Notice, Tone};
use crossterm::queue;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};

/// Prints notices to stdout: errors red, info grey, the highlighted
/// fragment bold yellow.
#[derive(Debug, Default)]
pub struct ConsoleAudience;

impl Audience for ConsoleAudience {
    fn send(&self, notice: &Notice) {
        let color = match notice.tone() {
            Tone::Error => Color::Red,
            Tone::Info => Color::Grey,
        };
        let (before, highlight, after) = notice.parts();

        let mut stdout = io::stdout().lock();
        let written = queue!(
            stdout,
            Print("\r"),
            PrintStyledContent(before.with(color)),
            PrintStyledContent(highlight.with(Color::Yellow).bold()),
            PrintStyledContent(after.with(color)),
            Print("\n"),
        )
        .and_then(|()| stdout.flush());

        if let Err(e) = written {
            tracing::warn!("Failed to write notice: {}", e);
        }
    }
}
