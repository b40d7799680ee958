use std::{
    fmt::Display,
    io::{stdout, Stdout, Write},
};

use crossterm::{
    cursor::{MoveTo, MoveToNextLine},
    terminal::{Clear, ClearType},
    ExecutableCommand, QueueableCommand,
};

/// This structure should be used when trying to print the game world to
/// the console. It redraws the screen from the top left corner to avoid
/// continuous console buffer scrolling.
///
/// With `redraw` disabled every print simply scrolls, which is handier
/// when the output is piped or mixed with log lines.
pub struct Terminal {
    stdout: Stdout,
    redraw: bool,
}

impl Terminal {
    pub fn new(redraw: bool) -> Self {
        Self {
            stdout: stdout(),
            redraw,
        }
    }

    pub fn clear_screen(&mut self) {
        if self.redraw {
            let _ = self.stdout.queue(Clear(ClearType::All));
            self.move_caret_to_origin();
        }
    }

    pub fn move_caret_to_origin(&mut self) {
        if self.redraw {
            let _ = self.stdout.execute(MoveTo(0, 0));
        }
    }

    pub fn println<T: Display>(&mut self, printable: T) {
        if self.redraw {
            self.println_text(format!("{printable}"));
        } else {
            println!("{printable}");
        }
    }
}

// Private functions
impl Terminal {
    fn println_text(&mut self, text: String) {
        for line in text.split('\n') {
            let _ = write!(self.stdout, "{line}");
            let _ = self.stdout.queue(Clear(ClearType::UntilNewLine));
            let _ = self.stdout.queue(MoveToNextLine(1));
        }

        let _ = self.stdout.flush();
    }
}
