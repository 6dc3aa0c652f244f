//! Output rendering for the chat REPL.
//!
//! This module provides a renderer trait and a plain-text implementation
//! that prints paced reply prefixes incrementally to stdout.

use std::io::{self, Stdout, Write};

/// ANSI escape code for dim text (used for informational messages).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Alternative UI surfaces
pub trait Renderer: Send {
    /// Called before the first chunk of a reply.
    fn begin_reply(&mut self);

    /// Print one cumulative reply prefix.
    ///
    /// Chunks arrive as growing prefixes of the full reply; implementations
    /// emit only what is new since the previous chunk.
    fn print_chunk(&mut self, chunk: &str);

    /// Called when a reply is complete or was stopped early.
    fn finish_reply(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    printed: usize,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            printed: 0,
        }
    }

    /// Flushes stdout to ensure immediate display of paced content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn begin_reply(&mut self) {
        self.printed = 0;
    }

    fn print_chunk(&mut self, chunk: &str) {
        // Chunks are cumulative prefixes; print only the unseen suffix.
        if chunk.len() > self.printed {
            print!("{}", &chunk[self.printed..]);
            self.printed = chunk.len();
            self.flush();
        }
    }

    fn finish_reply(&mut self) {
        println!();
        self.printed = 0;
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}error: {error}{ANSI_RESET}");
        } else {
            eprintln!("error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        if self.use_color {
            println!("{ANSI_DIM}{info}{ANSI_RESET}");
        } else {
            println!("{info}");
        }
    }
}
