//! I/O boundary traits for testability
//!
//! The game engine only talks to the user through [`Terminal`], allowing it
//! to be driven by scripted input in tests.

use std::io::{self, BufRead, Write};

/// Line-oriented console abstraction.
pub trait Terminal {
    /// Read one line of input without its line terminator.
    /// Returns None once input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Write text as-is and flush it, so prompts without a trailing newline
    /// are visible before the next read.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Write text followed by a newline.
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Terminal over any buffered reader and writer.
#[derive(Debug)]
pub struct StreamTerminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamTerminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Terminal for StreamTerminal<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }
}

/// Terminal bound to the process's stdin and stdout.
pub type StdTerminal = StreamTerminal<io::StdinLock<'static>, io::Stdout>;

impl StdTerminal {
    pub fn stdio() -> Self {
        StreamTerminal::new(io::stdin().lock(), io::stdout())
    }
}
