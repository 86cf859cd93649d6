//! Host Interface
//!
//! Defines the trait that bridges the evaluator (which never touches the process
//! directly) and whatever console the host provides for `print` and `read`.

use crate::runtime::error::{RuntimeError, RuntimeResult};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

/// The IoHost provides the line-based console used by the I/O builtins.
pub trait IoHost: fmt::Debug {
    /// Writes one line of output. The host appends the line terminator.
    fn print_line(&self, line: &str) -> RuntimeResult<()>;

    /// Blocks for one line of input, without its terminator.
    /// Returns `None` once the input is exhausted.
    fn read_line(&self) -> RuntimeResult<Option<String>>;
}

/// Process stdout/stdin.
#[derive(Debug, Default)]
pub struct StdioHost;

impl IoHost for StdioHost {
    fn print_line(&self, line: &str) -> RuntimeResult<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()?;
        Ok(())
    }

    fn read_line(&self) -> RuntimeResult<Option<String>> {
        let mut buf = String::new();
        let read = io::stdin().lock().read_line(&mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }
}

/// In-memory console: replays queued input lines and records output.
#[derive(Debug, Default)]
pub struct BufferedHost {
    input: RefCell<VecDeque<String>>,
    output: RefCell<Vec<String>>,
}

impl BufferedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BufferedHost {
            input: RefCell::new(lines.into_iter().map(Into::into).collect()),
            output: RefCell::new(Vec::new()),
        }
    }

    pub fn push_input(&self, line: impl Into<String>) {
        self.input.borrow_mut().push_back(line.into());
    }

    /// Lines printed so far.
    pub fn output(&self) -> Vec<String> {
        self.output.borrow().clone()
    }
}

impl IoHost for BufferedHost {
    fn print_line(&self, line: &str) -> RuntimeResult<()> {
        self.output.borrow_mut().push(line.to_string());
        Ok(())
    }

    fn read_line(&self) -> RuntimeResult<Option<String>> {
        Ok(self.input.borrow_mut().pop_front())
    }
}

pub(crate) fn end_of_input() -> RuntimeError {
    RuntimeError::IoError("end of input".to_string())
}
