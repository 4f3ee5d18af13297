// This file is part of nyxsh, a command shell.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The input source boundary: everything about line editing, history, and
//! prompt rendering lives outside this crate. `nyxsh` only needs a way to
//! ask for the next line.

use nix::errno::Errno;
use std::io::{self, Write};
use std::os::fd::RawFd;

/// A line-oriented provider of input, used both for the top-level read-eval
/// loop and for heredoc body capture.
///
/// The production implementation is a thin wrapper over standard input; an
/// interactive line editor with history and color theming is an external
/// collaborator this crate only talks to through this trait.
pub trait LineSource {
    /// Renders `prompt` (which may contain opaque byte sequences a real
    /// renderer would strip for cursor positioning) and returns the next
    /// line without its trailing newline, or `None` at end of input.
    ///
    /// Returns an `io::Error` of kind [`io::ErrorKind::Interrupted`] when a
    /// signal (`SIGINT`) arrives mid-read rather than retrying the read, so
    /// callers can tell a real `SIGINT` abort apart from ordinary input.
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

const STDIN_FD: RawFd = 0;

/// Reads lines from raw `fd` 0 one byte at a time via `nix::unistd::read`,
/// rendering prompts to stdout.
///
/// Unlike `BufRead::read_line`, which retries internally on
/// `ErrorKind::Interrupted`, this never retries a read interrupted by a
/// signal: the signal handlers this crate installs use `SaFlags::empty()`
/// (no `SA_RESTART`), so a `SIGINT` arriving mid-read makes the underlying
/// `read(2)` return `EINTR`, which is surfaced to the caller immediately
/// instead of being swallowed.
pub struct StdinSource;

impl StdinSource {
    pub fn new() -> Self {
        StdinSource
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinSource {
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut bytes = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match nix::unistd::read(STDIN_FD, &mut byte) {
                Ok(0) => {
                    if bytes.is_empty() {
                        return Ok(None);
                    }
                    break;
                }
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    bytes.push(byte[0]);
                }
                Err(Errno::EINTR) => {
                    return Err(io::Error::from(io::ErrorKind::Interrupted));
                }
                Err(e) => return Err(io::Error::from(e)),
            }
        }
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}
