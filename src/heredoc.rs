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

//! Heredoc body capture: runs after expansion, before any process is
//! spawned, so prompt output never interleaves with a running child and a
//! `SIGINT` during capture cleanly aborts the whole command line without an
//! orphaned child to reap.

use crate::env::Environment;
use crate::expand::expand_variables_into;
use crate::input::LineSource;
use crate::syntax::{Node, RedirKind};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeredocError {
    #[error("i/o error reading heredoc body: {0}")]
    Io(#[from] std::io::Error),
    #[error("i/o error creating heredoc pipe: {0}")]
    Pipe(#[from] nix::errno::Errno),
    #[error("interrupted")]
    Interrupted,
}

/// Reads one heredoc body from `input`, terminating on a line that equals
/// `delimiter` exactly (discarded) or end of input (a warning condition:
/// the collected body so far is treated as complete).
fn read_body(
    input: &mut dyn LineSource,
    delimiter: &str,
    expand: bool,
    env: &Environment,
    last_status: u8,
    interrupted: &AtomicBool,
) -> Result<String, HeredocError> {
    let mut body = String::new();
    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            return Err(HeredocError::Interrupted);
        }
        let line = match input.next_line("> ") {
            Ok(Some(line)) => line,
            Ok(None) => {
                // EOF before the delimiter: warn, treat the body collected
                // so far as complete.
                log::warn!("heredoc terminated by end of input before delimiter {delimiter:?}");
                break;
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                // A SIGINT mid-read never produced a line; the read itself
                // surfaces the interruption instead of retrying, so check
                // (and clear) the flag here rather than waiting for the next
                // loop iteration's check.
                interrupted.swap(false, Ordering::SeqCst);
                return Err(HeredocError::Interrupted);
            }
            Err(e) => return Err(HeredocError::Io(e)),
        };
        if line == delimiter {
            break;
        }
        if expand {
            expand_variables_into(&mut body, &line, env, last_status);
        } else {
            body.push_str(&line);
        }
        body.push('\n');
    }
    Ok(body)
}

/// Writes `body` into a freshly created pipe and returns its read end, with
/// the write end closed.
fn backing_pipe(body: &str) -> Result<std::os::fd::OwnedFd, HeredocError> {
    let (read_end, write_end) = nix::unistd::pipe()?;
    let mut file = std::fs::File::from(write_end);
    file.write_all(body.as_bytes())?;
    drop(file); // closes the write end so the reader sees EOF
    Ok(read_end)
}

/// Collects every heredoc on one `Command`'s redirection list, left to
/// right. All are read in full (a chained heredoc with no further use is
/// still consumed for syntactic compliance), but only the last one's
/// descriptor is retained in `cmd.heredoc_fd`.
fn collect_for_command(
    cmd: &mut crate::syntax::Command,
    input: &mut dyn LineSource,
    env: &Environment,
    last_status: u8,
    interrupted: &AtomicBool,
) -> Result<(), HeredocError> {
    for redir in &mut cmd.redirs {
        if redir.kind != RedirKind::Heredoc {
            continue;
        }
        let (delimiter, quoted) = crate::expand::heredoc_delimiter(&redir.target);
        let body = read_body(input, &delimiter, !quoted, env, last_status, interrupted)?;
        let fd = backing_pipe(&body)?;
        cmd.heredoc_fd = Some(fd);
    }
    Ok(())
}

/// Traverses the tree left-to-right, collecting every heredoc before any
/// process is spawned.
pub fn collect(
    node: &mut Node,
    input: &mut dyn LineSource,
    env: &Environment,
    last_status: u8,
    interrupted: &AtomicBool,
) -> Result<(), HeredocError> {
    match node {
        Node::Cmd(cmd) => collect_for_command(cmd, input, env, last_status, interrupted),
        Node::Pipe(l, r) | Node::And(l, r) | Node::Or(l, r) => {
            collect(l, input, env, last_status, interrupted)?;
            collect(r, input, env, last_status, interrupted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;
    use std::io;

    struct ScriptedInput {
        lines: std::collections::VecDeque<String>,
    }

    impl ScriptedInput {
        fn new(lines: &[&str]) -> Self {
            ScriptedInput {
                lines: lines.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl LineSource for ScriptedInput {
        fn next_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(self.lines.pop_front())
        }
    }

    fn read_fd_to_string(fd: std::os::fd::OwnedFd) -> String {
        use std::io::Read;
        let mut file = std::fs::File::from(fd);
        let mut s = String::new();
        file.read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn unquoted_delimiter_expands_body_lines() {
        let mut env = Environment::new();
        env.set("USER", b"ada".to_vec());
        let mut node = parse(lex("cat <<END").unwrap()).unwrap().unwrap();
        crate::expand::expand_tree(&mut node, &env, 0);
        let mut input = ScriptedInput::new(&["hi $USER", "END"]);
        let interrupted = AtomicBool::new(false);
        collect(&mut node, &mut input, &env, 0, &interrupted).unwrap();
        let crate::syntax::Node::Cmd(cmd) = node else {
            panic!("expected cmd")
        };
        let body = read_fd_to_string(cmd.heredoc_fd.unwrap());
        assert_eq!(body, "hi ada\n");
    }

    #[test]
    fn quoted_delimiter_suppresses_expansion() {
        let mut env = Environment::new();
        env.set("USER", b"ada".to_vec());
        let mut node = parse(lex("cat <<'END'").unwrap()).unwrap().unwrap();
        crate::expand::expand_tree(&mut node, &env, 0);
        let mut input = ScriptedInput::new(&["hi $USER", "END"]);
        let interrupted = AtomicBool::new(false);
        collect(&mut node, &mut input, &env, 0, &interrupted).unwrap();
        let crate::syntax::Node::Cmd(cmd) = node else {
            panic!("expected cmd")
        };
        let body = read_fd_to_string(cmd.heredoc_fd.unwrap());
        assert_eq!(body, "hi $USER\n");
    }

    #[test]
    fn only_the_last_of_several_heredocs_is_kept() {
        let env = Environment::new();
        let mut node = parse(lex("cat <<A <<B").unwrap()).unwrap().unwrap();
        crate::expand::expand_tree(&mut node, &env, 0);
        let mut input = ScriptedInput::new(&["first", "A", "second", "B"]);
        let interrupted = AtomicBool::new(false);
        collect(&mut node, &mut input, &env, 0, &interrupted).unwrap();
        let crate::syntax::Node::Cmd(cmd) = node else {
            panic!("expected cmd")
        };
        let body = read_fd_to_string(cmd.heredoc_fd.unwrap());
        assert_eq!(body, "second\n");
    }

    #[test]
    fn sigint_during_capture_aborts_with_interrupted() {
        let env = Environment::new();
        let mut node = parse(lex("cat <<END").unwrap()).unwrap().unwrap();
        crate::expand::expand_tree(&mut node, &env, 0);
        let mut input = ScriptedInput::new(&["partial line"]);
        let interrupted = AtomicBool::new(true);
        let err = collect(&mut node, &mut input, &env, 0, &interrupted).unwrap_err();
        assert!(matches!(err, HeredocError::Interrupted));
    }

    #[test]
    fn eof_before_delimiter_treats_partial_body_as_complete() {
        let env = Environment::new();
        let mut node = parse(lex("cat <<END").unwrap()).unwrap().unwrap();
        crate::expand::expand_tree(&mut node, &env, 0);
        let mut input = ScriptedInput::new(&["one", "two"]);
        let interrupted = AtomicBool::new(false);
        collect(&mut node, &mut input, &env, 0, &interrupted).unwrap();
        let crate::syntax::Node::Cmd(cmd) = node else {
            panic!("expected cmd")
        };
        let body = read_fd_to_string(cmd.heredoc_fd.unwrap());
        assert_eq!(body, "one\ntwo\n");
    }
}
