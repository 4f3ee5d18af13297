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

//! The core of an interactive Unix command shell: a five-stage pipeline
//! (lexer, parser, expander, heredoc collector, executor) that turns one
//! raw input line into a tree of spawned processes with correct
//! file-descriptor plumbing, signal disposition, and exit-status
//! propagation.
//!
//! An interactive line editor, terminal renderer, and startup banner are
//! external collaborators this crate only talks to through the
//! [`input::LineSource`] trait; they are not part of this crate.

pub mod builtin;
pub mod env;
pub mod exec;
pub mod expand;
pub mod heredoc;
pub mod input;
pub mod lexer;
pub mod parser;
pub mod shell;
pub mod signal;
pub mod syntax;
pub mod system;

use input::LineSource;
use shell::{ExitStatus, ShellState};
use std::sync::atomic::Ordering;
use system::System;
use syntax::Node;

/// One outcome of running a single input line, reported by the caller
/// (usually the read-eval loop) via logging/diagnostics as appropriate.
#[derive(Debug)]
pub enum LineOutcome {
    /// The line ran (possibly failing); the shell continues.
    Ran(ExitStatus),
    /// The line was empty or whitespace-only; a no-op.
    Empty,
    /// A lex, parse, or heredoc-interrupt error aborted the line before
    /// execution; `shell.last_status` has already been updated.
    Aborted,
}

/// Drives one input line through all five stages: lex, parse, expand,
/// collect heredocs, execute. Each stage's error is reported as a single
/// diagnostic and aborts the line without unwinding into the next one.
pub fn run_line(
    line: &str,
    shell: &mut ShellState,
    input: &mut dyn LineSource,
    sys: &impl System,
) -> LineOutcome {
    let tokens = match lexer::lex(line) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("nyxsh: {e}");
            shell.last_status = ExitStatus::USAGE_ERROR;
            return LineOutcome::Aborted;
        }
    };

    let mut node: Node = match parser::parse(tokens) {
        Ok(Some(node)) => node,
        Ok(None) => return LineOutcome::Empty,
        Err(e) => {
            eprintln!("nyxsh: {e}");
            shell.last_status = ExitStatus::USAGE_ERROR;
            return LineOutcome::Aborted;
        }
    };

    expand::expand_tree(&mut node, &shell.env, shell.last_status.0);

    signal::install_heredoc();
    signal::INTERRUPTED.store(false, Ordering::SeqCst);
    let heredoc_result = heredoc::collect(
        &mut node,
        input,
        &shell.env,
        shell.last_status.0,
        &signal::INTERRUPTED,
    );
    if shell.interactive {
        signal::install_interactive();
    }
    if let Err(e) = heredoc_result {
        match e {
            heredoc::HeredocError::Interrupted => {
                shell.last_status = ExitStatus::SIGINT;
            }
            other => {
                eprintln!("nyxsh: {other}");
                shell.last_status = ExitStatus::FAILURE;
            }
        }
        return LineOutcome::Aborted;
    }

    let status = exec::execute(&node, shell, sys);
    LineOutcome::Ran(status)
}
