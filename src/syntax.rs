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

//! The syntax tree produced by the parser and refined by later stages.

use crate::lexer::Segment;
use std::os::fd::OwnedFd;

/// A WORD as seen by the parser: an ordered list of quote-tagged segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirKind {
    In,
    Out,
    Append,
    Heredoc,
}

/// One redirection attached to a [`Command`], in source order.
#[derive(Debug)]
pub struct Redir {
    pub kind: RedirKind,
    /// The original delimiter/filename word, before expansion.
    pub target: Word,
    /// Filled in by the expander for `In`/`Out`/`Append`; unused for `Heredoc`.
    pub resolved_target: Option<String>,
    /// Filled in by the expander for `Heredoc`: whether the delimiter word
    /// contained any quoted segment (this disables variable expansion of
    /// the body).
    pub heredoc_quoted: bool,
}

/// A leaf command: a word list and its redirections, plus the state later
/// stages attach to it.
#[derive(Debug, Default)]
pub struct Command {
    pub words: Vec<Word>,
    pub redirs: Vec<Redir>,
    /// Populated by the expander (stage 3). Arg 0 is the program name.
    pub argv: Vec<String>,
    /// Populated by the heredoc collector (stage 4): the read end of the
    /// pipe backing the command's last heredoc, if it has one.
    pub heredoc_fd: Option<OwnedFd>,
}

impl Default for Redir {
    fn default() -> Self {
        Redir {
            kind: RedirKind::In,
            target: Word { segments: Vec::new() },
            resolved_target: None,
            heredoc_quoted: false,
        }
    }
}

/// A node of the syntax tree built by the parser.
#[derive(Debug)]
pub enum Node {
    Cmd(Command),
    Pipe(Box<Node>, Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
}
