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

//! Recursive-descent parser over the token sequence.
//!
//! ```text
//! or    := and  (('||') and)*
//! and   := pipe (('&&') pipe)*
//! pipe  := cmd  (('|')  cmd)*
//! cmd   := (WORD | redir)+
//! redir := ('<' | '>' | '>>' | '<<') WORD
//! ```
//!
//! `||`, `&&` and `|` are all left-associative; each becomes a left-leaning
//! spine of binary nodes.

use crate::lexer::{Token, TokenKind};
use crate::syntax::{Command, Node, Redir, RedirKind, Word};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected token: {found}")]
    UnexpectedToken { found: String },
    #[error("missing operand after {after}")]
    MissingOperand { after: &'static str },
    #[error("missing redirection target")]
    MissingRedirTarget,
    #[error("unexpected end of input")]
    UnexpectedEof,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Parses one command line's worth of tokens into a syntax tree.
///
/// Returns `Ok(None)` for an empty token sequence (blank or whitespace-only
/// input), which is a no-op at the executor.
pub fn parse(tokens: Vec<Token>) -> Result<Option<Node>, ParseError> {
    if tokens.is_empty() {
        return Ok(None);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.or_expr()?;
    if parser.pos != parser.tokens.len() {
        let found = parser.tokens[parser.pos].kind.describe();
        return Err(ParseError::UnexpectedToken { found });
    }
    Ok(Some(node))
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = std::mem::replace(&mut self.tokens[self.pos].kind, TokenKind::Pipe);
        self.pos += 1;
        kind
    }

    /// Runs `f`, translating a bare end-of-input into "missing operand after
    /// `after`" — used after an operator has just been consumed, so an
    /// immediate EOF names that operator rather than reporting generically.
    fn require<T>(
        &mut self,
        after: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        f(self).map_err(|e| match e {
            ParseError::UnexpectedEof => ParseError::MissingOperand { after },
            other => other,
        })
    }

    fn or_expr(&mut self) -> Result<Node, ParseError> {
        let mut left = self.and_expr()?;
        while matches!(self.peek(), Some(TokenKind::Or)) {
            self.advance();
            let right = self.require("||", Self::and_expr)?;
            left = Node::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Node, ParseError> {
        let mut left = self.pipe_expr()?;
        while matches!(self.peek(), Some(TokenKind::And)) {
            self.advance();
            let right = self.require("&&", Self::pipe_expr)?;
            left = Node::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn pipe_expr(&mut self) -> Result<Node, ParseError> {
        let mut left = self.cmd()?;
        while matches!(self.peek(), Some(TokenKind::Pipe)) {
            self.advance();
            let right = self.require("|", Self::cmd)?;
            left = Node::Pipe(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn cmd(&mut self) -> Result<Node, ParseError> {
        let mut words = Vec::new();
        let mut redirs = Vec::new();
        let mut any = false;
        loop {
            match self.peek() {
                Some(TokenKind::Word(_)) => {
                    any = true;
                    let TokenKind::Word(segments) = self.advance() else {
                        unreachable!()
                    };
                    words.push(Word { segments });
                }
                Some(
                    TokenKind::RedirIn
                    | TokenKind::RedirOut
                    | TokenKind::RedirAppend
                    | TokenKind::Heredoc,
                ) => {
                    any = true;
                    let kind = match self.advance() {
                        TokenKind::RedirIn => RedirKind::In,
                        TokenKind::RedirOut => RedirKind::Out,
                        TokenKind::RedirAppend => RedirKind::Append,
                        TokenKind::Heredoc => RedirKind::Heredoc,
                        _ => unreachable!(),
                    };
                    let target = match self.peek() {
                        Some(TokenKind::Word(_)) => {
                            let TokenKind::Word(segments) = self.advance() else {
                                unreachable!()
                            };
                            Word { segments }
                        }
                        _ => return Err(ParseError::MissingRedirTarget),
                    };
                    redirs.push(Redir {
                        kind,
                        target,
                        resolved_target: None,
                        heredoc_quoted: false,
                    });
                }
                _ => break,
            }
        }
        if !any {
            return Err(match self.peek() {
                Some(kind) => ParseError::UnexpectedToken {
                    found: kind.describe(),
                },
                None => ParseError::UnexpectedEof,
            });
        }
        Ok(Node::Cmd(Command {
            words,
            redirs,
            argv: Vec::new(),
            heredoc_fd: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use assert_matches::assert_matches;

    fn parse_line(line: &str) -> Result<Option<Node>, ParseError> {
        parse(lex(line).unwrap())
    }

    #[test]
    fn empty_line_parses_to_nothing() {
        assert!(parse_line("").unwrap().is_none());
    }

    #[test]
    fn single_command_parses_to_a_cmd_node() {
        let node = parse_line("echo hi").unwrap().unwrap();
        assert_matches!(node, Node::Cmd(_));
    }

    #[test]
    fn and_or_pipe_are_left_associative() {
        let node = parse_line("a | b | c").unwrap().unwrap();
        assert_matches!(node, Node::Pipe(l, r) => {
            assert_matches!(*r, Node::Cmd(_));
            assert_matches!(*l, Node::Pipe(_, _));
        });

        let node = parse_line("a && b || c").unwrap().unwrap();
        // || binds loosest, so this is Or(And(a,b), c)
        assert_matches!(node, Node::Or(l, r) => {
            assert_matches!(*l, Node::And(_, _));
            assert_matches!(*r, Node::Cmd(_));
        });
    }

    #[test]
    fn leading_pipe_is_a_syntax_error() {
        let err = parse_line("| ls").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedToken { found: "|".into() });
    }

    #[test]
    fn trailing_pipe_names_the_operator() {
        let err = parse_line("ls |").unwrap_err();
        assert_eq!(err, ParseError::MissingOperand { after: "|" });
    }

    #[test]
    fn trailing_and_names_the_operator() {
        let err = parse_line("true &&").unwrap_err();
        assert_eq!(err, ParseError::MissingOperand { after: "&&" });
    }

    #[test]
    fn redirection_without_target_is_an_error() {
        let err = parse_line("cat <").unwrap_err();
        assert_eq!(err, ParseError::MissingRedirTarget);
    }

    #[test]
    fn redirections_interleave_with_words_in_order() {
        let node = parse_line("cat < in.txt > out.txt").unwrap().unwrap();
        let Node::Cmd(cmd) = node else {
            panic!("expected cmd")
        };
        assert_eq!(cmd.words.len(), 1);
        assert_eq!(cmd.redirs.len(), 2);
        assert_eq!(cmd.redirs[0].kind, RedirKind::In);
        assert_eq!(cmd.redirs[1].kind, RedirKind::Out);
    }
}
