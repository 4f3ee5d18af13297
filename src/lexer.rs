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

//! Single-pass lexer turning a raw input line into a tagged token sequence.
//!
//! The lexer is the only stage that sees quote characters. Everything
//! downstream (parser, expander) works on [`Segment`]s tagged with the
//! [`QuoteMode`] they were read under, never on raw quote punctuation.

use thiserror::Error;

/// How a run of characters in a [`Word`](crate::syntax::Word) segment was quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMode {
    None,
    Single,
    Double,
}

/// A maximal run of characters read under one [`QuoteMode`].
///
/// Segments never include the quote punctuation itself; that information is
/// carried entirely by `quote`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub quote: QuoteMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word(Vec<Segment>),
    Pipe,
    And,
    Or,
    RedirIn,
    RedirOut,
    RedirAppend,
    Heredoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
}

impl TokenKind {
    /// A short human-readable name used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Word(segs) => segs.iter().map(|s| s.text.as_str()).collect(),
            TokenKind::Pipe => "|".to_string(),
            TokenKind::And => "&&".to_string(),
            TokenKind::Or => "||".to_string(),
            TokenKind::RedirIn => "<".to_string(),
            TokenKind::RedirOut => ">".to_string(),
            TokenKind::RedirAppend => ">>".to_string(),
            TokenKind::Heredoc => "<<".to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated single-quoted string")]
    UnterminatedSingleQuote,
    #[error("unterminated double-quoted string")]
    UnterminatedDoubleQuote,
}

/// Returns the operator at `chars[i..]`, if any, as `(length, kind)`.
///
/// A lone `&` is not an operator in this grammar (job control is a
/// non-goal), so it is only recognized as the first half of `&&`.
fn match_operator(chars: &[char], i: usize) -> Option<(usize, TokenKind)> {
    let c = *chars.get(i)?;
    let next = chars.get(i + 1).copied();
    match (c, next) {
        ('&', Some('&')) => Some((2, TokenKind::And)),
        ('|', Some('|')) => Some((2, TokenKind::Or)),
        ('|', _) => Some((1, TokenKind::Pipe)),
        ('<', Some('<')) => Some((2, TokenKind::Heredoc)),
        ('<', _) => Some((1, TokenKind::RedirIn)),
        ('>', Some('>')) => Some((2, TokenKind::RedirAppend)),
        ('>', _) => Some((1, TokenKind::RedirOut)),
        _ => None,
    }
}

fn push_segment(segments: &mut Vec<Segment>, buf: &mut String, quote: QuoteMode) {
    if !buf.is_empty() || quote != QuoteMode::None {
        segments.push(Segment {
            text: std::mem::take(buf),
            quote,
        });
    }
}

/// Lexes one WORD token starting at `chars[start]`, returning the token and
/// the index just past it.
fn lex_word(chars: &[char], start: usize) -> Result<(Token, usize), LexError> {
    let mut i = start;
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut mode = QuoteMode::None;

    loop {
        let Some(&c) = chars.get(i) else { break };
        if mode == QuoteMode::None {
            if c.is_whitespace() || match_operator(chars, i).is_some() {
                break;
            }
        }
        match (mode, c) {
            (QuoteMode::None, '\'') => {
                push_segment(&mut segments, &mut buf, QuoteMode::None);
                mode = QuoteMode::Single;
                i += 1;
            }
            (QuoteMode::None, '"') => {
                push_segment(&mut segments, &mut buf, QuoteMode::None);
                mode = QuoteMode::Double;
                i += 1;
            }
            (QuoteMode::Single, '\'') => {
                push_segment(&mut segments, &mut buf, QuoteMode::Single);
                mode = QuoteMode::None;
                i += 1;
            }
            (QuoteMode::Double, '"') => {
                push_segment(&mut segments, &mut buf, QuoteMode::Double);
                mode = QuoteMode::None;
                i += 1;
            }
            (_, c) => {
                buf.push(c);
                i += 1;
            }
        }
    }

    if mode != QuoteMode::None {
        return Err(match mode {
            QuoteMode::Single => LexError::UnterminatedSingleQuote,
            QuoteMode::Double => LexError::UnterminatedDoubleQuote,
            QuoteMode::None => unreachable!(),
        });
    }
    push_segment(&mut segments, &mut buf, QuoteMode::None);
    Ok((
        Token {
            kind: TokenKind::Word(segments),
        },
        i,
    ))
}

/// Lexes a single input line into an ordered token sequence.
///
/// The line must not contain a newline (heredoc bodies are read separately
/// by the collector, after parsing).
pub fn lex(line: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        if let Some((len, kind)) = match_operator(&chars, i) {
            tokens.push(Token { kind });
            i += len;
            continue;
        }
        let (token, next) = lex_word(&chars, i)?;
        tokens.push(token);
        i = next;
    }
    Ok(tokens)
}
