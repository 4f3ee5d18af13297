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

//! Variable expansion and quote removal.
//!
//! There is no field splitting, globbing, command substitution, or tilde
//! expansion here — all stated non-goals. An unquoted variable whose value
//! contains spaces still yields exactly one argument.

use crate::env::Environment;
use crate::syntax::{Command, Node, RedirKind, Word};
use crate::lexer::QuoteMode;

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expands `$NAME` and `$?` references in `text`, as a DOUBLE-quoted or
/// unquoted segment would be. A `$` not followed by `?` or a name-start
/// character is emitted literally, including a lone trailing `$`.
fn expand_variables(text: &str, env: &Environment, last_status: u8) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '$' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match chars.get(i + 1) {
            Some('?') => {
                out.push_str(&last_status.to_string());
                i += 2;
            }
            Some(&c) if is_name_start(c) => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_name_char(chars[end]) {
                    end += 1;
                }
                let name: String = chars[start..end].iter().collect();
                if let Some(value) = env.get(&name) {
                    out.push_str(&String::from_utf8_lossy(value));
                }
                i = end;
            }
            _ => {
                out.push('$');
                i += 1;
            }
        }
    }
    out
}

/// Appends the expansion of `text` (as an unquoted or DOUBLE-quoted segment
/// would be expanded) onto `out`. Used by the heredoc collector to expand
/// body lines under the same rules as a DOUBLE-quoted segment.
pub fn expand_variables_into(out: &mut String, text: &str, env: &Environment, last_status: u8) {
    out.push_str(&expand_variables(text, env, last_status));
}

/// Expands one segment per the quote-mode table: `Single` is always
/// literal, `None`/`Double` both expand variables (the difference between
/// them only matters for elision and quote stripping, handled by the
/// caller).
fn expand_segment_text(text: &str, quote: QuoteMode, env: &Environment, last_status: u8) -> String {
    match quote {
        QuoteMode::Single => text.to_string(),
        QuoteMode::None | QuoteMode::Double => expand_variables(text, env, last_status),
    }
}

/// Expands a WORD to its final string, plus whether any of its segments was
/// quoted (used by the elision rule).
pub fn expand_word(word: &Word, env: &Environment, last_status: u8) -> (String, bool) {
    let mut value = String::new();
    let mut any_quoted = false;
    for seg in &word.segments {
        value.push_str(&expand_segment_text(&seg.text, seg.quote, env, last_status));
        if seg.quote != QuoteMode::None {
            any_quoted = true;
        }
    }
    (value, any_quoted)
}

/// Concatenates a heredoc delimiter word's segment texts verbatim (quotes
/// stripped, no variable expansion) and reports whether it was quoted.
pub fn heredoc_delimiter(word: &Word) -> (String, bool) {
    let quoted = word.segments.iter().any(|s| s.quote != QuoteMode::None);
    let text: String = word.segments.iter().map(|s| s.text.as_str()).collect();
    (text, quoted)
}

/// Expands one command's words into its final `argv` and its non-heredoc
/// redirection targets, per spec's elision rule: a fully unquoted word that
/// expands to the empty string is dropped; a word with any quoted segment
/// always contributes exactly one argument.
fn expand_command(cmd: &mut Command, env: &Environment, last_status: u8) {
    cmd.argv = cmd
        .words
        .iter()
        .filter_map(|word| {
            let (value, any_quoted) = expand_word(word, env, last_status);
            (any_quoted || !value.is_empty()).then_some(value)
        })
        .collect();

    for redir in &mut cmd.redirs {
        match redir.kind {
            RedirKind::Heredoc => {
                let (_, quoted) = heredoc_delimiter(&redir.target);
                redir.heredoc_quoted = quoted;
            }
            RedirKind::In | RedirKind::Out | RedirKind::Append => {
                let (value, _) = expand_word(&redir.target, env, last_status);
                redir.resolved_target = Some(value);
            }
        }
    }
}

/// Walks the whole tree, expanding every `Command` node's words and
/// redirection targets in place.
pub fn expand_tree(node: &mut Node, env: &Environment, last_status: u8) {
    match node {
        Node::Cmd(cmd) => expand_command(cmd, env, last_status),
        Node::Pipe(l, r) | Node::And(l, r) | Node::Or(l, r) => {
            expand_tree(l, env, last_status);
            expand_tree(r, env, last_status);
        }
    }
}
