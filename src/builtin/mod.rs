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

//! Built-in commands, dispatched by exact match on `argv[0]`.
//!
//! Each built-in is a plain function registered in a static table, mirroring
//! `yash-builtin`'s one-module-per-builtin layout but trimmed to exactly the
//! contract this crate's spec states for each one — no `$CDPATH`, no
//! `-L`/`-P` physical/logical resolution, no `declare`-style attribute
//! flags beyond what's listed below.

mod cd;
mod echo;
mod env_builtin;
mod exit;
mod export;
mod pwd;
mod unset;

use crate::shell::{ExitStatus, ShellState};
use crate::system::System;

pub type BuiltinFn = fn(&mut ShellState, &[String], &dyn System) -> ExitStatus;

/// Looks up a built-in by exact match of `argv[0]`. Returns `None` for
/// anything that should instead be resolved against `$PATH`.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    let found = match name {
        "echo" => Some(echo::run),
        "cd" => Some(cd::run),
        "pwd" => Some(pwd::run),
        "export" => Some(export::run),
        "unset" => Some(unset::run),
        "env" => Some(env_builtin::run),
        "exit" => Some(exit::run),
        _ => None,
    };
    if found.is_some() {
        log::debug!("dispatching builtin {name:?}");
    }
    found
}
