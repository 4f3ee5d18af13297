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

//! The signal regime distinguishing interactive input, heredoc capture, and
//! foreground child execution.
//!
//! This is a synchronous re-expression of `yash-env`'s trap/signal split,
//! dropping everything built there for user-settable `trap` handling (no
//! `trap` builtin in this crate's scope) and for job control (no stop/
//! continue disposition to juggle).

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};

/// Set by whichever `SIGINT` handler is currently installed; polled by the
/// read-eval loop and the heredoc collector between blocking reads.
pub static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn mark_interrupted(_signal: i32) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

fn install(signal: Signal, handler: SigHandler) {
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    // SAFETY: `mark_interrupted` only touches an `AtomicBool`, which is
    // async-signal-safe.
    unsafe {
        signal::sigaction(signal, &action).expect("sigaction should not fail for SIGINT/SIGQUIT");
    }
}

/// Installs the interactive-shell disposition: `SIGINT` sets the
/// interrupted flag (the read-eval loop redraws the prompt on a new line
/// when it sees it set), `SIGQUIT` is ignored.
pub fn install_interactive() {
    install(Signal::SIGINT, SigHandler::Handler(mark_interrupted));
    install(Signal::SIGQUIT, SigHandler::SigIgn);
}

/// Installs the heredoc-capture disposition: a distinct `SIGINT` handler
/// that only sets the interrupted flag, polled by the collector between
/// lines to abort the whole command line.
pub fn install_heredoc() {
    install(Signal::SIGINT, SigHandler::Handler(mark_interrupted));
}

/// A guard that ignores `SIGINT`/`SIGQUIT` for the duration of a foreground
/// wait, restoring the previous disposition on drop — the idiomatic
/// equivalent of the teacher's save-before/restore-after pattern.
pub struct ForegroundGuard {
    previous_int: SigAction,
    previous_quit: SigAction,
}

impl ForegroundGuard {
    pub fn new() -> Self {
        let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
        // SAFETY: SIG_IGN has no async-signal-safety concerns.
        let previous_int = unsafe { signal::sigaction(Signal::SIGINT, &ignore) }
            .expect("sigaction should not fail for SIGINT");
        let previous_quit = unsafe { signal::sigaction(Signal::SIGQUIT, &ignore) }
            .expect("sigaction should not fail for SIGQUIT");
        ForegroundGuard {
            previous_int,
            previous_quit,
        }
    }
}

impl Default for ForegroundGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ForegroundGuard {
    fn drop(&mut self) {
        // SAFETY: restoring a previously installed action.
        unsafe {
            let _ = signal::sigaction(Signal::SIGINT, &self.previous_int);
            let _ = signal::sigaction(Signal::SIGQUIT, &self.previous_quit);
        }
    }
}

/// Resets `SIGINT` and `SIGQUIT` to their default disposition; called in a
/// forked child before `execve` so the new program runs under ordinary
/// signal handling, not the parent shell's.
pub fn reset_default() {
    install(Signal::SIGINT, SigHandler::SigDfl);
    install(Signal::SIGQUIT, SigHandler::SigDfl);
}
