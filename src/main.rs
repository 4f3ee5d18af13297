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

//! Thin entry point: installs the logger, builds the shell state, installs
//! the top-level signal disposition, and runs the read-eval loop until EOF
//! or `exit`. Argument parsing, prompt rendering, history, and color
//! theming are all external collaborators' job; this binary only wires
//! them together for the default, featureless invocation spec.md's
//! command-line surface describes (zero positional arguments, zero flags
//! beyond what `clap` provides for free).

use clap::Parser;
use nyxsh::input::{LineSource, StdinSource};
use nyxsh::shell::{ExitStatus, ShellState};
use nyxsh::system::RealSystem;
use nyxsh::{run_line, signal, LineOutcome};
use std::sync::atomic::Ordering;

#[derive(Parser, Debug)]
#[command(name = "nyxsh", about = "A small interactive command shell")]
struct Cli {}

fn main() {
    env_logger::init();
    let _cli = Cli::parse();

    let mut shell = ShellState::new();
    if shell.interactive {
        signal::install_interactive();
    }

    let mut input = StdinSource::new();
    let sys = RealSystem;

    loop {
        let prompt = if shell.interactive { "$ " } else { "" };
        signal::INTERRUPTED.store(false, Ordering::SeqCst);
        let line = match input.next_line(prompt) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                // SIGINT mid-read: the interrupted read never produced a
                // line, so abort it and redraw the prompt on a fresh line.
                if signal::INTERRUPTED.swap(false, Ordering::SeqCst) {
                    println!();
                }
                shell.last_status = ExitStatus::SIGINT;
                continue;
            }
            Err(e) => {
                log::error!("error reading input: {e}");
                eprintln!("nyxsh: {e}");
                break;
            }
        };

        match run_line(&line, &mut shell, &mut input, &sys) {
            LineOutcome::Ran(_) | LineOutcome::Empty => {}
            LineOutcome::Aborted => {}
        }
    }

    std::process::exit(shell.last_status.0 as i32);
}
