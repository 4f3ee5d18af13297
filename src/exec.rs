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

//! The executor: recursively walks the syntax tree, dispatching builtins in
//! the current process, forking external commands, wiring pipes for `PIPE`
//! nodes, and short-circuiting `AND`/`OR` nodes on the left child's exit
//! status.
//!
//! `PIPE` chains are flattened into an ordered command list and launched in
//! a single pass rather than handled by naive recursion, so fd ownership at
//! every step is provable from one place (the naive recursive approach
//! leaves the parent side of an inner pipe needing to close fds opened by
//! an outer recursive call, which is where descriptor leaks hide).

use crate::builtin;
use crate::shell::{ExitStatus, ShellState};
use crate::signal::{self, ForegroundGuard};
use crate::syntax::{Command, Node, RedirKind};
use crate::system::{is_regular_file, System};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use nix::sys::wait::WaitStatus;
use nix::unistd::{ForkResult, Pid};
use std::collections::HashMap;
use std::ffi::CString;
use std::os::fd::{AsRawFd, OwnedFd};
use std::path::{Path, PathBuf};

/// Executes a fully expanded, heredoc-collected tree, writing the final
/// status into `shell.last_status` and returning it.
pub fn execute(node: &Node, shell: &mut ShellState, sys: &impl System) -> ExitStatus {
    let status = execute_node(node, shell, sys, false);
    shell.last_status = status;
    status
}

fn execute_node(node: &Node, shell: &mut ShellState, sys: &impl System, in_pipeline: bool) -> ExitStatus {
    match node {
        Node::And(left, right) => {
            let left_status = execute_node(left, shell, sys, in_pipeline);
            if left_status.is_success() {
                execute_node(right, shell, sys, in_pipeline)
            } else {
                left_status
            }
        }
        Node::Or(left, right) => {
            let left_status = execute_node(left, shell, sys, in_pipeline);
            if !left_status.is_success() {
                execute_node(right, shell, sys, in_pipeline)
            } else {
                left_status
            }
        }
        Node::Pipe(..) => execute_pipeline(node, shell, sys),
        Node::Cmd(cmd) => execute_command(cmd, shell, sys, in_pipeline),
    }
}

fn flatten_pipe<'a>(node: &'a Node, out: &mut Vec<&'a Command>) {
    match node {
        Node::Pipe(left, right) => {
            flatten_pipe(left, out);
            flatten_pipe(right, out);
        }
        Node::Cmd(cmd) => out.push(cmd),
        Node::And(..) | Node::Or(..) => {
            unreachable!("the grammar never nests AND/OR inside a PIPE spine")
        }
    }
}

fn execute_pipeline(node: &Node, shell: &mut ShellState, sys: &impl System) -> ExitStatus {
    let mut cmds = Vec::new();
    flatten_pipe(node, &mut cmds);
    let n = cmds.len();

    log::debug!("launching pipeline of {n} commands");
    let mut pipes = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        match sys.pipe() {
            Ok(p) => pipes.push(p),
            Err(e) => {
                eprintln!("nyxsh: pipe: {e}");
                log::error!("pipe() failed while building a {n}-command pipeline: {e}");
                return ExitStatus::FAILURE;
            }
        }
    }
    log::debug!("created {} pipe(s) for {n}-command pipeline", pipes.len());

    let _guard = ForegroundGuard::new();
    let mut pids = Vec::with_capacity(n);
    for (i, cmd) in cmds.iter().enumerate() {
        // SAFETY: the child immediately restores default signal
        // dispositions and either execs or exits without touching any
        // non-async-signal-safe shell state first.
        match unsafe { sys.fork() } {
            Ok(ForkResult::Child) => {
                wire_pipeline_fds(&pipes, i, n, sys);
                signal::reset_default();
                let status = run_in_child(cmd, shell, sys);
                sys.exit(status.0 as i32);
            }
            Ok(ForkResult::Parent { child }) => {
                log::debug!("forked pid {child} for pipeline stage {i} of {n}");
                pids.push(child);
            }
            Err(e) => {
                eprintln!("nyxsh: fork: {e}");
                log::error!("fork() failed launching pipeline stage {i}: {e}");
            }
        }
    }

    for (read_end, write_end) in &pipes {
        let _ = sys.close(read_end.as_raw_fd());
        let _ = sys.close(write_end.as_raw_fd());
    }

    let mut last = ExitStatus::FAILURE;
    for (i, pid) in pids.iter().enumerate() {
        let status = wait_for(sys, *pid);
        if i == pids.len() - 1 {
            last = status;
        }
    }
    last
}

/// Duplicates the pipe fds a pipeline child at position `i` of `n` needs
/// onto stdin/stdout, then closes every pipe fd — including the ones just
/// duplicated from — so no pipe fd outlives this call in the child.
fn wire_pipeline_fds(
    pipes: &[(OwnedFd, OwnedFd)],
    i: usize,
    n: usize,
    sys: &impl System,
) {
    log::debug!("wiring pipeline fds for stage {i} of {n}");
    if i > 0 {
        let _ = sys.dup2(pipes[i - 1].0.as_raw_fd(), 0);
    }
    if i < n - 1 {
        let _ = sys.dup2(pipes[i].1.as_raw_fd(), 1);
    }
    for (read_end, write_end) in pipes {
        let _ = sys.close(read_end.as_raw_fd());
        let _ = sys.close(write_end.as_raw_fd());
    }
}

/// Runs one pipeline stage to completion inside its forked child: builtins
/// run in-process here (never bubbling state back to the parent shell) and
/// external commands `execve` and never return.
fn run_in_child(cmd: &Command, shell: &mut ShellState, sys: &impl System) -> ExitStatus {
    if cmd.argv.is_empty() {
        return run_redir_only_in_place(cmd, shell, sys);
    }
    if let Err(e) = apply_redirs(cmd, sys) {
        eprintln!("nyxsh: {}: {e}", cmd.argv[0]);
        return ExitStatus::FAILURE;
    }
    if let Some(builtin) = builtin::lookup(&cmd.argv[0]) {
        return builtin(shell, &cmd.argv, sys);
    }
    exec_external(cmd, shell, sys)
}

fn execute_command(cmd: &Command, shell: &mut ShellState, sys: &impl System, in_pipeline: bool) -> ExitStatus {
    if cmd.argv.is_empty() {
        if cmd.redirs.is_empty() {
            return ExitStatus::SUCCESS;
        }
        return execute_redir_only(cmd, sys);
    }

    if !in_pipeline {
        if let Some(builtin) = builtin::lookup(&cmd.argv[0]) {
            return run_builtin_with_redirs(builtin, cmd, shell, sys);
        }
    }

    fork_and_exec(cmd, shell, sys)
}

/// A command with redirections but no words: forks, applies the
/// redirections, and exits 0 if they all succeeded, else 1. A command with
/// neither words nor redirections is a no-op handled by the caller.
fn execute_redir_only(cmd: &Command, sys: &impl System) -> ExitStatus {
    let _guard = ForegroundGuard::new();
    // SAFETY: the child only applies redirections and exits.
    match unsafe { sys.fork() } {
        Ok(ForkResult::Child) => {
            signal::reset_default();
            let status = run_redir_only_in_place_sys(cmd, sys);
            sys.exit(status.0 as i32);
        }
        Ok(ForkResult::Parent { child }) => wait_for(sys, child),
        Err(e) => {
            eprintln!("nyxsh: fork: {e}");
            ExitStatus::FAILURE
        }
    }
}

fn run_redir_only_in_place_sys(cmd: &Command, sys: &impl System) -> ExitStatus {
    match apply_redirs(cmd, sys) {
        Ok(()) => ExitStatus::SUCCESS,
        Err(e) => {
            eprintln!("nyxsh: {e}");
            ExitStatus::FAILURE
        }
    }
}

fn run_redir_only_in_place(cmd: &Command, _shell: &mut ShellState, sys: &impl System) -> ExitStatus {
    run_redir_only_in_place_sys(cmd, sys)
}

/// Applies a builtin's redirections on temporarily duplicated standard fds,
/// runs it in-process, then restores the originals — `RedirGuard`'s `Drop`
/// is the restore half, so every early return still undoes the dup.
fn run_builtin_with_redirs(
    builtin: builtin::BuiltinFn,
    cmd: &Command,
    shell: &mut ShellState,
    sys: &impl System,
) -> ExitStatus {
    let guard = match RedirGuard::apply(cmd, sys) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("nyxsh: {}: {e}", cmd.argv[0]);
            return ExitStatus::FAILURE;
        }
    };
    let status = builtin(shell, &cmd.argv, sys);
    drop(guard);
    status
}

fn fork_and_exec(cmd: &Command, shell: &ShellState, sys: &impl System) -> ExitStatus {
    let _guard = ForegroundGuard::new();
    log::debug!("forking to exec {:?}", cmd.argv);
    // SAFETY: the child only applies redirections and either execs or
    // exits; it never returns to this stack frame.
    match unsafe { sys.fork() } {
        Ok(ForkResult::Child) => {
            signal::reset_default();
            if let Err(e) = apply_redirs(cmd, sys) {
                eprintln!("nyxsh: {}: {e}", cmd.argv[0]);
                sys.exit(ExitStatus::FAILURE.0 as i32);
            }
            let status = exec_external(cmd, shell, sys);
            sys.exit(status.0 as i32);
        }
        Ok(ForkResult::Parent { child }) => {
            log::debug!("forked pid {child}, waiting for it to finish");
            wait_for(sys, child)
        }
        Err(e) => {
            eprintln!("nyxsh: fork: {e}");
            ExitStatus::FAILURE
        }
    }
}

/// A redirection applied without saving/restoring the original fd — used
/// once a process is about to `execve` or `exit` and has no further use for
/// its own original stdin/stdout.
fn apply_redirs(cmd: &Command, sys: &impl System) -> Result<(), Errno> {
    for redir in &cmd.redirs {
        let target_fd = match redir.kind {
            RedirKind::In | RedirKind::Heredoc => 0,
            RedirKind::Out | RedirKind::Append => 1,
        };
        match redir.kind {
            RedirKind::In => {
                let path = redir.resolved_target.as_deref().unwrap_or("");
                let fd = sys.open(Path::new(path), OFlag::O_RDONLY, Mode::empty())?;
                sys.dup2(fd.as_raw_fd(), target_fd)?;
            }
            RedirKind::Out => {
                let path = redir.resolved_target.as_deref().unwrap_or("");
                let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
                let mode = Mode::from_bits_truncate(0o644);
                let fd = sys.open(Path::new(path), flags, mode)?;
                sys.dup2(fd.as_raw_fd(), target_fd)?;
            }
            RedirKind::Append => {
                let path = redir.resolved_target.as_deref().unwrap_or("");
                let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND;
                let mode = Mode::from_bits_truncate(0o644);
                let fd = sys.open(Path::new(path), flags, mode)?;
                sys.dup2(fd.as_raw_fd(), target_fd)?;
            }
            RedirKind::Heredoc => {
                if let Some(fd) = &cmd.heredoc_fd {
                    sys.dup2(fd.as_raw_fd(), target_fd)?;
                }
            }
        }
    }
    Ok(())
}

/// Restores the original standard fds a set of redirections overrode, on
/// drop, regardless of how the builtin call above returned.
struct RedirGuard<'a, S: System> {
    sys: &'a S,
    saved: HashMap<i32, OwnedFd>,
}

impl<'a, S: System> RedirGuard<'a, S> {
    fn apply(cmd: &Command, sys: &'a S) -> Result<Self, Errno> {
        use std::collections::hash_map::Entry;

        let mut saved: HashMap<i32, OwnedFd> = HashMap::new();
        for redir in &cmd.redirs {
            let target_fd = match redir.kind {
                RedirKind::In | RedirKind::Heredoc => 0,
                RedirKind::Out | RedirKind::Append => 1,
            };
            if let Entry::Vacant(entry) = saved.entry(target_fd) {
                match sys.dup(target_fd) {
                    Ok(fd) => {
                        entry.insert(fd);
                    }
                    Err(e) => {
                        drop(RedirGuard { sys, saved });
                        return Err(e);
                    }
                }
            }
        }
        if let Err(e) = apply_redirs(cmd, sys) {
            drop(RedirGuard { sys, saved });
            return Err(e);
        }
        Ok(RedirGuard { sys, saved })
    }
}

impl<'a, S: System> Drop for RedirGuard<'a, S> {
    fn drop(&mut self) {
        for (fd, saved) in self.saved.drain() {
            let _ = self.sys.dup2(saved.as_raw_fd(), fd);
        }
    }
}

enum PathLookup {
    Found(PathBuf),
    FoundNotExecutable,
    NotFound,
}

/// Splits `$PATH` by `:` (an empty element means the current directory) and
/// returns the first entry that names a regular file, stopping the search
/// there whether or not it is executable — matching ordinary shell
/// behavior, where a non-executable match shadows any later executable one.
fn resolve_path(prog: &str, env: &crate::env::Environment, sys: &impl System) -> PathLookup {
    if prog.contains('/') {
        let path = PathBuf::from(prog);
        if !is_regular_file(&path) {
            return PathLookup::NotFound;
        }
        return if sys.is_executable_file(&path) {
            PathLookup::Found(path)
        } else {
            PathLookup::FoundNotExecutable
        };
    }

    let path_var = env.get_str("PATH").unwrap_or_default();
    for dir in path_var.split(':') {
        let dir = if dir.is_empty() { "." } else { dir };
        let candidate = Path::new(dir).join(prog);
        if is_regular_file(&candidate) {
            return if sys.is_executable_file(&candidate) {
                PathLookup::Found(candidate)
            } else {
                PathLookup::FoundNotExecutable
            };
        }
    }
    PathLookup::NotFound
}

/// Resolves `argv[0]` against `$PATH` and `execve`s it. Only returns on
/// failure (path lookup or `execve` itself); the caller is responsible for
/// exiting the process afterward.
fn exec_external(cmd: &Command, shell: &ShellState, sys: &impl System) -> ExitStatus {
    let prog = &cmd.argv[0];
    let path = match resolve_path(prog, &shell.env, sys) {
        PathLookup::Found(path) => path,
        PathLookup::FoundNotExecutable => {
            eprintln!("nyxsh: {prog}: permission denied");
            return ExitStatus::NOT_EXECUTABLE;
        }
        PathLookup::NotFound => {
            eprintln!("nyxsh: {prog}: command not found");
            return ExitStatus::NOT_FOUND;
        }
    };
    log::debug!("resolved {prog:?} to {path:?}");

    let Ok(cpath) = CString::new(path.as_os_str().to_string_lossy().into_owned()) else {
        eprintln!("nyxsh: {prog}: command not found");
        return ExitStatus::NOT_FOUND;
    };
    let cargs: Vec<CString> = cmd
        .argv
        .iter()
        .map(|a| CString::new(a.as_str()).unwrap_or_default())
        .collect();
    let cenv = shell.env.to_exec_vec();

    log::debug!("execve({path:?}, {:?})", cmd.argv);
    match sys.execve(&cpath, &cargs, &cenv) {
        Err(Errno::EACCES) => {
            eprintln!("nyxsh: {prog}: permission denied");
            ExitStatus::NOT_EXECUTABLE
        }
        Err(e) => {
            eprintln!("nyxsh: {prog}: {e}");
            ExitStatus::NOT_FOUND
        }
        Ok(never) => match never {},
    }
}

fn wait_for(sys: &impl System, pid: Pid) -> ExitStatus {
    match sys.waitpid(pid) {
        Ok(WaitStatus::Exited(_, code)) => ExitStatus((code & 0xff) as u8),
        Ok(WaitStatus::Signaled(_, sig, _)) => ExitStatus::from_signal(sig as i32),
        Ok(_) => ExitStatus::FAILURE,
        Err(e) => {
            eprintln!("nyxsh: waitpid: {e}");
            ExitStatus::FAILURE
        }
    }
}
