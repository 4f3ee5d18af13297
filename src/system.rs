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

//! The seam between the executor and the operating system.
//!
//! Everything the executor needs from the kernel — forking, waiting,
//! executing, piping, duplicating descriptors, changing directory — goes
//! through this trait instead of calling `nix` directly, the way
//! `yash-env`'s `System`/`RealSystem` split keeps `yash-semantics` testable
//! without a real kernel underneath it. This crate only needs the much
//! smaller slice of that surface its single-process, non-job-control scope
//! actually uses.

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use nix::sys::wait::WaitStatus;
use nix::unistd::{ForkResult, Pid};
use std::convert::Infallible;
use std::ffi::CString;
use std::os::fd::OwnedFd;
use std::path::{Path, PathBuf};

pub trait System {
    /// # Safety
    /// Same caveats as `nix::unistd::fork`: the child must not allocate or
    /// touch non-async-signal-safe state before calling `execve` or `exit`.
    unsafe fn fork(&self) -> Result<ForkResult, Errno>;
    fn waitpid(&self, pid: Pid) -> Result<WaitStatus, Errno>;
    fn execve(&self, path: &CString, args: &[CString], env: &[CString]) -> Result<Infallible, Errno>;
    fn pipe(&self) -> Result<(OwnedFd, OwnedFd), Errno>;
    fn dup(&self, fd: i32) -> Result<OwnedFd, Errno>;
    fn dup2(&self, src: i32, dst: i32) -> Result<(), Errno>;
    fn close(&self, fd: i32) -> Result<(), Errno>;
    fn open(&self, path: &Path, flags: OFlag, mode: Mode) -> Result<OwnedFd, Errno>;
    fn chdir(&self, path: &Path) -> Result<(), Errno>;
    fn getcwd(&self) -> Result<PathBuf, Errno>;
    fn is_executable_file(&self, path: &Path) -> bool;
    fn exit(&self, code: i32) -> !;
}

/// The `System` implementation used by the real binary: every method is a
/// thin forward to `nix` (or `std`, for `exit`/`getcwd`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSystem;

impl System for RealSystem {
    unsafe fn fork(&self) -> Result<ForkResult, Errno> {
        nix::unistd::fork()
    }

    fn waitpid(&self, pid: Pid) -> Result<WaitStatus, Errno> {
        nix::sys::wait::waitpid(pid, None)
    }

    fn execve(&self, path: &CString, args: &[CString], env: &[CString]) -> Result<Infallible, Errno> {
        nix::unistd::execve(path, args, env)
    }

    fn pipe(&self) -> Result<(OwnedFd, OwnedFd), Errno> {
        nix::unistd::pipe()
    }

    fn dup(&self, fd: i32) -> Result<OwnedFd, Errno> {
        use std::os::fd::{BorrowedFd, FromRawFd};
        // SAFETY: `fd` is a live descriptor owned by the caller for the
        // duration of this call.
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        nix::unistd::dup(&borrowed).map(|raw| unsafe { OwnedFd::from_raw_fd(raw) })
    }

    fn dup2(&self, src: i32, dst: i32) -> Result<(), Errno> {
        use std::os::fd::BorrowedFd;
        // SAFETY: both descriptors are live for the duration of this call.
        let borrowed = unsafe { BorrowedFd::borrow_raw(src) };
        nix::unistd::dup2(&borrowed, dst).map(|_| ())
    }

    fn close(&self, fd: i32) -> Result<(), Errno> {
        use std::os::fd::{FromRawFd, OwnedFd};
        // SAFETY: the caller gives up ownership of `fd` by calling close.
        drop(unsafe { OwnedFd::from_raw_fd(fd) });
        Ok(())
    }

    fn open(&self, path: &Path, flags: OFlag, mode: Mode) -> Result<OwnedFd, Errno> {
        use std::os::fd::FromRawFd;
        nix::fcntl::open(path, flags, mode).map(|raw| unsafe { OwnedFd::from_raw_fd(raw) })
    }

    fn chdir(&self, path: &Path) -> Result<(), Errno> {
        nix::unistd::chdir(path)
    }

    fn getcwd(&self) -> Result<PathBuf, Errno> {
        std::env::current_dir().map_err(|e| Errno::from_raw(e.raw_os_error().unwrap_or(0)))
    }

    fn is_executable_file(&self, path: &Path) -> bool {
        use nix::sys::stat::SFlag;
        let Ok(stat) = nix::sys::stat::stat(path) else {
            return false;
        };
        let is_regular = (stat.st_mode & SFlag::S_IFMT.bits()) == SFlag::S_IFREG.bits();
        is_regular && nix::unistd::access(path, nix::unistd::AccessFlags::X_OK).is_ok()
    }

    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// Returns whether `path` names an existing regular file, independent of
/// its executable bit — used to distinguish "not found" (127) from "found
/// but not executable" (126) during `$PATH` search.
pub fn is_regular_file(path: &Path) -> bool {
    use nix::sys::stat::SFlag;
    match nix::sys::stat::stat(path) {
        Ok(stat) => (stat.st_mode & SFlag::S_IFMT.bits()) == SFlag::S_IFREG.bits(),
        Err(_) => false,
    }
}
