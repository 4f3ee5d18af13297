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

//! The shell-wide environment: an insertion-ordered, unique-key name/value
//! map, seeded from the process environment and mutated only by `export`
//! and `unset`.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;

/// Returns whether `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    // Insertion order is the order entries were first set; updating an
    // existing name keeps its original position, matching what `env` and
    // `export` observably report.
    entries: Vec<(String, Vec<u8>)>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// Seeds an environment from the process's initial environment, in the
    /// order `std::env::vars_os` yields them.
    pub fn from_process_env() -> Self {
        let mut env = Environment::new();
        for (name, value) in std::env::vars_os() {
            let name = name.to_string_lossy().into_owned();
            if is_valid_name(&name) {
                env.set(name, value.as_bytes().to_vec());
            }
        }
        env
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn get_str(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| String::from_utf8_lossy(v).into_owned())
    }

    /// Inserts or updates a binding. Existing bindings keep their original
    /// insertion position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Removes a binding, returning whether one was present.
    pub fn unset(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Materializes a `NAME=VALUE` array view suitable for a child process
    /// launch, regenerated fresh on each call.
    pub fn to_exec_vec(&self) -> Vec<CString> {
        self.entries
            .iter()
            .map(|(name, value)| {
                let mut bytes = Vec::with_capacity(name.len() + value.len() + 1);
                bytes.extend_from_slice(name.as_bytes());
                bytes.push(b'=');
                bytes.extend_from_slice(value);
                CString::new(bytes).expect("environment values must not contain NUL")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation() {
        assert!(is_valid_name("FOO"));
        assert!(is_valid_name("_foo9"));
        assert!(!is_valid_name("9foo"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("FOO BAR"));
        assert!(!is_valid_name("FOO=BAR"));
    }

    #[test]
    fn set_then_unset_then_set_matches_a_single_set() {
        let mut a = Environment::new();
        a.set("X", b"1".to_vec());

        let mut b = Environment::new();
        b.set("X", b"1".to_vec());
        b.unset("X");
        b.set("X", b"1".to_vec());

        assert_eq!(a.entries, b.entries);
    }

    #[test]
    fn update_preserves_insertion_order() {
        let mut env = Environment::new();
        env.set("A", b"1".to_vec());
        env.set("B", b"2".to_vec());
        env.set("A", b"3".to_vec());
        let names: Vec<&str> = env.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(env.get("A"), Some(b"3".as_slice()));
    }
}
