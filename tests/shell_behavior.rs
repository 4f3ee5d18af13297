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

//! Black-box, cross-stage behavioral tests, in the style of `yash-cli`'s
//! `tests/scripted_test.rs`: each test feeds a script to the real compiled
//! binary over stdin and asserts on its stdout and exit status, so the
//! whole lex → parse → expand → heredoc → exec pipeline runs for real
//! (including actual `fork`/`execve` against `/bin/echo`, `/bin/cat`, etc.)
//! rather than through any in-process mock.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_script(script: &str, extra_env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nyxsh"));
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env("PATH", std::env::var("PATH").unwrap_or_default());
    for (k, v) in extra_env {
        cmd.env(k, v);
    }
    let mut child = cmd.spawn().expect("failed to spawn nyxsh binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().expect("failed to wait on nyxsh")
}

fn stdout_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn pipeline_reports_last_commands_output_and_status() {
    let out = run_script("echo hello | wc -c\n", &[]);
    assert_eq!(stdout_of(&out), "6\n");
    assert!(out.status.success());
}

#[test]
fn or_after_failed_and_runs_the_fallback() {
    let out = run_script("false && echo skipped || echo fallback\n", &[]);
    assert_eq!(stdout_of(&out), "fallback\n");
    assert!(out.status.success());
}

#[test]
fn unquoted_heredoc_delimiter_expands_variables_in_the_body() {
    let out = run_script("cat <<END\nhi $USER\nEND\n", &[("USER", "ada")]);
    assert_eq!(stdout_of(&out), "hi ada\n");
    assert!(out.status.success());
}

#[test]
fn quoted_heredoc_delimiter_suppresses_expansion() {
    let out = run_script("cat <<'END'\nhi $USER\nEND\n", &[("USER", "ada")]);
    assert_eq!(stdout_of(&out), "hi $USER\n");
    assert!(out.status.success());
}

#[test]
fn exported_value_with_spaces_is_not_field_split() {
    let out = run_script("export A=\"x y\"\necho $A\n", &[]);
    assert_eq!(stdout_of(&out), "x y\n");
    assert!(out.status.success());
}

#[test]
fn pipeline_of_three_reports_the_last_commands_output() {
    let out = run_script("echo a | echo b | echo c\n", &[]);
    assert_eq!(stdout_of(&out), "c\n");
    assert!(out.status.success());
}

#[test]
fn nonexistent_command_is_127_and_explains_itself() {
    let out = run_script("definitely_not_a_real_command_xyz\n", &[]);
    assert_eq!(out.status.code(), Some(127));
    assert!(String::from_utf8_lossy(&out.stderr).contains("command not found"));
}

#[test]
fn empty_and_whitespace_only_lines_are_no_ops() {
    let out = run_script("\n   \n", &[]);
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), "");
}

#[test]
fn unterminated_quote_is_a_syntax_error() {
    let out = run_script("echo 'unterminated\n", &[]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn trailing_pipe_is_a_syntax_error() {
    let out = run_script("echo hi |\n", &[]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn export_unset_export_matches_a_single_export() {
    let out = run_script("export X=1\nunset X\nexport X=1\nenv\n", &[]);
    let stdout = stdout_of(&out);
    assert_eq!(stdout.matches("X=1").count(), 1);
}

#[test]
fn cd_then_pwd_reports_the_new_directory() {
    let tmp = std::env::temp_dir();
    let canonical = std::fs::canonicalize(&tmp).unwrap();
    let script = format!("cd {}\npwd\n", tmp.display());
    let out = run_script(&script, &[]);
    let stdout = stdout_of(&out);
    let reported = stdout.trim();
    let reported_canonical = std::fs::canonicalize(reported).unwrap();
    assert_eq!(reported_canonical, canonical);
}

#[test]
fn exit_256_wraps_to_zero_and_exit_negative_one_wraps_to_255() {
    let out = run_script("exit 256\n", &[]);
    assert_eq!(out.status.code(), Some(0));

    let out = run_script("exit -1\n", &[]);
    assert_eq!(out.status.code(), Some(255));
}

#[test]
fn dollar_question_reports_the_previous_commands_status() {
    let out = run_script("false\necho $?\n", &[]);
    assert_eq!(stdout_of(&out), "1\n");
}

#[test]
fn echo_dash_n_suppresses_the_trailing_newline() {
    let out = run_script("echo -n hi\n", &[]);
    assert_eq!(stdout_of(&out), "hi");
}

#[test]
fn redirect_output_truncates_and_creates_the_target_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let script = format!("echo hi > {}\n", path.display());
    let out = run_script(&script, &[]);
    assert!(out.status.success());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "hi\n");
}

#[test]
fn append_redirection_adds_to_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    std::fs::write(&path, "first\n").unwrap();
    let script = format!("echo second >> {}\n", path.display());
    let out = run_script(&script, &[]);
    assert!(out.status.success());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "first\nsecond\n");
}
