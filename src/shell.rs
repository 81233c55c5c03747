//! Running external tools through `sh -c`
//!
//! Tool diagnostics are never surfaced: stderr goes to /dev/null and a failed
//! spawn looks exactly like a command that printed nothing.

use std::process::{Command, Stdio};

/// Quote a string as a single POSIX shell word
///
/// # Example
/// ```
/// use workflow_context::shell::escape_arg;
///
/// assert_eq!(escape_arg("it's"), r"'it'\''s'");
/// ```
pub fn escape_arg(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Join a program and already-quoted arguments into one command line
pub fn command_line<I, S>(program: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg.as_ref());
    }
    line
}

/// Run a command line and collect stdout, one entry per line, trailing whitespace stripped
pub fn run_lines(command_line: &str) -> Vec<String> {
    log::debug!("Running: {}", command_line);

    let output = Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) => String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect(),
        Err(e) => {
            log::debug!("Could not run '{}': {}", command_line, e);
            Vec::new()
        }
    }
}

/// Run a command line for its side effect, ignoring the outcome
pub fn run_quiet(command_line: &str) {
    log::debug!("Running: {}", command_line);

    let status = Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    if let Err(e) = status {
        log::debug!("Could not run '{}': {}", command_line, e);
    }
}
