use std::io::{self, Write};

use console::style;
use dialoguer::Input;

pub fn info(message: &str) {
    let _ = writeln!(io::stderr(), "{}", message);
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}

pub fn notice(label: &str, message: &str) {
    let _ = writeln!(io::stderr(), "{} {}", style(label).cyan(), message);
}

/// Reads one line of input; an empty line is allowed.
pub fn prompt(label: &str) -> Result<String, dialoguer::Error> {
    Input::<String>::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
}
