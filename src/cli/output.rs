//! Colored terminal output helpers.
//!
//! Status lines go to stderr so stdout carries only ids, links, and
//! revealed secrets, which keeps the commands pipeable.

use console::style;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    eprintln!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}
