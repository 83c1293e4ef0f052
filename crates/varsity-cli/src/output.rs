//! Output handling.
//!
//! Result objects always print as JSON on stdout. Human-facing progress and
//! status lines go to stderr and are suppressed in `--json` mode, keeping
//! stdout clean for piping.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Print the command's result object to stdout.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Progress note on stderr, dropped in JSON mode.
pub fn line(message: &str) {
    if !is_json() {
        let _ = writeln!(io::stderr(), "{message}");
    }
}

fn status(color: Color, tag: &str, message: &str) {
    if is_json() {
        return;
    }
    let mut stream = StandardStream::stderr(ColorChoice::Auto);
    let _ = stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stream, "{tag}");
    let _ = stream.reset();
    let _ = writeln!(stream, " {message}");
}

pub fn success(message: &str) {
    status(Color::Green, "ok:", message);
}

pub fn failure(message: &str) {
    status(Color::Red, "fail:", message);
}
