//! Modal dialogs via AppleScript.
//!
//! The app has no windows of its own, so prompts and warnings are shown
//! through `osascript`. Dialogs are modal for the user but must not stall
//! the event loop: the refresh timer keeps firing while a prompt is open.
//! Each dialog therefore runs on its own thread and reports back over a
//! channel, the same shape as the fetch worker.

use anyhow::{Context, Result};
use std::process::Command;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// The outcome of a prompt: `Ok(Some(text))` on Save, `Ok(None)` on Cancel.
pub type PromptReply = Result<Option<String>>;

/// Escape a string for safe interpolation into AppleScript.
///
/// Replaces backslashes and double quotes with their escaped forms
/// to prevent AppleScript injection.
fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// AppleScript for a text-input dialog that prints only the entered text.
fn prompt_script(title: &str, message: &str, default: &str) -> String {
    format!(
        r#"text returned of (display dialog "{}" with title "{}" default answer "{}" buttons {{"Cancel", "Save"}} default button "Save")"#,
        escape_applescript(message),
        escape_applescript(title),
        escape_applescript(default),
    )
}

/// AppleScript for a warning alert with a single OK button.
fn warning_script(title: &str, message: &str) -> String {
    format!(
        r#"display alert "{}" message "{}" as warning"#,
        escape_applescript(title),
        escape_applescript(message),
    )
}

/// Run a script and capture its stdout.
///
/// osascript exits non-zero when the user cancels a dialog; that maps to
/// `Ok(None)`.
fn run_script(script: &str) -> PromptReply {
    let output = Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .context("Failed to run osascript")?;

    if !output.status.success() {
        return Ok(None);
    }

    let text = String::from_utf8_lossy(&output.stdout)
        .trim_end_matches('\n')
        .to_string();
    Ok(Some(text))
}

/// Show a text prompt pre-filled with `default` without blocking the caller.
///
/// The dialog runs on its own thread; the returned receiver yields exactly
/// one reply once it is dismissed.
pub fn prompt_text(title: &str, message: &str, default: &str) -> Receiver<PromptReply> {
    let script = prompt_script(title, message, default);
    let (tx, rx) = channel();
    thread::spawn(move || {
        let _ = tx.send(run_script(&script));
    });
    rx
}

/// Show a warning alert without blocking the caller.
pub fn show_warning(title: &str, message: &str) {
    let script = warning_script(title, message);
    thread::spawn(move || {
        if let Err(e) = run_script(&script) {
            eprintln!("[fetchbar] Could not show warning: {:#}", e);
        }
    });
}
