//! fetchbar - menu bar JSON fetcher
//!
//! Shows the `"data"` value of a periodically fetched JSON document in the
//! macOS menu bar.

#[cfg(not(target_os = "macos"))]
fn main() {
    eprintln!("fetchbar is only supported on macOS");
    std::process::exit(1);
}

#[cfg(target_os = "macos")]
fn main() {
    if let Err(e) = fetchbar::menubar::app::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
