//! Tray menu construction for fetchbar.
//!
//! The menu is static: two settings prompts, the launch-at-login checkbox,
//! a separator, and Quit.

use tray_icon::menu::{accelerator::Accelerator, CheckMenuItem, Menu, MenuItem, PredefinedMenuItem};

/// Menu item IDs for handling menu events.
pub mod ids {
    /// ID for the "Change URL" menu item.
    pub const CHANGE_URL: &str = "change_url";
    /// ID for the "Change Refresh Interval" menu item.
    pub const CHANGE_INTERVAL: &str = "change_interval";
    /// ID for the "Start on Login" checkbox item.
    pub const START_ON_LOGIN: &str = "start_on_login";
    /// ID for the "Quit" menu item.
    pub const QUIT: &str = "quit";
}

/// The tray menu plus a handle to the checkbox item, which the app updates
/// after login-item registration succeeds or fails.
pub struct TrayMenu {
    pub menu: Menu,
    pub start_on_login: CheckMenuItem,
}

/// Build the tray menu.
///
/// `launch_at_login` initializes the checkbox from the persisted flag.
pub fn build_menu(launch_at_login: bool) -> TrayMenu {
    let menu = Menu::new();

    let change_url = MenuItem::with_id(ids::CHANGE_URL, "Change URL", true, None::<Accelerator>);
    let _ = menu.append(&change_url);

    let change_interval = MenuItem::with_id(
        ids::CHANGE_INTERVAL,
        "Change Refresh Interval",
        true,
        None::<Accelerator>,
    );
    let _ = menu.append(&change_interval);

    let start_on_login = CheckMenuItem::with_id(
        ids::START_ON_LOGIN,
        "Start on Login",
        true,
        launch_at_login,
        None::<Accelerator>,
    );
    let _ = menu.append(&start_on_login);

    let _ = menu.append(&PredefinedMenuItem::separator());

    let quit = MenuItem::with_id(ids::QUIT, "Quit Fetchbar", true, None::<Accelerator>);
    let _ = menu.append(&quit);

    TrayMenu {
        menu,
        start_on_login,
    }
}

// Note: Tests for build_menu are skipped because tray-icon menus can only
// be created on the main thread on macOS. The menu is exercised manually
// via the menubar app.
