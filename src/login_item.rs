//! Login-item registration.
//!
//! Registers or unregisters the running executable as a session login item.
//! Callers persist the `launch_at_login` flag only after the OS call
//! succeeds, so the stored flag and the actual registration state stay in
//! sync.

use anyhow::{Context, Result};
use auto_launch::AutoLaunchBuilder;

/// Name the login item is registered under.
pub const APP_NAME: &str = "Fetchbar";

/// Register (or unregister) the current executable as a login item.
pub fn set_enabled(enable: bool) -> Result<()> {
    let exe = std::env::current_exe().context("Could not determine executable path")?;

    let auto = AutoLaunchBuilder::new()
        .set_app_name(APP_NAME)
        .set_app_path(&exe.to_string_lossy())
        .build()
        .context("Failed to build login item manager")?;

    if enable {
        auto.enable().context("Failed to register login item")?;
    } else {
        auto.disable().context("Failed to unregister login item")?;
    }

    Ok(())
}
