//! The status controller: tray icon, refresh timer, and menu actions.
//!
//! Everything runs on the tao event loop. Blocking work happens elsewhere:
//! the HTTP fetch on the fetch worker thread, modal prompts on dialog
//! threads. Both deliver over channels, so the timer keeps firing and fetch
//! results keep landing while a dialog is open, and display-text updates
//! always happen here, on the UI loop.

use crate::dialog::{self, PromptReply};
use crate::fetch::{FetchOutcome, FetchResult, Fetcher};
use crate::login_item;
use crate::menubar::menu::{build_menu, ids, TrayMenu};
use crate::scheduler::RefreshTimer;
use crate::settings::{parse_interval_input, SettingsStore};
use anyhow::{Context, Result};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoop};
use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};
use tray_icon::menu::MenuEvent;
use tray_icon::{TrayIcon, TrayIconBuilder};

/// How often the loop wakes to drain menu events, fetch results, and prompt
/// replies when no refresh tick is due sooner.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Which prompt is currently on screen.
enum PendingPrompt {
    Url,
    Interval,
}

struct StatusController {
    store: SettingsStore,
    fetcher: Fetcher,
    timer: RefreshTimer,
    tray: TrayIcon,
    menu: TrayMenu,
    /// At most one dialog at a time; a second menu click while one is open
    /// is ignored.
    prompt: Option<(PendingPrompt, Receiver<PromptReply>)>,
}

impl StatusController {
    fn set_title(&self, text: &str) {
        self.tray.set_title(Some(text));
    }

    /// Read the URL from settings and queue one fetch cycle.
    ///
    /// An unset URL still goes through the worker so the "No URL set" label
    /// arrives on the same path as every other outcome.
    fn trigger_fetch(&mut self) {
        let settings = self.store.load();
        self.fetcher.request(settings.url().map(str::to_string));
    }

    /// Apply a completed fetch to the tray title.
    ///
    /// Results of superseded requests are dropped so a slow response can
    /// never overwrite the result of a newer one.
    fn apply_result(&mut self, result: &FetchResult) {
        if !self.fetcher.is_current(result.seq) {
            eprintln!(
                "[fetchbar] Dropping stale fetch result {} (latest is {})",
                result.seq,
                self.fetcher.issued()
            );
            return;
        }

        if let FetchOutcome::Transport(detail) = &result.outcome {
            eprintln!("[fetchbar] Error fetching data: {}", detail);
        }

        self.set_title(result.outcome.display_text());
    }

    /// "Change URL" menu action: open the prompt.
    fn change_url(&mut self) {
        if self.prompt.is_some() {
            return;
        }
        let current = self.store.load().fetch_url.unwrap_or_default();
        let rx = dialog::prompt_text(
            "Enter Fetch URL",
            "Enter the URL to fetch the data from:",
            &current,
        );
        self.prompt = Some((PendingPrompt::Url, rx));
    }

    /// "Change Refresh Interval" menu action: open the prompt.
    fn change_interval(&mut self) {
        if self.prompt.is_some() {
            return;
        }
        let current = self.store.load().effective_interval().to_string();
        let rx = dialog::prompt_text(
            "Set Refresh Interval",
            "Enter the refresh interval in seconds:",
            &current,
        );
        self.prompt = Some((PendingPrompt::Interval, rx));
    }

    /// Check whether the open prompt, if any, has been dismissed and apply
    /// its reply.
    fn poll_prompt(&mut self) {
        let Some((kind, rx)) = self.prompt.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(reply) => match kind {
                PendingPrompt::Url => self.apply_url_reply(reply),
                PendingPrompt::Interval => self.apply_interval_reply(reply),
            },
            Err(TryRecvError::Empty) => {
                // Dialog still open.
                self.prompt = Some((kind, rx));
            }
            Err(TryRecvError::Disconnected) => {
                eprintln!("[fetchbar] Prompt thread exited without a reply");
            }
        }
    }

    /// Persist a confirmed URL verbatim and trigger an immediate fetch.
    /// Cancelling leaves everything unchanged.
    fn apply_url_reply(&mut self, reply: PromptReply) {
        match reply {
            Ok(Some(new_url)) => match self.store.set_url(&new_url) {
                Ok(settings) => {
                    self.trigger_fetch();
                    // A URL configured mid-session gains periodic refresh.
                    if !self.timer.is_running() {
                        self.timer
                            .start(settings.effective_interval(), Instant::now());
                    }
                }
                Err(e) => eprintln!("[fetchbar] Failed to save URL: {:#}", e),
            },
            Ok(None) => {}
            Err(e) => eprintln!("[fetchbar] URL prompt failed: {:#}", e),
        }
    }

    /// A valid integer reschedules the timer without fetching; anything else
    /// shows a warning and leaves settings and timer untouched.
    fn apply_interval_reply(&mut self, reply: PromptReply) {
        match reply {
            Ok(Some(input)) => match parse_interval_input(&input) {
                Some(secs) => match self.store.set_refresh_interval(secs) {
                    Ok(settings) => {
                        self.timer
                            .start(settings.effective_interval(), Instant::now());
                    }
                    Err(e) => eprintln!("[fetchbar] Failed to save interval: {:#}", e),
                },
                None => {
                    dialog::show_warning(
                        "Invalid Interval",
                        "Please enter a valid integer for the refresh interval.",
                    );
                }
            },
            Ok(None) => {}
            Err(e) => eprintln!("[fetchbar] Interval prompt failed: {:#}", e),
        }
    }

    /// "Start on Login" menu action.
    ///
    /// Registration first: the flag and the checkbox only change after the
    /// OS call succeeds. On failure the checkbox is restored to the persisted
    /// state and the error is surfaced to the user.
    fn toggle_start_on_login(&mut self) {
        let persisted = self.store.load().launch_at_login;
        let target = !persisted;

        match login_item::set_enabled(target) {
            Ok(()) => {
                if let Err(e) = self.store.set_launch_at_login(target) {
                    eprintln!("[fetchbar] Failed to persist login flag: {:#}", e);
                }
                self.menu.start_on_login.set_checked(target);
            }
            Err(e) => {
                eprintln!("[fetchbar] Failed to update login item: {:#}", e);
                self.menu.start_on_login.set_checked(persisted);
                let action = if target { "register" } else { "unregister" };
                dialog::show_warning(
                    "Start on Login",
                    &format!("Could not {} the login item: {}", action, e),
                );
            }
        }
    }
}

/// Run the menubar application.
pub fn run() -> Result<()> {
    eprintln!("[fetchbar] Starting...");

    let store = SettingsStore::at_default_location()?;
    let settings = store.load();
    eprintln!(
        "[fetchbar] Settings: url={:?} interval={}s launch_at_login={}",
        settings.url(),
        settings.effective_interval(),
        settings.launch_at_login
    );

    // Accessory policy: menu bar only, no dock icon.
    let mut event_loop: EventLoop<()> = EventLoop::new();
    event_loop.set_activation_policy(ActivationPolicy::Accessory);

    let menu = build_menu(settings.launch_at_login);
    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(menu.menu.clone()))
        .with_tooltip("fetchbar")
        .with_title("Loading...")
        .build()
        .context("Failed to create tray icon")?;

    let mut controller = StatusController {
        store,
        fetcher: Fetcher::spawn(),
        timer: RefreshTimer::new(),
        tray,
        menu,
        prompt: None,
    };

    if settings.url().is_some() {
        controller.trigger_fetch();
        controller
            .timer
            .start(settings.effective_interval(), Instant::now());
    } else {
        controller.set_title("Set URL in Settings");
    }

    eprintln!("[fetchbar] Tray icon created, entering event loop...");

    event_loop.run(move |event, _, control_flow| {
        // Once Quit has been requested, leave the exit in place untouched.
        if *control_flow == ControlFlow::Exit {
            return;
        }

        // Wake at the refresh deadline or the next poll tick, whichever
        // comes first.
        let poll_at = Instant::now() + POLL_INTERVAL;
        let wake_at = controller
            .timer
            .next_deadline()
            .map_or(poll_at, |deadline| deadline.min(poll_at));
        *control_flow = ControlFlow::WaitUntil(wake_at);

        if let Event::NewEvents(StartCause::ResumeTimeReached { .. }) = event {
            if controller.timer.fire_if_due(Instant::now()) {
                controller.trigger_fetch();
            }
        }

        // A dismissed prompt is applied before draining results so a fetch
        // it triggers is issued promptly.
        controller.poll_prompt();

        // Completed fetches update the title here, on the UI loop.
        while let Some(result) = controller.fetcher.poll() {
            controller.apply_result(&result);
        }

        while let Ok(menu_event) = MenuEvent::receiver().try_recv() {
            match menu_event.id.0.as_str() {
                ids::CHANGE_URL => controller.change_url(),
                ids::CHANGE_INTERVAL => controller.change_interval(),
                ids::START_ON_LOGIN => controller.toggle_start_on_login(),
                ids::QUIT => {
                    eprintln!("[fetchbar] Quit requested");
                    *control_flow = ControlFlow::Exit;
                }
                other => eprintln!("[fetchbar] Unhandled menu item: {}", other),
            }
        }
    });
}
