//! Fetch pipeline: performs the HTTP GET off the UI loop and delivers
//! results back over a channel.
//!
//! The response body is expected to be a JSON object whose values are all
//! strings; only the `"data"` key is read. Every request carries a sequence
//! number so the UI can ignore results of superseded requests.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

/// The terminal state of one fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The string under the `"data"` key, verbatim.
    Value(String),
    /// No URL configured; no network call was made.
    NoUrl,
    /// Transport-level failure (connection error, unparseable URL, lost body).
    /// Carries the error detail for diagnostics.
    Transport(String),
    /// Body was not a string-valued JSON object, or the `"data"` key was absent.
    InvalidData,
}

impl FetchOutcome {
    /// The text to show in the menu bar for this outcome.
    pub fn display_text(&self) -> &str {
        match self {
            FetchOutcome::Value(value) => value,
            FetchOutcome::NoUrl => "No URL set",
            FetchOutcome::Transport(_) => "Error fetching data",
            FetchOutcome::InvalidData => "Invalid data",
        }
    }
}

/// Decode a response body as a string-valued JSON object and extract the
/// `"data"` key.
pub fn decode_body(body: &str) -> FetchOutcome {
    match serde_json::from_str::<HashMap<String, String>>(body) {
        Ok(mut object) => match object.remove("data") {
            Some(value) => FetchOutcome::Value(value),
            None => FetchOutcome::InvalidData,
        },
        Err(_) => FetchOutcome::InvalidData,
    }
}

struct FetchJob {
    seq: u64,
    url: Option<String>,
}

/// A completed fetch, tagged with the sequence number of the request that
/// produced it.
#[derive(Debug)]
pub struct FetchResult {
    pub seq: u64,
    pub outcome: FetchOutcome,
}

/// Issues fetch requests to a dedicated worker thread and collects results.
///
/// The worker owns the HTTP client; the UI loop never blocks on the network.
pub struct Fetcher {
    jobs: Sender<FetchJob>,
    results: Receiver<FetchResult>,
    issued: u64,
    /// Latched once the worker is observed dead, so its loss is logged once
    /// instead of on every loop wake-up.
    worker_gone: bool,
}

impl Fetcher {
    /// Spawn the worker thread.
    pub fn spawn() -> Self {
        let (job_tx, job_rx) = channel::<FetchJob>();
        let (result_tx, result_rx) = channel::<FetchResult>();

        thread::spawn(move || worker(job_rx, result_tx));

        Self {
            jobs: job_tx,
            results: result_rx,
            issued: 0,
            worker_gone: false,
        }
    }

    /// A fetcher whose worker has already exited. Test-only.
    #[cfg(test)]
    fn with_dead_worker() -> Self {
        let (job_tx, _) = channel::<FetchJob>();
        let (result_tx, result_rx) = channel::<FetchResult>();
        drop(result_tx);
        Self {
            jobs: job_tx,
            results: result_rx,
            issued: 0,
            worker_gone: false,
        }
    }

    /// Queue a fetch of the given URL and return its sequence number.
    ///
    /// `None` or an empty string produces a [`FetchOutcome::NoUrl`] result
    /// without touching the network.
    pub fn request(&mut self, url: Option<String>) -> u64 {
        self.issued += 1;
        let seq = self.issued;
        if self.jobs.send(FetchJob { seq, url }).is_err() {
            self.note_worker_gone();
        }
        seq
    }

    /// Number of requests issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Whether a result belongs to the most recently issued request.
    ///
    /// Results of superseded requests must not update the display.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.issued
    }

    /// Non-blocking: take the next completed result, if any.
    pub fn poll(&mut self) -> Option<FetchResult> {
        match self.results.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.note_worker_gone();
                None
            }
        }
    }

    fn note_worker_gone(&mut self) {
        if !self.worker_gone {
            self.worker_gone = true;
            eprintln!("[fetchbar] Fetch worker is gone; further fetches will not complete");
        }
    }

    /// Blocking: wait up to `timeout` for the next completed result.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchResult> {
        self.results.recv_timeout(timeout).ok()
    }
}

fn worker(jobs: Receiver<FetchJob>, results: Sender<FetchResult>) {
    let client = match reqwest::blocking::Client::builder().build() {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("[fetchbar] Failed to build HTTP client: {}", e);
            None
        }
    };

    while let Ok(job) = jobs.recv() {
        let outcome = match &client {
            Some(client) => perform(client, job.url.as_deref()),
            None => FetchOutcome::Transport("HTTP client unavailable".to_string()),
        };
        if results
            .send(FetchResult {
                seq: job.seq,
                outcome,
            })
            .is_err()
        {
            // Receiver dropped, the app is shutting down.
            break;
        }
    }
}

/// Run one fetch cycle: GET the URL and decode the body.
///
/// A malformed URL fails inside the client and surfaces as `Transport`,
/// the same as a connection error. Non-2xx responses still have their body
/// decoded; only transport-level failures short-circuit.
fn perform(client: &reqwest::blocking::Client, url: Option<&str>) -> FetchOutcome {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return FetchOutcome::NoUrl;
    };

    let response = match client.get(url).send() {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Transport(e.to_string()),
    };

    match response.text() {
        Ok(body) => decode_body(&body),
        Err(e) => FetchOutcome::Transport(e.to_string()),
    }
}
