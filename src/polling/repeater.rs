use super::CancelToken;
use crate::shared::logging::append_console_log;
use crate::state::StatePaths;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct ActivePoll {
    token: CancelToken,
    interval: Duration,
}

/// Runs a check callback immediately and then on a fixed interval until stopped.
///
/// At most one poll is active per repeater: `start` cancels the previous run
/// before spawning the next. Ticks of one run execute sequentially on the
/// run's own thread. A tick that returns `Err` or panics is logged and the
/// next tick still happens.
#[derive(Debug)]
pub struct PollRepeater {
    name: String,
    paths: StatePaths,
    active: Mutex<Option<ActivePoll>>,
}

impl PollRepeater {
    pub fn new(name: impl Into<String>, paths: StatePaths) -> Self {
        Self {
            name: name.into(),
            paths,
            active: Mutex::new(None),
        }
    }

    /// Starts a new run and returns its token. Any previous run is cancelled first.
    pub fn start<F>(&self, interval: Duration, callback: F) -> CancelToken
    where
        F: FnMut(&CancelToken) -> Result<(), String> + Send + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let token = CancelToken::new();
        let mut active = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = active.take() {
            previous.token.cancel();
        }

        let run_token = token.clone();
        let name = self.name.clone();
        let paths = self.paths.clone();
        thread::spawn(move || run_poll_loop(&name, &paths, &run_token, interval, callback));

        *active = Some(ActivePoll {
            token: token.clone(),
            interval,
        });
        token
    }

    /// Cancels the active run. Idempotent; returns whether a run was still live.
    pub fn stop(&self) -> bool {
        let mut active = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match active.take() {
            Some(previous) => {
                let was_live = !previous.token.is_cancelled();
                previous.token.cancel();
                was_live
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .map(|active| {
                active
                    .as_ref()
                    .is_some_and(|poll| !poll.token.is_cancelled())
            })
            .unwrap_or(false)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.active
            .lock()
            .ok()
            .and_then(|active| active.as_ref().map(|poll| poll.interval))
    }
}

impl Drop for PollRepeater {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_poll_loop<F>(
    name: &str,
    paths: &StatePaths,
    token: &CancelToken,
    interval: Duration,
    mut callback: F,
) where
    F: FnMut(&CancelToken) -> Result<(), String>,
{
    append_console_log(
        paths,
        "info",
        "poll.started",
        &format!("poll={name} interval_ms={}", interval.as_millis()),
    );

    loop {
        if token.is_cancelled() {
            break;
        }

        match catch_unwind(AssertUnwindSafe(|| callback(token))) {
            Ok(Ok(())) => {}
            Ok(Err(message)) => {
                append_console_log(
                    paths,
                    "warn",
                    "poll.tick.error",
                    &format!("poll={name} {message}"),
                );
            }
            Err(_) => {
                append_console_log(
                    paths,
                    "error",
                    "poll.tick.panic",
                    &format!("poll={name} tick panicked; continuing"),
                );
            }
        }

        if !token.sleep(interval) {
            break;
        }
    }

    append_console_log(paths, "info", "poll.stopped", &format!("poll={name}"));
}
