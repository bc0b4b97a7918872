use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Runs `op` up to `attempts` times total, sleeping `delay` before the
/// first retry and doubling it for each one after. The last error is
/// returned once attempts are exhausted. Callers typically pass 3 attempts
/// and a 1 s base delay.
pub async fn retry<T, E, F, Fut>(mut op: F, attempts: u32, delay: Duration) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut remaining = attempts.max(1);
    let mut delay = delay;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                remaining -= 1;
                if remaining == 0 {
                    return Err(err);
                }
                debug!("Retrying in {:?} ({} attempts left)", delay, remaining);
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
}

/// Trailing-edge debounce: only the most recent call within `wait` runs,
/// `wait` after it was scheduled. Earlier pending calls are aborted.
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(None),
        }
    }

    pub fn call<F>(&self, op: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap();
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        let wait = self.wait;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            op.await;
        }));
    }
}

/// Leading-edge throttle: the first call runs immediately and opens a
/// window of `limit`; calls inside the window are dropped. The window is
/// measured from the call that ran.
pub struct Throttler {
    limit: Duration,
    last_fired: Mutex<Option<Instant>>,
}

impl Throttler {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            last_fired: Mutex::new(None),
        }
    }

    /// Returns whether `op` ran.
    pub fn call<F: FnOnce()>(&self, op: F) -> bool {
        let now = Instant::now();
        {
            let mut last = self.last_fired.lock().unwrap();
            if let Some(fired) = *last {
                if now.duration_since(fired) < self.limit {
                    return false;
                }
            }
            *last = Some(now);
        }
        op();
        true
    }
}
