/// Leading-edge rate limiter.
/// Fires on the first call, then refuses until `interval_ms` has elapsed.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last_fired: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fired: None,
        }
    }

    /// Returns true (and records `now`) if the throttle is open.
    pub fn try_fire(&mut self, now: f64) -> bool {
        match self.last_fired {
            Some(last) if now - last < self.interval_ms => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }

    /// Whether a call at `now` would fire, without recording it.
    pub fn is_open(&self, now: f64) -> bool {
        self.last_fired
            .map_or(true, |last| now - last >= self.interval_ms)
    }

    pub fn last_fired(&self) -> Option<f64> {
        self.last_fired
    }

    pub fn interval(&self) -> f64 {
        self.interval_ms
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

/// Trailing-edge debouncer holding the most recent value.
///
/// Every `push` replaces the pending value and restarts the quiet period.
/// `poll` hands the value out once no push has arrived for `delay_ms`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: f64) {
        self.pending = Some((value, now + self.delay_ms));
    }

    /// Take the pending value if its quiet period is over.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
