//! Interrupt-to-poll trigger bridge.
//!
//! Trigger callbacks run in interrupt context on real hardware, so they are
//! restricted to flipping atomic latches here. The poll loop drains the
//! latches with the `take_*` methods; each firing is observed by exactly one
//! drain. A counting update signal lets a blocking consumer park until the
//! calendar has ticked at least once.

use rtc_common::TriggerConfig;
use rtc_driver::TriggerCallback;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Latch state shared between trigger hooks and the poll loop.
#[derive(Debug, Default)]
struct TriggerState {
    alarm: AtomicBool,
    second: AtomicBool,
    millisecond: AtomicBool,
    second_count: AtomicU32,
    millisecond_count: AtomicU32,
    updates: Mutex<u64>,
    update_signal: Condvar,
}

impl TriggerState {
    fn signal_update(&self) {
        if let Ok(mut count) = self.updates.lock() {
            *count += 1;
        }
        self.update_signal.notify_all();
    }
}

/// Bridges hardware trigger callbacks into pollable boolean latches.
///
/// The periodic triggers divide the raw hardware rate: the second latch is
/// set once per `second_period` raw one-second firings, the millisecond
/// latch once per `millisecond_period` raw one-millisecond firings. Each
/// hook resets its division counter when it sets the latch.
pub struct TriggerBridge {
    state: Arc<TriggerState>,
    second_period: u32,
    millisecond_period: u32,
}

impl TriggerBridge {
    /// Create a bridge with the given trigger division periods.
    ///
    /// Periods are clamped to at least one raw firing.
    #[must_use]
    pub fn new(config: &TriggerConfig) -> Self {
        Self {
            state: Arc::new(TriggerState::default()),
            second_period: config.second_period.max(1),
            millisecond_period: config.millisecond_period.max(1),
        }
    }

    /// Hook for the hardware alarm trigger.
    #[must_use]
    pub fn alarm_hook(&self) -> TriggerCallback {
        let state = Arc::clone(&self.state);
        Box::new(move || {
            state.alarm.store(true, Ordering::Release);
            state.signal_update();
        })
    }

    /// Hook for the hardware one-second trigger.
    #[must_use]
    pub fn second_hook(&self) -> TriggerCallback {
        let state = Arc::clone(&self.state);
        let period = self.second_period;
        Box::new(move || {
            let fired = state.second_count.fetch_add(1, Ordering::AcqRel) + 1;
            if fired >= period {
                state.second_count.store(0, Ordering::Release);
                state.second.store(true, Ordering::Release);
            }
            state.signal_update();
        })
    }

    /// Hook for the hardware one-millisecond trigger.
    #[must_use]
    pub fn millisecond_hook(&self) -> TriggerCallback {
        let state = Arc::clone(&self.state);
        let period = self.millisecond_period;
        Box::new(move || {
            let fired = state.millisecond_count.fetch_add(1, Ordering::AcqRel) + 1;
            if fired >= period {
                state.millisecond_count.store(0, Ordering::Release);
                state.millisecond.store(true, Ordering::Release);
            }
        })
    }

    /// Consume the alarm latch, returning whether it was set.
    pub fn take_alarm(&self) -> bool {
        self.state.alarm.swap(false, Ordering::AcqRel)
    }

    /// Consume the one-second latch, returning whether it was set.
    pub fn take_second(&self) -> bool {
        self.state.second.swap(false, Ordering::AcqRel)
    }

    /// Consume the one-millisecond latch, returning whether it was set.
    pub fn take_millisecond(&self) -> bool {
        self.state.millisecond.swap(false, Ordering::AcqRel)
    }

    /// Total update signals observed so far.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.state.updates.lock().map(|count| *count).unwrap_or(0)
    }

    /// Block until at least one new update signal arrives or `timeout`
    /// elapses. Returns `true` if an update was observed.
    pub fn wait_for_update(&self, timeout: Duration) -> bool {
        let Ok(guard) = self.state.updates.lock() else {
            return false;
        };
        let seen = *guard;
        let Ok((guard, _)) = self
            .state
            .update_signal
            .wait_timeout_while(guard, timeout, |count| *count <= seen)
        else {
            return false;
        };
        *guard > seen
    }
}
