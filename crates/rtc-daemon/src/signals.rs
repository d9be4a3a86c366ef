//! Signal handling for graceful daemon shutdown.
//!
//! SIGTERM and SIGINT request shutdown, SIGHUP requests a config reload.
//! Signal handlers must be async-signal-safe, so they only store to static
//! atomic flags; the poll loop picks the flags up on its next pass.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tracing::debug;

static SHUTDOWN_FLAG: AtomicBool = AtomicBool::new(false);
static RELOAD_FLAG: AtomicBool = AtomicBool::new(false);
static SIGNAL_COUNT: AtomicU32 = AtomicU32::new(0);

/// Handle over the process signal flags.
///
/// Shutdown can come from a delivered signal or from the daemon itself
/// (tick limit, fatal error). The two are tracked separately so internal
/// requests and tests never touch the process-wide flags.
pub struct SignalHandler {
    internal_shutdown: AtomicBool,
}

impl SignalHandler {
    /// Register the process signal handlers and return a handle.
    ///
    /// On non-Unix platforms only internal shutdown requests are supported.
    pub fn install() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            use std::os::raw::c_int;

            extern "C" fn shutdown_handler(_: c_int) {
                SHUTDOWN_FLAG.store(true, Ordering::Relaxed);
                SIGNAL_COUNT.fetch_add(1, Ordering::Relaxed);
            }

            extern "C" fn reload_handler(_: c_int) {
                RELOAD_FLAG.store(true, Ordering::Relaxed);
                SIGNAL_COUNT.fetch_add(1, Ordering::Relaxed);
            }

            set_handler(libc::SIGTERM, shutdown_handler as libc::sighandler_t)?;
            set_handler(libc::SIGINT, shutdown_handler as libc::sighandler_t)?;
            set_handler(libc::SIGHUP, reload_handler as libc::sighandler_t)?;
            debug!("Unix signal handlers registered");
        }

        Ok(Self {
            internal_shutdown: AtomicBool::new(false),
        })
    }

    /// Check if shutdown has been requested, by signal or internally.
    #[inline]
    pub fn shutdown_requested(&self) -> bool {
        self.internal_shutdown.load(Ordering::Relaxed) || SHUTDOWN_FLAG.load(Ordering::Relaxed)
    }

    /// Check if reload has been requested (clears the flag).
    #[inline]
    pub fn take_reload_request(&self) -> bool {
        RELOAD_FLAG.swap(false, Ordering::Relaxed)
    }

    /// Request shutdown from inside the daemon.
    pub fn request_shutdown(&self) {
        self.internal_shutdown.store(true, Ordering::Relaxed);
    }

    /// Number of process signals delivered so far.
    pub fn signal_count(&self) -> u32 {
        SIGNAL_COUNT.load(Ordering::Relaxed)
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn set_handler(signal: std::os::raw::c_int, handler: libc::sighandler_t) -> std::io::Result<()> {
    // SAFETY: the registered handlers only store to static atomics, which
    // is async-signal-safe
    if unsafe { libc::signal(signal, handler) } == libc::SIG_ERR {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}
