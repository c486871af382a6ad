use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::DateError;

/// Callback receiving every invalid-input error the engine absorbs.
pub type ErrorHandler = Arc<dyn Fn(&DateError) + Send + Sync>;

/// Millisecond clock with a freezable override slot for deterministic
/// tests. The override is last-write-wins; resetting restores the
/// system clock.
#[derive(Debug, Default)]
pub(crate) struct Clock {
    fixed: Mutex<Option<i64>>,
}

impl Clock {
    pub(crate) fn now(&self) -> i64 {
        let fixed = *self.fixed.lock().unwrap_or_else(PoisonError::into_inner);
        fixed.unwrap_or_else(system_now)
    }

    pub(crate) fn fix_at(&self, instant: i64) {
        *self.fixed.lock().unwrap_or_else(PoisonError::into_inner) = Some(instant);
    }

    pub(crate) fn reset(&self) {
        *self.fixed.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

fn system_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// Holder for the process-wide error callback. Defaults to a no-op;
/// replaceable, last write wins.
pub(crate) struct ErrorHook {
    handler: Mutex<ErrorHandler>,
}

impl Default for ErrorHook {
    fn default() -> Self {
        Self {
            handler: Mutex::new(Arc::new(|_: &DateError| {})),
        }
    }
}

impl ErrorHook {
    pub(crate) fn set(&self, handler: ErrorHandler) {
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner) = handler;
    }

    /// Invokes the current handler. The lock is released before the call
    /// so a handler may call back into the engine (to read the clock,
    /// for instance) without deadlocking.
    pub(crate) fn report(&self, error: &DateError) {
        let handler = Arc::clone(&self.handler.lock().unwrap_or_else(PoisonError::into_inner));
        handler(error);
    }
}

impl fmt::Debug for ErrorHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHook").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_clock_fix_and_reset() {
        let clock = Clock::default();
        clock.fix_at(1_464_350_400_000);
        assert_eq!(clock.now(), 1_464_350_400_000);
        // last write wins
        clock.fix_at(42);
        assert_eq!(clock.now(), 42);

        clock.reset();
        // back on the system clock, which is well past the epoch
        assert!(clock.now() > 1_464_350_400_000);
    }

    #[test]
    fn test_error_hook_default_is_noop() {
        let hook = ErrorHook::default();
        hook.report(&DateError::UnknownPeriod("decade".to_owned()));
    }

    #[test]
    fn test_error_hook_replacement() {
        let hook = ErrorHook::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        hook.set(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        hook.report(&DateError::UnknownFormat("nope".to_owned()));
        hook.report(&DateError::UnknownFormat("nope".to_owned()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
