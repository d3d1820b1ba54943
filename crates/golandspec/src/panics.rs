//! Captures where and why spec code panicked.
//!
//! A single process-wide hook is installed on first use. It only records
//! panics raised while [`run_guarded`] is executing spec code on the current
//! thread; any other panic goes to whatever hook was installed before.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;

use crate::summary::{CodeLocation, SpecFailure, SpecState};

/// Payload of [`crate::fail`].
pub(crate) struct FailSignal(pub(crate) String);

/// Payload of [`crate::skip`].
pub(crate) struct SkipSignal(pub(crate) String);

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_LOCATION: RefCell<Option<CodeLocation>> = const { RefCell::new(None) };
}

static HOOK: Lazy<()> = Lazy::new(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if !CAPTURING.with(Cell::get) {
            previous(info);
            return;
        }
        let location = match info.location() {
            Some(loc) => CodeLocation::new(loc.file(), loc.line()),
            None => CodeLocation::default(),
        }
        .with_stack_trace(Backtrace::force_capture().to_string());
        LAST_LOCATION.with(|slot| *slot.borrow_mut() = Some(location));
    }));
});

/// Restores the previous capture flag on drop, unwinding included.
struct CaptureGuard {
    was_capturing: bool,
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURING.with(|c| c.set(self.was_capturing));
    }
}

/// Runs `f` with panic capture enabled on this thread.
fn capture<R>(f: impl FnOnce() -> R) -> R {
    Lazy::force(&HOOK);
    let _guard = CaptureGuard {
        was_capturing: CAPTURING.with(|c| c.replace(true)),
    };
    f()
}

#[cfg(test)]
pub(crate) fn is_capturing() -> bool {
    CAPTURING.with(Cell::get)
}

/// Runs a piece of spec code, converting a panic into a state and failure.
pub(crate) fn run_guarded(f: &dyn Fn()) -> Option<(SpecState, SpecFailure)> {
    LAST_LOCATION.with(|slot| slot.borrow_mut().take());
    let payload = capture(|| panic::catch_unwind(AssertUnwindSafe(f))).err()?;

    let location = LAST_LOCATION
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_default();
    let (state, message) = classify(payload.as_ref());
    Some((state, SpecFailure { message, location }))
}

fn classify(payload: &(dyn Any + Send)) -> (SpecState, String) {
    if let Some(FailSignal(msg)) = payload.downcast_ref::<FailSignal>() {
        (SpecState::Failed, msg.clone())
    } else if let Some(SkipSignal(reason)) = payload.downcast_ref::<SkipSignal>() {
        (SpecState::Skipped, reason.clone())
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (SpecState::Panicked, s.to_string())
    } else if let Some(s) = payload.downcast_ref::<String>() {
        (SpecState::Panicked, s.clone())
    } else {
        (SpecState::Panicked, "unknown panic".to_string())
    }
}
