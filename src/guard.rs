//! Reentrancy gate shared by the redraw and resize handlers.

use std::cell::Cell;

/// Binary gate that admits one guarded routine at a time.
///
/// A failed [`acquire`](Self::acquire) means an overlapping event arrived while
/// another handler was still running. Callers drop that event; they never queue
/// or retry it.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    held: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate. Returns `false` if it is already held.
    pub fn acquire(&self) -> bool {
        if self.held.get() {
            return false;
        }
        self.held.set(true);
        true
    }

    /// Open the gate. Idempotent.
    pub fn release(&self) {
        self.held.set(false);
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }

    /// Run `f` with the gate held, releasing it on every exit path.
    ///
    /// Returns `None` without calling `f` when the gate is already held.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        if !self.acquire() {
            return None;
        }
        let _held = Held(self);
        Some(f())
    }
}

struct Held<'a>(&'a ReentrancyGuard);

impl Drop for Held<'_> {
    fn drop(&mut self) {
        self.0.release();
    }
}
