//! Construction guard.
//!
//! A per-thread reentrant counter. While it is above zero the entity being
//! built is written on the raw path and no relinking happens.

use std::cell::Cell;
use std::marker::PhantomData;
use tracing::warn;

thread_local! {
    static CONSTRUCTION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Record entry into a constructor body.
pub fn enter_construction() {
    CONSTRUCTION_DEPTH.with(|depth| depth.set(depth.get() + 1));
}

/// Record exit from a constructor body. An unmatched exit leaves the
/// counter at zero.
pub fn exit_construction() {
    CONSTRUCTION_DEPTH.with(|depth| match depth.get() {
        0 => warn!("construction exit without matching enter"),
        n => depth.set(n - 1),
    });
}

/// Returns true while any constructor is running on this thread.
pub fn is_inside_construction() -> bool {
    construction_depth() > 0
}

/// Current nesting depth on this thread.
pub fn construction_depth() -> usize {
    CONSTRUCTION_DEPTH.with(Cell::get)
}

/// Enters construction on creation and exits on drop, including on unwind.
/// Bound to the creating thread.
#[derive(Debug)]
#[must_use = "construction ends when the scope is dropped"]
pub struct ConstructionScope {
    _not_send: PhantomData<*const ()>,
}

impl ConstructionScope {
    pub fn enter() -> Self {
        enter_construction();
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for ConstructionScope {
    fn drop(&mut self) {
        exit_construction();
    }
}
