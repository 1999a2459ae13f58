//! Instrumented element types.

use std::cell::Cell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// Shared count of live [`Tracked`] values.
#[derive(Clone, Default)]
pub struct LiveCounter {
    live: Rc<Cell<usize>>,
}

impl LiveCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracked value. Counts as live until dropped.
    pub fn track(&self, value: i32) -> Tracked {
        self.live.set(self.live.get() + 1);
        Tracked {
            value,
            live: Rc::clone(&self.live),
        }
    }

    /// Number of tracked values (including clones) not yet dropped.
    pub fn live(&self) -> usize {
        self.live.get()
    }
}

/// A value whose constructions and drops are counted by a [`LiveCounter`].
///
/// A double drop shows up as an underflow panic, a leak as a non-zero
/// count at the end of a test.
pub struct Tracked {
    value: i32,
    live: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.live.set(self.live.get() + 1);
        Self {
            value: self.value,
            live: Rc::clone(&self.live),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let live = self.live.get();
        assert!(live > 0, "Tracked({}) dropped twice", self.value);
        self.live.set(live - 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

/// A budget of successful clones shared by every [`Fused`] value made from
/// it. Once spent, the next clone panics.
#[derive(Clone)]
pub struct Fuse {
    remaining: Rc<Cell<usize>>,
    live: Rc<Cell<usize>>,
}

impl Fuse {
    /// A fuse allowing `remaining` more clones.
    pub fn new(remaining: usize) -> Self {
        Self {
            remaining: Rc::new(Cell::new(remaining)),
            live: Rc::new(Cell::new(0)),
        }
    }

    /// Create a value without spending the fuse.
    pub fn make(&self, value: i32) -> Fused {
        self.live.set(self.live.get() + 1);
        Fused {
            value,
            remaining: Rc::clone(&self.remaining),
            live: Rc::clone(&self.live),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    pub fn set_remaining(&self, remaining: usize) {
        self.remaining.set(remaining);
    }

    /// Number of fused values not yet dropped.
    pub fn live(&self) -> usize {
        self.live.get()
    }
}

/// A value whose `Clone` panics once its [`Fuse`] is spent.
pub struct Fused {
    value: i32,
    remaining: Rc<Cell<usize>>,
    live: Rc<Cell<usize>>,
}

impl Fused {
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Fused {
    fn clone(&self) -> Self {
        let remaining = self.remaining.get();
        if remaining == 0 {
            panic!("fuse spent cloning Fused({})", self.value);
        }
        self.remaining.set(remaining - 1);
        self.live.set(self.live.get() + 1);
        Self {
            value: self.value,
            remaining: Rc::clone(&self.remaining),
            live: Rc::clone(&self.live),
        }
    }
}

impl Drop for Fused {
    fn drop(&mut self) {
        let live = self.live.get();
        assert!(live > 0, "Fused({}) dropped twice", self.value);
        self.live.set(live - 1);
    }
}

impl PartialEq for Fused {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Fused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fused({})", self.value)
    }
}

thread_local! {
    static DEFAULT_FUSE: Cell<Option<usize>> = const { Cell::new(None) };
    static BRITTLE_LIVE: Cell<usize> = const { Cell::new(0) };
}

/// Let `successes` more `Brittle::default()` calls succeed on this thread;
/// the one after panics and disarms the fuse.
pub fn arm_default_fuse(successes: usize) {
    DEFAULT_FUSE.with(|fuse| fuse.set(Some(successes)));
}

/// Make `Brittle::default()` infallible again on this thread.
pub fn disarm_default_fuse() {
    DEFAULT_FUSE.with(|fuse| fuse.set(None));
}

/// A value whose `Default` can be made to panic with [`arm_default_fuse`].
///
/// Live instances are counted per thread; see [`Brittle::live`].
pub struct Brittle {
    value: i32,
}

impl Brittle {
    pub fn new(value: i32) -> Self {
        BRITTLE_LIVE.with(|live| live.set(live.get() + 1));
        Self { value }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Number of `Brittle` values alive on this thread.
    pub fn live() -> usize {
        BRITTLE_LIVE.with(Cell::get)
    }
}

impl Default for Brittle {
    fn default() -> Self {
        DEFAULT_FUSE.with(|fuse| match fuse.get() {
            Some(0) => {
                fuse.set(None);
                panic!("default fuse spent");
            }
            Some(n) => fuse.set(Some(n - 1)),
            None => {}
        });
        Self::new(0)
    }
}

impl Clone for Brittle {
    fn clone(&self) -> Self {
        Self::new(self.value)
    }
}

impl Drop for Brittle {
    fn drop(&mut self) {
        BRITTLE_LIVE.with(|live| {
            assert!(live.get() > 0, "Brittle({}) dropped twice", self.value);
            live.set(live.get() - 1);
        });
    }
}

impl PartialEq for Brittle {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Brittle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Brittle({})", self.value)
    }
}

/// Shared count of live [`Charge`] values.
#[derive(Clone, Default)]
pub struct Charges {
    live: Rc<Cell<usize>>,
}

impl Charges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value that drops quietly.
    pub fn inert(&self, value: i32) -> Charge {
        self.make(value, false)
    }

    /// Create a value whose destructor panics.
    pub fn primed(&self, value: i32) -> Charge {
        self.make(value, true)
    }

    fn make(&self, value: i32, explodes: bool) -> Charge {
        self.live.set(self.live.get() + 1);
        Charge {
            value,
            explodes,
            live: Rc::clone(&self.live),
        }
    }

    /// Number of charges not yet dropped.
    pub fn live(&self) -> usize {
        self.live.get()
    }
}

/// A value whose `Drop` may panic.
///
/// The live count is decremented before the panic, so a charge that
/// exploded still counts as dropped. A second drop trips the underflow
/// assertion.
pub struct Charge {
    value: i32,
    explodes: bool,
    live: Rc<Cell<usize>>,
}

impl Charge {
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Drop for Charge {
    fn drop(&mut self) {
        let live = self.live.get();
        assert!(live > 0, "Charge({}) dropped twice", self.value);
        self.live.set(live - 1);
        if self.explodes && !std::thread::panicking() {
            panic!("Charge({}) exploded on drop", self.value);
        }
    }
}

impl fmt::Debug for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charge({})", self.value)
    }
}

/// A fallible constructor producing `1, 2, 3, ...` until its failing call.
pub struct Factory {
    calls: usize,
    fail_on: Option<usize>,
}

impl Factory {
    /// Fail on the `call`-th invocation (1-based) and every one after it.
    pub fn fails_on(call: usize) -> Self {
        Self {
            calls: 0,
            fail_on: Some(call),
        }
    }

    pub fn never_fails() -> Self {
        Self {
            calls: 0,
            fail_on: None,
        }
    }

    pub fn make(&mut self) -> Result<i32, FactoryError> {
        self.calls += 1;
        match self.fail_on {
            Some(call) if self.calls >= call => Err(FactoryError { call: self.calls }),
            _ => Ok(self.calls as i32),
        }
    }

    /// Total invocations so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

/// The error returned by a failing [`Factory`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactoryError {
    pub call: usize,
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "factory refused call {}", self.call)
    }
}

impl Error for FactoryError {}
