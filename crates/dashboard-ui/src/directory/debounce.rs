//! Debounced triggering
//!
//! [`Debouncer`] is the timer-free core: every `schedule` supersedes the
//! previous one, and only the ticket of the latest schedule can fire.
//! [`DebouncedTrigger`] drives it with a `gloo_timers` timeout.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Identifies one scheduled value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Debouncer<T> {
    generation: u64,
    pending: Option<(u64, T)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending value with `value`
    pub fn schedule(&mut self, value: T) -> Ticket {
        self.generation += 1;
        self.pending = Some((self.generation, value));
        Ticket(self.generation)
    }

    /// Take the pending value if `ticket` is still the latest
    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        match self.pending.take() {
            Some((generation, value)) if generation == ticket.0 => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drop the pending value; outstanding tickets become stale
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Calls `on_fire` with the latest value once `delay_ms` pass without a new
/// trigger
pub struct DebouncedTrigger<T: 'static> {
    delay_ms: u32,
    state: Rc<RefCell<Debouncer<T>>>,
    timer: RefCell<Option<Timeout>>,
    on_fire: Rc<dyn Fn(T)>,
}

impl<T: 'static> DebouncedTrigger<T> {
    pub fn new(delay_ms: u32, on_fire: impl Fn(T) + 'static) -> Self {
        Self {
            delay_ms,
            state: Rc::new(RefCell::new(Debouncer::new())),
            timer: RefCell::new(None),
            on_fire: Rc::new(on_fire),
        }
    }

    pub fn trigger(&self, value: T) {
        let ticket = self.state.borrow_mut().schedule(value);

        // Dropping a Timeout clears it
        self.timer.borrow_mut().take();

        let state = Rc::clone(&self.state);
        let on_fire = Rc::clone(&self.on_fire);
        let timeout = Timeout::new(self.delay_ms, move || {
            let value = state.borrow_mut().fire(ticket);
            if let Some(value) = value {
                on_fire(value);
            }
        });
        *self.timer.borrow_mut() = Some(timeout);
    }

    pub fn cancel(&self) {
        self.state.borrow_mut().cancel();
        self.timer.borrow_mut().take();
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }
}
