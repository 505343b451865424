use std::collections::VecDeque;
use std::fmt;

use tracing::trace;

/// Handler verdict: whether the default action should still happen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    PreventDefault,
}

/// Result of dispatching one event to every handler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub seq: u64,
    pub default_prevented: bool,
}

/// An emitted event with its position in the emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub seq: u64,
    pub payload: E,
    pub default_prevented: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Handler<E> = Box<dyn FnMut(&E) -> Flow>;

/// Events kept by a recording bus before the oldest are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

/// Synchronous event dispatch.
///
/// Handlers run in registration order on the caller's thread. Every handler
/// sees the event even after an earlier one prevented the default action.
///
/// Recording is off by default. When enabled, the most recent
/// `log_capacity` events are kept until drained.
pub struct EventBus<E> {
    handlers: Vec<(HandlerId, Handler<E>)>,
    next_handler: u64,
    next_seq: u64,
    log: VecDeque<Event<E>>,
    record: bool,
    log_capacity: usize,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            next_handler: 0,
            next_seq: 0,
            log: VecDeque::new(),
            record: false,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .field("next_seq", &self.next_seq)
            .field("logged", &self.log.len())
            .finish()
    }
}

impl<E: fmt::Debug> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns the event log on or off; dispatch is unaffected.
    pub fn set_recording(&mut self, record: bool) {
        self.record = record;
        if !record {
            self.log.clear();
        }
    }

    pub fn is_recording(&self) -> bool {
        self.record
    }

    /// Caps the log; older events are evicted first.
    pub fn set_log_capacity(&mut self, capacity: usize) {
        self.log_capacity = capacity;
        while self.log.len() > capacity {
            self.log.pop_front();
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) -> Flow + 'static) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, payload: E) -> Dispatch {
        let seq = self.next_seq;
        self.next_seq += 1;

        let mut default_prevented = false;
        for (_, handler) in self.handlers.iter_mut() {
            if handler(&payload) == Flow::PreventDefault {
                default_prevented = true;
            }
        }
        trace!(seq, ?payload, default_prevented, "event emitted");

        if self.record && self.log_capacity > 0 {
            if self.log.len() == self.log_capacity {
                self.log.pop_front();
            }
            self.log.push_back(Event {
                seq,
                payload,
                default_prevented,
            });
        }
        Dispatch {
            seq,
            default_prevented,
        }
    }

    pub fn events(&self) -> &VecDeque<Event<E>> {
        &self.log
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        self.log.drain(..).collect()
    }
}
