use foundation::Generation;

/// Traceable record of a page state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub generation: Generation,
    pub kind: &'static str,
    pub message: String,
}

pub mod kind {
    pub const SUBMITTED: &str = "submitted";
    pub const COMPLETED: &str = "completed";
    pub const ERRORED: &str = "errored";
    pub const STALE: &str = "stale";
    pub const DROPPED: &str = "dropped";
    pub const SELECTED: &str = "selected";
    pub const PANEL: &str = "panel";
}

/// Events kept when nobody drains the bus.
pub const DEFAULT_CAPACITY: usize = 256;

/// Bounded log of [`Event`]s. Once full, the oldest event is evicted.
#[derive(Debug)]
pub struct EventBus {
    events: Vec<Event>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn emit(&mut self, generation: Generation, kind: &'static str, message: impl Into<String>) {
        if self.events.len() == self.capacity {
            self.events.remove(0);
        }
        self.events.push(Event {
            generation,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind).collect()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
