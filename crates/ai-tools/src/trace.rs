#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

/// A small, allocation-friendly trace event.
///
/// Plain data so it can be recorded during simulation and compared across replays. `a`/`b`
/// carry tag-specific payloads (action index, goal index, plan length, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    pub a: u64,
    pub b: u64,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            a: 0,
            b: 0,
        }
    }

    pub fn with_a(mut self, a: u64) -> Self {
        self.a = a;
        self
    }

    pub fn with_b(mut self, b: u64) -> Self {
        self.b = b;
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// In-memory event log.
///
/// Unbounded by default, which suits finite runs. Long-lived agents should use
/// [`TraceLog::with_capacity`]: once full, the oldest events are evicted and counted in
/// `dropped`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: VecDeque<TraceEvent>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dropped: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    capacity: Option<usize>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` of the most recent events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            dropped: 0,
            capacity: Some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn push(&mut self, event: TraceEvent) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                self.dropped += 1;
                return;
            }
            while self.events.len() >= capacity {
                self.events.pop_front();
                self.dropped += 1;
            }
        }
        self.events.push_back(event);
    }

    /// Tags in recording order; handy for assertions.
    pub fn tags(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.tag.as_ref()).collect()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.events.iter().filter(|e| e.tag == tag).count()
    }

    /// Move the recorded events out, keeping the capacity.
    fn drain(&mut self) -> TraceLog {
        TraceLog {
            events: std::mem::take(&mut self.events),
            dropped: std::mem::take(&mut self.dropped),
            capacity: self.capacity,
        }
    }
}

/// Per-agent trace output: an optional in-memory log and an optional streaming sink.
///
/// With neither installed, `emit` is a no-op.
#[derive(Default)]
pub struct Tracer {
    log: Option<TraceLog>,
    sink: Option<Box<dyn TraceSink>>,
}

impl Tracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self) -> Self {
        self.log = Some(TraceLog::new());
        self
    }

    /// Record into a log that keeps only the `capacity` most recent events.
    pub fn with_bounded_log(mut self, capacity: usize) -> Self {
        self.log = Some(TraceLog::with_capacity(capacity));
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.log.is_some() || self.sink.is_some()
    }

    pub fn emit(&mut self, event: TraceEvent) {
        if let Some(log) = self.log.as_mut() {
            log.push(event.clone());
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(event);
        }
    }

    pub fn log(&self) -> Option<&TraceLog> {
        self.log.as_ref()
    }

    /// Take the recorded events, leaving an empty log with the same capacity in place.
    pub fn take_log(&mut self) -> Option<TraceLog> {
        self.log.as_mut().map(TraceLog::drain)
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("log", &self.log.as_ref().map(|l| l.events.len()))
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
