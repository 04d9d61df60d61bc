use std::cell::RefCell;
use std::rc::Rc;

use ai_tools::{TraceEvent, TraceLog, TraceSink, Tracer};

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn emit_writes_to_trace_log_when_present() {
    let mut tracer = Tracer::new().with_log();

    tracer.emit(TraceEvent::new(1, "test").with_a(10).with_b(20));

    let log = tracer.log().unwrap();
    assert_eq!(log.events.len(), 1);
    assert_eq!(log.events[0].tick, 1);
    assert_eq!(log.events[0].tag, "test");
    assert_eq!(log.events[0].a, 10);
    assert_eq!(log.events[0].b, 20);
}

#[test]
fn emit_writes_to_sink_when_present() {
    let handle = RcSink::default();
    let shared = handle.0.clone();
    let mut tracer = Tracer::new().with_sink(Box::new(handle));

    tracer.emit(TraceEvent::new(2, "sink_event"));

    assert!(tracer.log().is_none());
    let events = shared.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tick, 2);
    assert_eq!(events[0].tag, "sink_event");
}

#[test]
fn emit_writes_to_both_log_and_sink_when_both_present() {
    let handle = RcSink::default();
    let shared = handle.0.clone();
    let mut tracer = Tracer::new().with_log().with_sink(Box::new(handle));

    tracer.emit(TraceEvent::new(3, "both"));

    assert_eq!(tracer.log().unwrap().tags(), vec!["both"]);
    assert_eq!(shared.borrow().len(), 1);
}

#[test]
fn disabled_tracer_drops_events() {
    let mut tracer = Tracer::new();
    assert!(!tracer.is_enabled());
    tracer.emit(TraceEvent::new(4, "dropped"));
    assert!(tracer.log().is_none());
    assert!(tracer.take_log().is_none());
}

#[test]
fn take_log_drains_recorded_events() {
    let mut tracer = Tracer::new().with_log();
    tracer.emit(TraceEvent::new(1, "goap.plan.call"));
    tracer.emit(TraceEvent::new(1, "goap.plan.call"));

    let taken = tracer.take_log().unwrap();
    assert_eq!(taken.count("goap.plan.call"), 2);
    assert!(tracer.log().unwrap().events.is_empty());
}

#[test]
fn bounded_log_keeps_most_recent_events() {
    let mut tracer = Tracer::new().with_bounded_log(3);
    for tick in 0..5 {
        tracer.emit(TraceEvent::new(tick, "goap.plan.call"));
    }

    let log = tracer.log().unwrap();
    assert_eq!(log.events.len(), 3);
    assert_eq!(log.events[0].tick, 2);
    assert_eq!(log.events[2].tick, 4);
    assert_eq!(log.dropped, 2);

    let taken = tracer.take_log().unwrap();
    assert_eq!(taken.events.len(), 3);
    assert_eq!(tracer.log().unwrap().capacity(), Some(3));
    assert_eq!(tracer.log().unwrap().dropped, 0);
}

#[test]
fn zero_capacity_log_records_nothing() {
    let mut log = TraceLog::with_capacity(0);
    log.push(TraceEvent::new(0, "goap.plan.call"));
    assert!(log.events.is_empty());
    assert_eq!(log.dropped, 1);
}
