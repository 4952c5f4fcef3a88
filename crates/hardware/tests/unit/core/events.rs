//! # Event Queue Tests
//!
//! Ordering, firing, lookup, removal, and rescaling of queued events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use riscv_vp_core::core::events::{EventClass, EventFilter, EventFlags, EventQueue};

fn class(name: &str) -> Arc<EventClass> {
    Arc::new(EventClass::new(name))
}

#[test]
fn test_empty_queue() {
    let q = EventQueue::new("q");
    assert_eq!(q.name(), "q");
    assert!(q.is_empty());
    assert_eq!(q.delta(), None);
    assert!(q.events().is_empty());
}

#[test]
fn test_orders_by_delta_then_slot() {
    let c = class("tick");
    let mut q = EventQueue::new("q");
    q.post(10, 0, Arc::clone(&c), None, 1);
    q.post(5, 1, Arc::clone(&c), None, 2);
    q.post(5, 0, Arc::clone(&c), None, 3);
    q.post(5, 0, Arc::clone(&c), None, 4);

    let params: Vec<u64> = std::iter::from_fn(|| q.handle_next().map(|e| e.param)).collect();
    assert_eq!(params, vec![3, 4, 2, 1]);
}

#[test]
fn test_decrement_saturates_and_reports_absolute_deltas() {
    let c = class("tick");
    let mut q = EventQueue::new("q");
    q.post(3, 0, Arc::clone(&c), None, 0);
    q.post(7, 0, Arc::clone(&c), None, 0);
    q.decrement(5);

    let deltas: Vec<u64> = q.events().iter().map(|e| e.delta).collect();
    assert_eq!(deltas, vec![0, 2]);
    assert_eq!(q.delta(), Some(0));
}

#[test]
fn test_handle_next_runs_callback_with_param() {
    let seen = Arc::new(AtomicU64::new(0));
    let sink = Arc::clone(&seen);
    let c = Arc::new(EventClass::new("cb").with_callback(move |p| sink.store(p, Ordering::SeqCst)));
    let mut q = EventQueue::new("q");
    q.post(0, 0, c, Some("cpu".into()), 42);

    let e = q.handle_next().unwrap();
    assert_eq!(e.obj.as_deref(), Some("cpu"));
    assert_eq!(seen.load(Ordering::SeqCst), 42);
    assert!(q.handle_next().is_none());
}

#[test]
fn test_next_and_remove_filter_by_class_and_predicate() {
    let a = class("a");
    let b = class("b");
    let mut q = EventQueue::new("q");
    q.post(1, 0, Arc::clone(&b), None, 0);
    q.post(4, 0, Arc::clone(&a), None, 1);
    q.post(9, 0, Arc::clone(&a), None, 2);

    assert_eq!(q.next(&EventFilter::class(&a)), Some(4));
    assert_eq!(q.next(&EventFilter::default()), Some(1));

    let is_two = |p: u64| p == 2;
    let filter = EventFilter {
        class: Some(&a),
        pred: Some(&is_two),
        ..EventFilter::default()
    };
    assert_eq!(q.next(&filter), Some(9));
    assert_eq!(q.remove(&filter), 1);
    assert_eq!(q.len(), 2);
    assert_eq!(q.remove(&EventFilter::class(&a)), 1);
    assert_eq!(q.next(&EventFilter::class(&a)), None);
}

#[test]
fn test_same_name_classes_are_distinct() {
    let a1 = class("same");
    let a2 = class("same");
    let mut q = EventQueue::new("q");
    q.post(1, 0, Arc::clone(&a1), None, 0);
    assert_eq!(q.next(&EventFilter::class(&a2)), None);
}

#[test]
fn test_filter_by_object() {
    let c = class("c");
    let mut q = EventQueue::new("q");
    q.post(1, 0, Arc::clone(&c), Some("x".into()), 0);
    q.post(2, 0, Arc::clone(&c), Some("y".into()), 0);
    let filter = EventFilter {
        obj: Some("y"),
        ..EventFilter::default()
    };
    assert_eq!(q.next(&filter), Some(2));
}

#[test]
fn test_rescale_time_keeps_order() {
    let c = class("c");
    let mut q = EventQueue::new("q");
    q.post(100, 0, Arc::clone(&c), None, 0);
    q.post(300, 0, Arc::clone(&c), None, 1);
    q.rescale_time(100, 200);

    let deltas: Vec<u64> = q.events().iter().map(|e| e.delta).collect();
    assert_eq!(deltas, vec![50, 150]);
}

#[test]
fn test_events_use_describer() {
    let c = Arc::new(EventClass::new("timer").with_describe(|p| format!("param={p}")));
    let mut q = EventQueue::new("q");
    q.post(3, 0, c, Some("cpu0".into()), 7);

    let info = &q.events()[0];
    assert_eq!(info.class, "timer");
    assert_eq!(info.object.as_deref(), Some("cpu0"));
    assert_eq!(info.description, "param=7");
}

#[test]
fn test_clear() {
    let fired = Arc::new(Mutex::new(0));
    let f = Arc::clone(&fired);
    let c = Arc::new(EventClass::new("c").with_callback(move |_| *f.lock().unwrap() += 1));
    let mut q = EventQueue::new("q");
    q.post(0, 0, c, None, 0);
    q.clear();
    assert!(q.is_empty());
    assert_eq!(*fired.lock().unwrap(), 0);
}

#[test]
fn test_machine_sync_flag() {
    let c = EventClass::new("sync").with_flags(EventFlags::MACHINE_SYNC);
    assert!(c.is_machine_sync());
    assert!(!EventClass::new("plain").is_machine_sync());
}
