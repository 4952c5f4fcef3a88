//! # Step Interface Tests

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rstest::rstest;

use riscv_vp_core::common::PostError;
use riscv_vp_core::common::constants::NOP_INSTR;
use riscv_vp_core::core::events::{EventClass, EventFilter};

use crate::common::harness::TestContext;

fn counting_class(name: &str) -> (Arc<EventClass>, Arc<AtomicU64>) {
    let hits = Arc::new(AtomicU64::new(0));
    let seen = Arc::clone(&hits);
    let class = EventClass::new(name).with_callback(move |param| {
        let _ = seen.fetch_add(param, Ordering::SeqCst);
    });
    (Arc::new(class), hits)
}

#[test]
fn test_post_step_rejects_negative() {
    let mut tc = TestContext::new();
    let (class, _) = counting_class("s");
    assert_eq!(tc.cpu.post_step(&class, None, -3, 0), Err(PostError::NegativeTime));
    assert!(tc.cpu.step_events().is_empty());
}

#[test]
fn test_find_next_step_and_cancel() {
    let mut tc = TestContext::new();
    let (class, _) = counting_class("s");
    assert_eq!(tc.cpu.find_next_step(&EventFilter::class(&class)), -1);

    tc.cpu.post_step(&class, Some("riscv_cpu0"), 4, 0).unwrap();
    tc.cpu.post_step(&class, Some("other"), 2, 0).unwrap();
    assert_eq!(tc.cpu.find_next_step(&EventFilter::class(&class)), 2);

    let filter = EventFilter {
        obj: Some("other"),
        ..EventFilter::class(&class)
    };
    assert_eq!(tc.cpu.cancel_step(&filter), 1);
    assert_eq!(tc.cpu.find_next_step(&EventFilter::class(&class)), 4);
}

#[test]
fn test_cancel_with_predicate() {
    let mut tc = TestContext::new();
    let (class, _) = counting_class("s");
    for param in 0..4 {
        tc.cpu.post_step(&class, None, 10, param).unwrap();
    }
    let odd = |p: u64| p % 2 == 1;
    let filter = EventFilter {
        pred: Some(&odd),
        ..EventFilter::default()
    };
    assert_eq!(tc.cpu.cancel_step(&filter), 2);
    assert_eq!(tc.cpu.step_events().len(), 2);
}

#[test]
fn test_step_events_fire_while_running() {
    let mut tc = TestContext::new().load_program(0, &[NOP_INSTR; 3]);
    let (class, hits) = counting_class("s");
    tc.cpu.post_step(&class, None, 2, 7).unwrap();

    tc.cpu.run();
    tc.step_n(1);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    tc.step_n(1);
    assert_eq!(hits.load(Ordering::SeqCst), 7);
    assert_eq!(tc.cpu.find_next_step(&EventFilter::default()), -1);
}

#[test]
fn test_advance_consumes_steps_without_executing() {
    let mut tc = TestContext::new();
    let (class, hits) = counting_class("s");
    tc.cpu.post_step(&class, None, 3, 1).unwrap();
    tc.cpu.post_step(&class, None, 10, 1).unwrap();

    tc.cpu.run();
    assert_eq!(tc.cpu.advance(5), 5);
    assert_eq!(tc.cpu.get_step_count(), 5);
    assert_eq!(tc.cpu.get_cycle_count(), 0);
    assert_eq!(tc.cpu.pc, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(tc.cpu.find_next_step(&EventFilter::default()), 5);
}

#[rstest]
#[case(u64::MAX)]
#[case(u64::MAX - 2)]
#[case(1 << 32)]
fn test_advance_after_step_saturates(#[case] steps: u64) {
    let mut tc = TestContext::new().load_program(0, &[NOP_INSTR]);
    let (class, hits) = counting_class("s");
    tc.cpu.post_step(&class, None, 2, 1).unwrap();

    tc.cpu.run();
    tc.step_n(1);
    assert_eq!(tc.cpu.advance(steps), steps);
    assert_eq!(tc.cpu.get_step_count(), steps.saturating_add(1));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_advance_while_stopped_keeps_events() {
    let mut tc = TestContext::new();
    let (class, hits) = counting_class("s");
    tc.cpu.post_step(&class, None, 1, 1).unwrap();
    let _ = tc.cpu.advance(2);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(tc.cpu.step_events()[0].delta, 0);
}
