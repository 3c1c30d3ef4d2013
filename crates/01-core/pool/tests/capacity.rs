use parking_lot::Mutex;
use pool::{Pooled, Recycle, SlotPool};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[derive(Default)]
struct Line {
    text: String,
}

impl Recycle for Line {
    fn reset(&mut self) {
        self.text.clear();
    }
}

/// The request after the last free slot is claimed answers `None`.
#[test]
fn exhaustion_returns_none() {
    let pool = SlotPool::<Line>::new("line", 3).unwrap();
    let held: Vec<_> = (0..3)
        .map(|i| pool.request(|l| l.text = i.to_string()).unwrap())
        .collect();
    assert!(pool.request(|_| {}).is_none());
    assert_eq!(pool.available(), 0);
    drop(held);
    assert_eq!(pool.available(), 3);
}

/// Releasing a handle makes exactly that slot claimable again.
#[test]
fn release_reuses_freed_slot() {
    let pool = SlotPool::<Line>::new("line", 3).unwrap();
    let a = pool.request(|l| l.text.push('a')).unwrap();
    let b = pool.request(|l| l.text.push('b')).unwrap();
    let c = pool.request(|l| l.text.push('c')).unwrap();
    let freed = b.slot_index();
    drop(b);

    let d = pool.request(|l| l.text.push('d')).unwrap();
    assert_eq!(d.slot_index(), freed);
    assert_eq!(d.text, "d");
    assert_eq!(a.text, "a");
    assert_eq!(c.text, "c");
}

/// Concurrent claimers never share a slot and never exceed capacity.
#[test]
fn concurrent_requests_claim_distinct_slots() {
    const CAPACITY: usize = 8;
    let pool = SlotPool::<Line>::new("line", CAPACITY).unwrap();
    let claimed = Arc::new(Mutex::new(Vec::new()));

    let workers: Vec<_> = (0..16)
        .map(|worker| {
            let pool = pool.clone();
            let claimed = Arc::clone(&claimed);
            thread::spawn(move || {
                if let Some(handle) = pool.request(|l| l.text = worker.to_string()) {
                    claimed.lock().push(handle);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    let claimed = claimed.lock();
    assert_eq!(claimed.len(), CAPACITY);
    let indices: HashSet<_> = claimed.iter().map(|h| h.slot_index()).collect();
    assert_eq!(indices.len(), CAPACITY);
}

/// Handles may be released on a different thread than the claimer.
#[test]
fn release_from_other_thread() {
    let pool = SlotPool::<Line>::new("line", 1).unwrap();
    let handle = pool.request(|l| l.text.push_str("moved")).unwrap();
    thread::spawn(move || assert_eq!(handle.text, "moved"))
        .join()
        .expect("consumer panicked");
    let again = pool.request(|_| {}).unwrap();
    assert!(again.text.is_empty());
}

#[derive(Clone, Debug)]
enum Step {
    Request,
    Release(usize),
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        prop_oneof![Just(Step::Request), (0usize..8).prop_map(Step::Release)],
        1..64,
    )
}

proptest! {
    /// Any request/release sequence: the (M+1)-th concurrent claim fails and the
    /// lowest freed slot is reused, always reset.
    #[test]
    fn request_release_sequences(capacity in 1usize..6, seq in steps()) {
        let pool = SlotPool::<Line>::new("line", capacity).unwrap();
        let mut held: Vec<Pooled<Line>> = Vec::new();
        for step in seq {
            match step {
                Step::Request => {
                    let free = (0..capacity).find(|i| held.iter().all(|h| h.slot_index() != *i));
                    let claimed = pool.request(|l| {
                        assert!(l.text.is_empty(), "slot handed out unreset");
                        l.text.push('x');
                    });
                    prop_assert_eq!(claimed.as_ref().map(|h| h.slot_index()), free);
                    held.extend(claimed);
                }
                Step::Release(n) if !held.is_empty() => {
                    drop(held.swap_remove(n % held.len()));
                }
                Step::Release(_) => {}
            }
            prop_assert_eq!(pool.available(), capacity - held.len());
        }
    }
}
