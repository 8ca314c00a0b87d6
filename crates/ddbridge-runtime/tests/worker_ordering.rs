//! Ordering guarantees of the worker queue
//!
//! A single global FIFO means the order of calls from one producer is the
//! order processors observe, even across feature domains.

mod common;

use common::{create_scripted_worker, custom, new_deliveries, snapshot, RecordingPlatform};
use proptest::prelude::*;
use std::thread;

// ----------------------------------------------------------------------------
// Cross-target ordering
// ----------------------------------------------------------------------------

#[test]
fn test_order_preserved_across_targets() {
    let deliveries = new_deliveries();
    let mut worker = create_scripted_worker(RecordingPlatform::new(), &["a", "b"], &deliveries);
    worker.start().unwrap();

    let handle = worker.handle();
    handle.enqueue(custom("a", "x"));
    handle.enqueue(custom("b", "y"));
    handle.enqueue(custom("a", "z"));

    worker.stop().unwrap();
    assert_eq!(snapshot(&deliveries), vec!["a/x", "b/y", "a/z"]);
}

#[test]
fn test_messages_buffered_before_start_keep_order() {
    let deliveries = new_deliveries();
    let mut worker = create_scripted_worker(RecordingPlatform::new(), &["a", "b"], &deliveries);

    let handle = worker.handle();
    for i in 0..10 {
        let target = if i % 2 == 0 { "a" } else { "b" };
        handle.enqueue(custom(target, i.to_string()));
    }
    assert!(snapshot(&deliveries).is_empty());
    assert_eq!(handle.stats().depth, 10);

    worker.start().unwrap();
    handle.enqueue(custom("a", "after-start"));
    worker.stop().unwrap();

    let expected: Vec<String> = (0..10)
        .map(|i| format!("{}/{}", if i % 2 == 0 { "a" } else { "b" }, i))
        .chain(std::iter::once("a/after-start".to_string()))
        .collect();
    assert_eq!(snapshot(&deliveries), expected);
}

// ----------------------------------------------------------------------------
// Multiple producers
// ----------------------------------------------------------------------------

#[test]
fn test_per_producer_order_with_concurrent_producers() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 250;

    let deliveries = new_deliveries();
    let mut worker = create_scripted_worker(RecordingPlatform::new(), &["p"], &deliveries);
    worker.start().unwrap();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let handle = worker.handle();
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    assert!(handle.enqueue(custom("p", format!("{}:{}", producer, seq))));
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    worker.stop().unwrap();

    let delivered = snapshot(&deliveries);
    assert_eq!(delivered.len(), PRODUCERS * PER_PRODUCER);

    let mut next_expected = [0usize; PRODUCERS];
    for entry in delivered {
        let (producer, seq) = entry
            .trim_start_matches("p/")
            .split_once(':')
            .map(|(p, s)| (p.parse::<usize>().unwrap(), s.parse::<usize>().unwrap()))
            .unwrap();
        assert_eq!(seq, next_expected[producer], "producer {} out of order", producer);
        next_expected[producer] += 1;
    }
    assert_eq!(worker.stats().dispatched, (PRODUCERS * PER_PRODUCER) as u64);
}

// ----------------------------------------------------------------------------
// Property: delivery order equals enqueue order
// ----------------------------------------------------------------------------

fn target_name(index: u8) -> &'static str {
    match index % 3 {
        0 => "sdk-like",
        1 => "logs-like",
        _ => "rum-like",
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_delivery_order_matches_enqueue_order(
        sequence in prop::collection::vec((0u8..3, 0u16..1000), 0..60),
        start_first in any::<bool>(),
    ) {
        let deliveries = new_deliveries();
        let mut worker = create_scripted_worker(
            RecordingPlatform::new(),
            &["sdk-like", "logs-like", "rum-like"],
            &deliveries,
        );
        if start_first {
            worker.start().unwrap();
        }

        let handle = worker.handle();
        let mut expected = Vec::with_capacity(sequence.len());
        for (index, (target, value)) in sequence.iter().enumerate() {
            let name = format!("{}-{}", index, value);
            expected.push(format!("{}/{}", target_name(*target), name));
            handle.enqueue(custom(target_name(*target), name));
        }

        worker.start().unwrap();
        worker.stop().unwrap();

        prop_assert_eq!(snapshot(&deliveries), expected);
    }
}
