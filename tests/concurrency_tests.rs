//! Concurrent tracing safety
//!
//! Multiple host threads issue nested call/return pairs against one
//! tracker; per-thread stacks must stay independent and the shared callee
//! cache and counters must come out exact.

mod utils;

use std::collections::HashSet;
use std::sync::Arc;

use firma::config::TrackerConfig;
use firma::tracker::SignatureTracker;
use utils::{drive_pair, RecordingProvider};

const THREADS: usize = 8;
const PAIRS_PER_THREAD: usize = 500;
const CALLEES_PER_THREAD: usize = 10;

#[test]
fn concurrent_threads_never_corrupt_the_callee_cache() {
    let provider = Arc::new(RecordingProvider::new());
    let tracker = Arc::new(
        SignatureTracker::start(
            TrackerConfig::new().with_sample_every(3),
            (Arc::clone(&provider) as Arc<dyn firma::provider::IntrospectionProvider>),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for i in 0..PAIRS_PER_THREAD {
                    let callee = format!("worker{}_method_{}", t, i % CALLEES_PER_THREAD);
                    drive_pair(&tracker, &callee, "app/workers/job.rb", "Job");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Final cache size is exactly the number of distinct callees used
    assert_eq!(tracker.distinct_callees(), THREADS * CALLEES_PER_THREAD);
    assert_eq!(tracker.unbalanced_returns(), 0);
    assert_eq!(
        tracker.monitor().total_calls(),
        (THREADS * PAIRS_PER_THREAD) as u64
    );

    // Every distinct callee appears in the output at least once
    let traced: HashSet<String> = provider.calls().into_iter().map(|c| c.callee).collect();
    assert_eq!(traced.len(), THREADS * CALLEES_PER_THREAD);
}

#[test]
fn concurrent_nested_pairs_keep_stacks_independent() {
    let provider = Arc::new(RecordingProvider::new());
    let tracker =
        Arc::new(SignatureTracker::start(TrackerConfig::new(), (Arc::clone(&provider) as Arc<dyn firma::provider::IntrospectionProvider>)).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                use firma::events::{CallEvent, ReturnEvent};

                let callee = format!("worker_{}", t);
                for _ in 0..PAIRS_PER_THREAD {
                    // Three-deep nesting per iteration
                    for depth in 0..3 {
                        tracker.handle_call(&CallEvent {
                            line: depth,
                            callee: &callee,
                            source_path: "app/workers/job.rb",
                            defining_scope: Some("Job"),
                            singleton_scope: false,
                        });
                    }
                    for _ in 0..3 {
                        tracker.handle_return(&ReturnEvent {
                            defining_scope: "Job",
                            return_type: "JobResult",
                        });
                    }
                    // The stack this thread sees is fully drained
                    assert_eq!(tracker.current_depth(), 0);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let expected = (THREADS * PAIRS_PER_THREAD * 3) as u64;
    assert_eq!(tracker.unbalanced_returns(), 0);
    assert_eq!(tracker.monitor().total_calls(), expected);
    assert_eq!(tracker.monitor().handled_calls(), expected);
    assert_eq!(provider.calls().len() as u64, expected);
    assert_eq!(provider.returns().len() as u64, expected);

    // Handles pair up one-to-one between calls and returns
    let call_handles: HashSet<u64> = provider.calls().into_iter().map(|c| c.handle).collect();
    let return_handles: HashSet<u64> = provider.returns().into_iter().map(|r| r.handle).collect();
    assert_eq!(call_handles, return_handles);
}
