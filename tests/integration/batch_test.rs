//! Batch runner under real async latency.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use noesis::process_in_batches;

#[tokio::test]
async fn test_in_flight_work_never_exceeds_batch_size() {
    let in_flight = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    let result: Result<Vec<usize>, &str> = process_in_batches(
        (0..7).collect::<Vec<usize>>(),
        2,
        |_, _| {},
        |n, _| {
            let in_flight = &in_flight;
            let peak = &peak;
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(n * 10)
            }
        },
    )
    .await;

    assert_eq!(result.unwrap(), vec![0, 10, 20, 30, 40, 50, 60]);
    assert!(peak.load(Ordering::SeqCst) <= 2);
}
