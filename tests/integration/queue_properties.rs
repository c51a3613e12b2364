// リングキューの性質に関する統合テスト
#[path = "../fixtures/mod.rs"]
mod fixtures;

use fixtures::*;
use record_ring::{QueuePhase, Record, RingQueue};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

const GUARD: Duration = Duration::from_secs(10);

#[tokio::test]
async fn test_fifo_with_stop_then_silence() {
    let queue = RingQueue::new(3).unwrap();
    let [a, b, c] = [record(1), record(2), record(3)];

    queue.enqueue(a.clone()).await;
    queue.enqueue(b.clone()).await;
    queue.enqueue(c.clone()).await;
    queue.stop();

    assert_eq!(queue.try_dequeue().await, Some(a));
    assert_eq!(queue.try_dequeue().await, Some(b));
    assert_eq!(queue.try_dequeue().await, Some(c));
    for _ in 0..10 {
        assert_eq!(queue.try_dequeue().await, None);
    }
    assert_eq!(queue.status().phase, QueuePhase::Drained);
}

#[tokio::test]
async fn test_poll_between_enqueues() {
    let queue = RingQueue::new(2).unwrap();

    queue.enqueue(record(1)).await;
    assert_eq!(queue.try_dequeue().await, Some(record(1)));
    assert_eq!(queue.try_dequeue().await, None);

    queue.enqueue(record(2)).await;
    assert_eq!(queue.try_dequeue().await, Some(record(2)));
    assert!(!queue.is_drained());
}

#[tokio::test]
async fn test_immediate_stop_on_unit_capacity() {
    let queue = RingQueue::<Record>::new(1).unwrap();
    queue.stop();

    assert_eq!(queue.try_dequeue().await, None);
    timeout(GUARD, queue.drained()).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_thousand_records_five_consumers_exactly_once() {
    let queue = Arc::new(RingQueue::new(1000).unwrap());
    let input = records(1000);

    for record in input.iter().cloned() {
        queue.enqueue(record).await;
    }
    queue.stop();

    let workers: Vec<_> = (0..5)
        .map(|_| {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                let mut taken = Vec::new();
                loop {
                    match queue.try_dequeue().await {
                        Some(record) => taken.push(record),
                        None if queue.is_drained() => break taken,
                        None => tokio::task::yield_now().await,
                    }
                }
            })
        })
        .collect();

    let mut union = Vec::new();
    for worker in workers {
        union.extend(timeout(GUARD, worker).await.unwrap().unwrap());
    }

    assert_eq!(union.len(), 1000);
    assert_eq!(as_set(union), as_set(input));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_capacity_never_exceeded_under_concurrent_load() {
    let capacity = 4;
    let queue = Arc::new(RingQueue::new(capacity).unwrap());
    let mut status_rx = queue.subscribe();

    let observer = tokio::spawn(async move {
        let mut peak = 0;
        while status_rx.changed().await.is_ok() {
            let status = *status_rx.borrow_and_update();
            peak = peak.max(status.buffered);
            if status.phase == QueuePhase::Drained {
                break;
            }
        }
        peak
    });

    let producer = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move {
            for record in records(300) {
                queue.enqueue(record).await;
            }
            queue.stop();
        })
    };

    let consumer = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move {
            let mut count = 0;
            loop {
                match queue.try_dequeue().await {
                    Some(_) => count += 1,
                    None if queue.is_drained() => break count,
                    None => sleep(Duration::from_micros(50)).await,
                }
            }
        })
    };

    timeout(GUARD, producer).await.unwrap().unwrap();
    assert_eq!(timeout(GUARD, consumer).await.unwrap().unwrap(), 300);
    assert!(timeout(GUARD, observer).await.unwrap().unwrap() <= capacity);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_global_fifo_across_consumers() {
    // 取り出し順に連番を振り、各ワーカーの取得列が入力順の部分列になることを確認
    let queue = Arc::new(RingQueue::<Record>::new(16).unwrap());

    let workers: Vec<_> = (0..3)
        .map(|_| {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                let mut taken = Vec::new();
                while let Some(record) = queue.dequeue().await {
                    taken.push(record.value().parse::<usize>().unwrap());
                }
                taken
            })
        })
        .collect();

    for record in records(500) {
        queue.enqueue(record).await;
    }
    queue.stop();

    let mut total = 0;
    for worker in workers {
        let taken = timeout(GUARD, worker).await.unwrap().unwrap();
        assert!(taken.windows(2).all(|pair| pair[0] < pair[1]));
        total += taken.len();
    }
    assert_eq!(total, 500);
}

#[tokio::test]
async fn test_enqueue_after_stop_is_dropped() {
    let queue = RingQueue::new(2).unwrap();
    queue.enqueue(record(1)).await;
    queue.stop();
    queue.stop();

    timeout(GUARD, queue.enqueue(record(2))).await.unwrap();

    assert_eq!(queue.try_dequeue().await, Some(record(1)));
    assert_eq!(queue.try_dequeue().await, None);
}
