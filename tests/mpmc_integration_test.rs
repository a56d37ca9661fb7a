use ringslab::{MessageQueue, QueueConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn round_trip_write_then_tryread() {
    let mq = MessageQueue::new(QueueConfig::new(8, 4)).unwrap();
    let slot = mq.alloc().unwrap();
    mq.payload_mut(slot)[0..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    mq.write(slot);
    let received = mq.try_read().expect("message should be available");
    assert_eq!(&mq.payload(received)[0..4], &[0xDE, 0xAD, 0xBE, 0xEF]);

    mq.free(received);
}

/// 4 producers x 10,000 messages, 2 consumers: total delivered must equal
/// 40,000 and each producer's ids must be observed strictly increasing.
#[test]
fn multi_producer_multi_consumer_stress() {
    const PRODUCERS: u32 = 4;
    const PER_PRODUCER: u32 = 10_000;
    const TOTAL: u64 = (PRODUCERS * PER_PRODUCER) as u64;

    let mq = Arc::new(MessageQueue::new(QueueConfig::new(16, 64)).unwrap());

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer_id| {
            let mq = mq.clone();
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    let slot = loop {
                        if let Some(slot) = mq.alloc() {
                            break slot;
                        }
                        thread::yield_now();
                    };
                    let payload = mq.payload_mut(slot);
                    payload[0..4].copy_from_slice(&producer_id.to_le_bytes());
                    payload[4..8].copy_from_slice(&seq.to_le_bytes());
                    mq.write(slot);
                }
            })
        })
        .collect();

    let received = Arc::new(AtomicU64::new(0));
    let last_seen: Arc<Mutex<HashMap<u32, u32>>> = Arc::new(Mutex::new(HashMap::new()));

    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let mq = mq.clone();
            let received = received.clone();
            let last_seen = last_seen.clone();
            thread::spawn(move || loop {
                if let Some(slot) = mq.try_read() {
                    let payload = mq.payload(slot);
                    let producer_id = u32::from_le_bytes(payload[0..4].try_into().unwrap());
                    let seq = u32::from_le_bytes(payload[4..8].try_into().unwrap());

                    let mut last_seen = last_seen.lock().unwrap();
                    if let Some(&prev) = last_seen.get(&producer_id) {
                        assert!(seq > prev, "per-producer FIFO violated: {seq} after {prev}");
                    }
                    last_seen.insert(producer_id, seq);
                    drop(last_seen);

                    mq.free(slot);
                    received.fetch_add(1, Ordering::SeqCst);
                } else if received.load(Ordering::SeqCst) >= TOTAL {
                    break;
                } else {
                    thread::yield_now();
                }
            })
        })
        .collect();

    for h in producers {
        h.join().unwrap();
    }
    for h in consumers {
        h.join().unwrap();
    }

    assert_eq!(received.load(Ordering::SeqCst), TOTAL);
    assert_eq!(last_seen.lock().unwrap().len(), PRODUCERS as usize);
    for &seq in last_seen.lock().unwrap().values() {
        assert_eq!(seq, PER_PRODUCER - 1);
    }
}

/// A blocked reader wakes within a short bound after the next write.
#[test]
fn blocked_reader_wakes_on_write() {
    let mq = Arc::new(MessageQueue::new(QueueConfig::new(8, 8)).unwrap());
    let reader = {
        let mq = mq.clone();
        thread::spawn(move || mq.read())
    };

    thread::sleep(Duration::from_millis(50));
    let slot = mq.alloc().unwrap();
    mq.payload_mut(slot)[0] = 42;
    mq.write(slot);

    let start = Instant::now();
    let received = reader.join().unwrap();
    assert!(start.elapsed() < Duration::from_secs(1), "read did not wake promptly");
    assert_eq!(mq.payload(received)[0], 42);
}

/// Every successful write eventually becomes observable as a read result,
/// in the absence of destroy.
#[test]
fn no_loss_across_many_writes() {
    let mq = MessageQueue::new(QueueConfig::new(4, 16)).unwrap();
    let mut written = Vec::new();
    for i in 0..16u8 {
        let slot = mq.alloc().unwrap();
        mq.payload_mut(slot)[0] = i;
        written.push(i);
        mq.write(slot);
    }

    let mut observed = Vec::new();
    while let Some(slot) = mq.try_read() {
        observed.push(mq.payload(slot)[0]);
        mq.free(slot);
    }
    assert_eq!(observed, written);
}
