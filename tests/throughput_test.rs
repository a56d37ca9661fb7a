//! SPSC throughput guard. Not run by default — gated behind `--ignored`
//! since its pass/fail depends on the host machine.

use ringslab::{MessageQueue, QueueConfig};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

#[test]
#[ignore = "perf regression guard, not a correctness test — run with --ignored"]
fn spsc_sustains_one_million_messages_per_second() {
    const COUNT: u32 = 2_000_000;
    let mq = Arc::new(MessageQueue::new(QueueConfig::new(16, 4096)).unwrap());

    let start = Instant::now();

    let producer = {
        let mq = mq.clone();
        thread::spawn(move || {
            for i in 0..COUNT {
                let slot = loop {
                    if let Some(slot) = mq.alloc() {
                        break slot;
                    }
                    std::hint::spin_loop();
                };
                mq.payload_mut(slot)[0..4].copy_from_slice(&i.to_le_bytes());
                mq.write(slot);
            }
        })
    };

    let consumer = {
        let mq = mq.clone();
        thread::spawn(move || {
            for _ in 0..COUNT {
                let slot = loop {
                    if let Some(slot) = mq.try_read() {
                        break slot;
                    }
                    std::hint::spin_loop();
                };
                mq.free(slot);
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();

    let elapsed = start.elapsed();
    let rate = COUNT as f64 / elapsed.as_secs_f64();
    println!("throughput: {:.2} million msg/s", rate / 1_000_000.0);
    assert!(rate >= 1_000_000.0, "throughput {rate:.0} msg/s below 10^6 msg/s guard");
}
