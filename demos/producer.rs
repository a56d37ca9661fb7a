//! Minimal producer demo: allocate a slot, fill it, hand it to the queue.
//! Shows the intended call sequence — alloc, fill the payload, write.

use ringslab::{MessageQueue, QueueConfig};

fn main() {
    let mq = MessageQueue::new(QueueConfig::new(64, 256)).expect("queue init");

    for i in 0..10u32 {
        let slot = loop {
            if let Some(slot) = mq.alloc() {
                break slot;
            }
            std::thread::yield_now();
        };

        let payload = mq.payload_mut(slot);
        payload[0..4].copy_from_slice(&i.to_le_bytes());

        mq.write(slot);
        println!("wrote message {i}");
    }
}
