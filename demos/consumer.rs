//! Minimal consumer demo: drain the queue non-blockingly and free slots.

use ringslab::{MessageQueue, QueueConfig};

fn main() {
    let mq = MessageQueue::new(QueueConfig::new(64, 256)).expect("queue init");

    // In a real pipeline the producer and consumer would share one
    // `MessageQueue` across threads; this demo just shows the read/free
    // call sequence against a freshly-initialized (and therefore empty)
    // queue.
    match mq.try_read() {
        Some(slot) => {
            let id = u32::from_le_bytes(mq.payload(slot)[0..4].try_into().unwrap());
            println!("read message {id}");
            mq.free(slot);
        }
        None => println!("queue empty"),
    }
}
