//! Demo of the blocking `read` path: a consumer thread blocks until a
//! producer thread writes, exercising the wake-up coordination between
//! them.

use ringslab::{MessageQueue, QueueConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    let mq = Arc::new(MessageQueue::new(QueueConfig::new(64, 256)).expect("queue init"));

    let reader = {
        let mq = mq.clone();
        thread::spawn(move || {
            println!("consumer blocking on read()");
            let slot = mq.read();
            let id = u32::from_le_bytes(mq.payload(slot)[0..4].try_into().unwrap());
            println!("consumer woke with message {id}");
            mq.free(slot);
        })
    };

    thread::sleep(Duration::from_millis(200));
    let slot = mq.alloc().expect("fresh queue has free slots");
    mq.payload_mut(slot)[0..4].copy_from_slice(&42u32.to_le_bytes());
    mq.write(slot);
    println!("producer wrote message 42");

    reader.join().unwrap();
}
