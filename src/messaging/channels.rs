// SPSC channels: audio chunks capture -> logic, notifications -> UI

use ringbuf::{HeapRb, traits::Split};

use crate::audio::AudioChunk;
use crate::messaging::notification::Notification;

pub type ChunkProducer = ringbuf::HeapProd<AudioChunk>;
pub type ChunkConsumer = ringbuf::HeapCons<AudioChunk>;

/// Channel carrying fixed-size capture chunks to the logic thread.
pub fn create_chunk_channel(capacity: usize) -> (ChunkProducer, ChunkConsumer) {
    let rb = HeapRb::<AudioChunk>::new(capacity);
    rb.split()
}

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

/// Channel carrying notifications from background threads to the UI.
pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}
