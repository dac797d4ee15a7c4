// Lock-free channels between the capture callback, logic and UI surface

pub mod channels;
pub mod notification;

pub use channels::{
    ChunkConsumer, ChunkProducer, NotificationConsumer, NotificationProducer,
    create_chunk_channel, create_notification_channel,
};
pub use notification::{Notification, NotificationCategory, NotificationLevel};
