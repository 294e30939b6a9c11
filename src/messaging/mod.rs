// Messaging module - notification plumbing out of the audio thread

pub mod channels;
pub mod notification;

pub use channels::{create_notification_channel, NotificationConsumer, NotificationProducer};
pub use notification::{Notification, NotificationCategory, NotificationLevel};
