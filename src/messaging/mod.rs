// Messaging - Lock-free hand-off to the voice layer

pub mod channels;

pub use channels::{TriggerConsumer, TriggerProducer, TriggerSender, create_trigger_channel, drain};
