// Communication channels lock-free
// Trigger events flow from the clock thread to the voice layer

use crate::sequencer::TriggerEvent;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::HeapRb;

pub type TriggerProducer = ringbuf::HeapProd<TriggerEvent>;
pub type TriggerConsumer = ringbuf::HeapCons<TriggerEvent>;

pub fn create_trigger_channel(capacity: usize) -> (TriggerSender, TriggerConsumer) {
    let rb = HeapRb::<TriggerEvent>::new(capacity.max(1));
    let (producer, consumer) = rb.split();
    (TriggerSender::new(producer), consumer)
}

/// Producer side that never blocks: a full channel drops the event
pub struct TriggerSender {
    producer: TriggerProducer,
    dropped: u64,
}

impl TriggerSender {
    pub fn new(producer: TriggerProducer) -> Self {
        Self { producer, dropped: 0 }
    }

    /// Push one event; returns false (and counts it) when the channel is full
    pub fn send(&mut self, event: TriggerEvent) -> bool {
        if self.producer.try_push(event).is_err() {
            self.dropped += 1;
            if self.dropped == 1 || self.dropped % 1024 == 0 {
                log::warn!("Trigger channel full: {} events dropped", self.dropped);
            }
            return false;
        }
        true
    }

    /// Push a batch; returns how many were accepted
    pub fn send_all<I: IntoIterator<Item = TriggerEvent>>(&mut self, events: I) -> usize {
        let mut accepted = 0;
        for event in events {
            if self.send(event) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Total events dropped since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Free slots left in the channel
    pub fn vacant(&self) -> usize {
        self.producer.vacant_len()
    }
}

impl std::fmt::Debug for TriggerSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerSender")
            .field("vacant", &self.producer.vacant_len())
            .field("dropped", &self.dropped)
            .finish()
    }
}

/// Drain everything currently queued
pub fn drain(consumer: &mut TriggerConsumer) -> Vec<TriggerEvent> {
    let mut events = Vec::with_capacity(consumer.occupied_len());
    while let Some(event) = consumer.try_pop() {
        events.push(event);
    }
    events
}
