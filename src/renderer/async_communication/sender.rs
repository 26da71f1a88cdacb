//! Sending half of an event channel, usable from a plain thread.

use super::configuration::AsyncChannelConfig;
use super::receiver::AsyncEventReceiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendEventError {
    #[error("event channel is closed")]
    ChannelClosed,
    #[error("event channel is full")]
    Full,
}

/// Creates a connected sender/receiver pair.
pub fn event_channel<EventType>(
    config: AsyncChannelConfig,
) -> (BufferedEventSender<EventType>, AsyncEventReceiver<EventType>) {
    let (sender, receiver) = match config.buffer_size {
        Some(size) if size > 0 => async_channel::bounded(size),
        _ => async_channel::unbounded(),
    };
    (BufferedEventSender { sender }, AsyncEventReceiver::new(receiver))
}

/// Event sender for a render thread.
#[derive(Debug, Clone)]
pub struct BufferedEventSender<EventType> {
    sender: async_channel::Sender<EventType>,
}

impl<EventType> BufferedEventSender<EventType> {
    /// Sends from a non-async thread, waiting for room when the channel is
    /// full. Must not be called from inside an async task when the channel
    /// is bounded.
    pub fn send_blocking(&self, event: EventType) -> Result<(), SendEventError> {
        self.sender
            .send_blocking(event)
            .map_err(|_| SendEventError::ChannelClosed)
    }

    /// Sends without waiting. A full channel hands the error back and the
    /// event is not delivered.
    pub fn try_send(&self, event: EventType) -> Result<(), SendEventError> {
        self.sender.try_send(event).map_err(|error| match error {
            async_channel::TrySendError::Full(_) => SendEventError::Full,
            async_channel::TrySendError::Closed(_) => SendEventError::ChannelClosed,
        })
    }
}
