/// Buffering policy of an event channel.
///
/// Senders always wait for room in a full channel; events are never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncChannelConfig {
    /// Channel capacity. `None` means unbounded.
    pub buffer_size: Option<usize>,
}

impl Default for AsyncChannelConfig {
    /// Bounded to 1000 events.
    fn default() -> Self {
        Self::bounded(1000)
    }
}

impl AsyncChannelConfig {
    pub fn unbounded() -> Self {
        Self { buffer_size: None }
    }

    pub fn bounded(size: usize) -> Self {
        Self {
            buffer_size: Some(size),
        }
    }
}
