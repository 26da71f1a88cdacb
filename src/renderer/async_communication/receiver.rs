//! Asynchronous event receiver.

/// Receiving half of an event channel.
///
/// Cloning shares the underlying channel: each event is delivered to
/// exactly one of the clones.
///
/// # Examples
///
/// ```rust
/// use speculum::renderer::AsyncEventReceiver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (sender, receiver) = async_channel::unbounded::<u64>();
/// let events = AsyncEventReceiver::new(receiver);
///
/// sender.send(7).await?;
/// assert_eq!(events.recv().await?, 7);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AsyncEventReceiver<EventType> {
    receiver: async_channel::Receiver<EventType>,
}

impl<EventType> AsyncEventReceiver<EventType> {
    pub fn new(receiver: async_channel::Receiver<EventType>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    ///
    /// # Returns
    ///
    /// * `Ok(EventType)` - The received event
    /// * `Err(async_channel::RecvError)` - The channel is closed and empty
    pub async fn recv(&self) -> Result<EventType, async_channel::RecvError> {
        self.receiver.recv().await
    }
}
