//! Async communication between a render thread and its controller.
//!
//! Events flow over `async_channel`, so the render thread can send with
//! blocking calls while the controller awaits them on the tokio runtime.

pub mod configuration;
pub mod receiver;
pub mod sender;

pub use configuration::AsyncChannelConfig;
pub use receiver::AsyncEventReceiver;
pub use sender::{event_channel, BufferedEventSender, SendEventError};
