mod channel;
mod event;
mod log;
mod observer;

pub use channel::ChannelObserver;
pub use event::NetEvent;
pub(crate) use log::tokens_as_string;
pub use log::TracingObserver;
pub use observer::NetObserver;
