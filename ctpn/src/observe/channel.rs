use tokio::sync::mpsc;

use super::{NetEvent, NetObserver};
use crate::net::Token;

/// Forwards events into an unbounded channel, for consumers that handle them asynchronously.
///
/// The channel keeps the order in which the service emitted the events.
pub struct ChannelObserver<C, B> {
    tx: mpsc::UnboundedSender<NetEvent<C, B>>,
}

impl<C, B> ChannelObserver<C, B> {
    pub fn new(tx: mpsc::UnboundedSender<NetEvent<C, B>>) -> Self {
        ChannelObserver { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NetEvent<C, B>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl<C, B> NetObserver<C, B> for ChannelObserver<C, B>
where
    C: Clone + Send,
    B: Clone + Send,
{
    fn on_transition_fired(
        &self,
        transition_id: &str,
        binding: &B,
        time: i64,
        consumed: &[Token<C>],
        produced: &[Token<C>],
    ) {
        let _ = self.tx.send(NetEvent::TransitionFired {
            transition_id: transition_id.to_string(),
            binding: binding.clone(),
            time,
            consumed: consumed.to_vec(),
            produced: produced.to_vec(),
        });
        // Note: error means the receiver has been dropped, nobody is listening anymore.
    }

    fn on_time_advanced(&self, time: i64) {
        let _ = self.tx.send(NetEvent::TimeAdvanced { time });
    }
}
