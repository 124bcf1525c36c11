use crate::net::Token;

/// Sink for events of a [`crate::service::CtpnService`].
///
/// Observers are notified synchronously, in registration order, after the service replaced its
/// state. Rejected firings are not reported.
pub trait NetObserver<C, B>: Send + Sync {
    fn on_transition_fired(
        &self,
        _transition_id: &str,
        _binding: &B,
        _time: i64,
        _consumed: &[Token<C>],
        _produced: &[Token<C>],
    ) {
    }

    fn on_time_advanced(&self, _time: i64) {}
}
