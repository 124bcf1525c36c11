use std::{fmt::Debug, sync::Arc};

use tracing::{debug, trace};

use crate::{
    engine::{EngineConfig, PetriNetEngine},
    error::{PetriError, Result},
    net::{BindingMap, PetriNet},
    observe::{tokens_as_string, NetObserver},
    state::NetState,
};

/// Holds one net together with its current state and executes it.
///
/// Not synchronized internally: at most one `fire` / `advance_time` may be in flight per
/// instance. Wrap it in a lock (see [`crate::registry::NetRegistry`]) to share it.
pub struct CtpnService<C, B = BindingMap<C>> {
    net: Arc<PetriNet<C, B>>,
    engine: PetriNetEngine,
    current_state: NetState<C>,
    observers: Vec<Arc<dyn NetObserver<C, B>>>,
}

impl<C, B> CtpnService<C, B>
where
    C: Clone + PartialEq + Debug,
{
    /// Service starting with an empty marking at time 0.
    pub fn new(net: impl Into<Arc<PetriNet<C, B>>>) -> Self {
        Self::with_config(net, EngineConfig::default())
    }

    pub fn with_config(net: impl Into<Arc<PetriNet<C, B>>>, config: EngineConfig) -> Self {
        CtpnService {
            net: net.into(),
            engine: PetriNetEngine::with_config(config),
            current_state: NetState::default(),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn NetObserver<C, B>>) {
        self.observers.push(observer);
    }

    /// Replace the held state, e.g. with a snapshot loaded from storage. Observers are not
    /// notified.
    pub fn set_initial_state(&mut self, state: NetState<C>) {
        self.current_state = state;
    }

    pub fn current_state(&self) -> &NetState<C> {
        &self.current_state
    }

    pub fn model(&self) -> &PetriNet<C, B> {
        &self.net
    }

    pub fn engine(&self) -> &PetriNetEngine {
        &self.engine
    }

    /// Advance the virtual clock by `delta`. Negative deltas are rejected.
    pub fn advance_time(&mut self, delta: i64) -> Result<()> {
        if delta < 0 {
            return Err(PetriError::InvalidArgument(format!(
                "Time delta must be >= 0, got {delta}."
            )));
        }
        self.current_state = self.current_state.advance_time(delta);
        let time = self.current_state.current_time();
        debug!(delta, time, "Time advanced.");
        for observer in &self.observers {
            observer.on_time_advanced(time);
        }
        Ok(())
    }

    /// Fire a transition at the current time.
    ///
    /// On success the held state is replaced and observers are notified. On error the held state
    /// is unchanged, observers are not notified and the error is returned as is.
    pub fn fire(&mut self, transition_id: &str, binding: &B) -> Result<()> {
        let result = self
            .engine
            .fire_transition(&self.net, &self.current_state, transition_id, binding)
            .inspect_err(|err| trace!(transition = transition_id, %err, "Firing rejected."))?;
        let (new_state, consumed, produced) = result.into_parts();
        self.current_state = new_state;
        let time = self.current_state.current_time();
        debug!(
            transition = transition_id,
            time,
            consumed = %tokens_as_string(&consumed, 100),
            produced = %tokens_as_string(&produced, 100),
            "Transition fired."
        );
        for observer in &self.observers {
            observer.on_transition_fired(transition_id, binding, time, &consumed, &produced);
        }
        Ok(())
    }

    /// Ids of the transitions that could fire right now with `binding`.
    pub fn enabled_transitions(&self, binding: &B) -> Vec<String> {
        self.engine.enabled_transitions(&self.net, &self.current_state, binding)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::net::{Arc as NetArc, ConstantTokens, Place, Token, Transition};

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl NetObserver<&'static str, ()> for Recorder {
        fn on_transition_fired(
            &self,
            transition_id: &str,
            _binding: &(),
            time: i64,
            consumed: &[Token<&'static str>],
            produced: &[Token<&'static str>],
        ) {
            self.log.lock().unwrap().push(format!(
                "{}: fired {transition_id}@{time} -{} +{}",
                self.name,
                consumed.len(),
                produced.len()
            ));
        }

        fn on_time_advanced(&self, time: i64) {
            self.log.lock().unwrap().push(format!("{}: time {time}", self.name));
        }
    }

    fn service() -> CtpnService<&'static str, ()> {
        let net = PetriNet::new(
            [Place::new("p1", "in"), Place::new("p2", "out")],
            [Transition::new("t1", "move", 2, 10).unwrap()],
            [
                NetArc::input("p1", "t1", ConstantTokens::values(["a"])),
                NetArc::output("p2", "t1", ConstantTokens::values(["b"])),
            ],
        )
        .unwrap();
        let mut service = CtpnService::new(net);
        service.set_initial_state(NetState::default().with_token("p1", Token::new("a", 0)));
        service
    }

    #[test]
    fn observers_notified_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut service = service();
        service.add_observer(Arc::new(Recorder { name: "first", log: Arc::clone(&log) }));
        service.add_observer(Arc::new(Recorder { name: "second", log: Arc::clone(&log) }));

        service.advance_time(2).unwrap();
        service.fire("t1", &()).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first: time 2",
                "second: time 2",
                "first: fired t1@2 -1 +1",
                "second: fired t1@2 -1 +1",
            ]
        );
        assert_eq!(service.current_state().tokens("p2"), &[Token::new("b", 2)]);
    }

    #[test]
    fn rejected_firing_is_silent_and_atomic() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut service = service();
        service.add_observer(Arc::new(Recorder { name: "obs", log: Arc::clone(&log) }));
        let before = service.current_state().clone();

        let err = service.fire("t1", &()).unwrap_err();
        assert!(matches!(err, PetriError::TimeConstraintViolation { .. }));
        let err = service.fire("t1", &()).unwrap_err();
        assert!(matches!(err, PetriError::TimeConstraintViolation { .. }));

        assert_eq!(service.current_state(), &before);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn negative_delta_rejected() {
        let mut service = service();
        let err = service.advance_time(-1).unwrap_err();
        assert!(matches!(err, PetriError::InvalidArgument(_)));
        assert_eq!(service.current_state().current_time(), 0);
        service.advance_time(0).unwrap();
        assert_eq!(service.current_state().current_time(), 0);
    }

    #[test]
    fn enabled_transitions_follow_clock() {
        let mut service = service();
        assert!(service.enabled_transitions(&()).is_empty());
        service.advance_time(5).unwrap();
        assert_eq!(service.enabled_transitions(&()), vec!["t1"]);
    }
}
