use std::fmt::Debug;

use super::{EngineConfig, StepResult};
use crate::{
    error::{PetriError, Result},
    net::{ArcVariant, PetriNet},
    state::NetState,
};

/// Computes the successor of a state by firing a transition.
///
/// The engine holds no state besides its configuration. Firing is a pure function of
/// `(net, state, transition, binding)`: it never reads a wall clock and never mutates its inputs,
/// so one engine can be shared between any number of threads and nets.
#[derive(Clone, Debug, Default)]
pub struct PetriNetEngine {
    config: EngineConfig,
}

impl PetriNetEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        PetriNetEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fire `transition_id` with `binding` at the state's current time.
    ///
    /// 1. Inhibitor arcs (if enforced) reject the firing while their place holds tokens.
    /// 2. Each input arc's expression yields the tokens to consume. Every required token is
    ///    matched by color against the first equal token still available at the arc's place
    ///    (insertion order), so one token instance is never matched twice.
    /// 3. The firing is rejected unless `current_time >= latest consumed creation time +
    ///    min_firing_delay` (and, if enforced, `current_time <= latest + max_firing_delay`).
    /// 4. Each output arc's expression yields the tokens to produce. They are restamped with the
    ///    firing time and appended to the arc's place.
    ///
    /// On error `state` is left as it was; nothing of a partial firing is observable.
    pub fn fire_transition<C, B>(
        &self,
        net: &PetriNet<C, B>,
        state: &NetState<C>,
        transition_id: &str,
        binding: &B,
    ) -> Result<StepResult<C>>
    where
        C: Clone + PartialEq + Debug,
    {
        let transition = net.transition(transition_id)?;

        if self.config.enforce_inhibitors {
            for arc in net.arcs_of_variant(transition_id, ArcVariant::Inhibitor) {
                if !state.tokens(arc.place_id()).is_empty() {
                    return Err(PetriError::Inhibited {
                        transition_id: transition_id.to_string(),
                        place_id: arc.place_id().to_string(),
                    });
                }
            }
        }

        let mut working = state.clone();
        let mut consumed = Vec::new();
        let mut max_token_time = 0i64;

        for arc in net.arcs_of_variant(transition_id, ArcVariant::Input) {
            let place_id = arc.place_id();
            for required in arc.expression().evaluate(binding) {
                let token = working
                    .take_first(place_id, |available| available.value() == required.value())
                    .ok_or_else(|| PetriError::MissingToken {
                        place_id: place_id.to_string(),
                        value: format!("{:?}", required.value()),
                    })?;
                max_token_time = max_token_time.max(token.creation_timestamp());
                consumed.push(token);
            }
        }

        let firing_time = state.current_time();
        let enabled_at = max_token_time.saturating_add_unsigned(transition.min_firing_delay());
        if firing_time < enabled_at {
            return Err(PetriError::TimeConstraintViolation {
                transition_id: transition_id.to_string(),
                current_time: firing_time,
                enabled_at,
            });
        }
        if self.config.enforce_max_delay && !consumed.is_empty() {
            let closed_at = max_token_time.saturating_add_unsigned(transition.max_firing_delay());
            if firing_time > closed_at {
                return Err(PetriError::FiringWindowClosed {
                    transition_id: transition_id.to_string(),
                    current_time: firing_time,
                    closed_at,
                });
            }
        }

        let mut produced = Vec::new();
        for arc in net.arcs_of_variant(transition_id, ArcVariant::Output) {
            let tokens: Vec<_> = arc
                .expression()
                .evaluate(binding)
                .into_iter()
                .map(|token| token.restamped(firing_time))
                .collect();
            working.push_tokens(arc.place_id(), tokens.iter().cloned());
            produced.extend(tokens);
        }

        Ok(StepResult::new(working, consumed, produced))
    }

    /// Check whether firing would succeed, without producing a successor state.
    pub fn check_enabled<C, B>(
        &self,
        net: &PetriNet<C, B>,
        state: &NetState<C>,
        transition_id: &str,
        binding: &B,
    ) -> Result<()>
    where
        C: Clone + PartialEq + Debug,
    {
        self.fire_transition(net, state, transition_id, binding).map(|_| ())
    }

    /// Ids (ascending) of all transitions that can fire in `state` with `binding`.
    pub fn enabled_transitions<C, B>(
        &self,
        net: &PetriNet<C, B>,
        state: &NetState<C>,
        binding: &B,
    ) -> Vec<String>
    where
        C: Clone + PartialEq + Debug,
    {
        net.transition_ids()
            .into_iter()
            .filter(|id| self.check_enabled(net, state, id, binding).is_ok())
            .map(str::to_string)
            .collect()
    }
}
