use crate::{net::Token, state::NetState};

/// Observable effect of one firing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepResult<C> {
    new_state: NetState<C>,
    consumed: Vec<Token<C>>,
    produced: Vec<Token<C>>,
    // Note: fields not public, a step result is only created by the engine
}

impl<C> StepResult<C> {
    pub(super) fn new(
        new_state: NetState<C>,
        consumed: Vec<Token<C>>,
        produced: Vec<Token<C>>,
    ) -> Self {
        StepResult { new_state, consumed, produced }
    }

    pub fn new_state(&self) -> &NetState<C> {
        &self.new_state
    }

    /// Tokens removed from input places, in the order they were matched.
    pub fn consumed(&self) -> &[Token<C>] {
        &self.consumed
    }

    /// Tokens added to output places, stamped with the firing time.
    pub fn produced(&self) -> &[Token<C>] {
        &self.produced
    }

    pub fn into_parts(self) -> (NetState<C>, Vec<Token<C>>, Vec<Token<C>>) {
        (self.new_state, self.consumed, self.produced)
    }
}
