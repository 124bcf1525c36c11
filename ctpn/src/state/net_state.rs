use std::{collections::BTreeMap, fmt::Debug};

use crate::{
    error::{PetriError, Result},
    net::Token,
};

/// Dynamic state of a net: the marking (place id -> multiset of tokens) and the virtual clock.
///
/// All mutators are copy-on-write and return a new state, the receiver stays untouched. A place
/// without an entry in the marking holds no tokens; places are dropped from the marking once
/// their last token is consumed. Within a place, tokens keep their insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetState<C> {
    marking: BTreeMap<String, Vec<Token<C>>>,
    current_time: i64,
}

impl<C> Default for NetState<C> {
    fn default() -> Self {
        NetState { marking: BTreeMap::new(), current_time: 0 }
    }
}

impl<C> NetState<C> {
    /// Empty marking at the given time.
    pub fn at_time(current_time: i64) -> Self {
        NetState { marking: BTreeMap::new(), current_time }
    }

    pub fn new(
        marking: impl IntoIterator<Item = (String, Vec<Token<C>>)>,
        current_time: i64,
    ) -> Self {
        let mut state = Self::at_time(current_time);
        for (place_id, tokens) in marking {
            state.push_tokens(&place_id, tokens);
        }
        state
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    pub fn marking(&self) -> &BTreeMap<String, Vec<Token<C>>> {
        &self.marking
    }

    /// Tokens at a place, empty if the place holds none.
    pub fn tokens(&self, place_id: &str) -> &[Token<C>] {
        self.marking.get(place_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn token_count(&self) -> usize {
        self.marking.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.marking.is_empty()
    }

    /// New state with `delta` added to the clock. Callers validate that `delta` is not negative.
    pub fn advance_time(&self, delta: i64) -> Self
    where
        C: Clone,
    {
        NetState {
            marking: self.marking.clone(),
            current_time: self.current_time.saturating_add(delta),
        }
    }

    pub fn with_token(&self, place_id: &str, token: Token<C>) -> Self
    where
        C: Clone,
    {
        self.with_tokens_added(place_id, [token])
    }

    /// New state with `tokens` appended to the place's multiset.
    pub fn with_tokens_added(
        &self,
        place_id: &str,
        tokens: impl IntoIterator<Item = Token<C>>,
    ) -> Self
    where
        C: Clone,
    {
        let mut state = self.clone();
        state.push_tokens(place_id, tokens);
        state
    }

    /// New state with each of `tokens` removed from the place's multiset.
    ///
    /// Tokens are matched by full equality (color and creation time). Fails with
    /// [`PetriError::TokenNotFound`] if a token is not present often enough.
    pub fn with_tokens_consumed(&self, place_id: &str, tokens: &[Token<C>]) -> Result<Self>
    where
        C: Clone + PartialEq + Debug,
    {
        let mut state = self.clone();
        for token in tokens {
            state.take_first(place_id, |available| available == token).ok_or_else(|| {
                PetriError::TokenNotFound {
                    place_id: place_id.to_string(),
                    token: token.to_string(),
                }
            })?;
        }
        Ok(state)
    }

    pub(crate) fn push_tokens(
        &mut self,
        place_id: &str,
        tokens: impl IntoIterator<Item = Token<C>>,
    ) {
        let mut tokens = tokens.into_iter().peekable();
        if tokens.peek().is_none() {
            return;
        }
        self.marking.entry(place_id.to_string()).or_default().extend(tokens);
    }

    /// Remove and return the first token at `place_id` (in insertion order) accepted by `pred`.
    pub(crate) fn take_first(
        &mut self,
        place_id: &str,
        pred: impl Fn(&Token<C>) -> bool,
    ) -> Option<Token<C>> {
        let tokens = self.marking.get_mut(place_id)?;
        let idx = tokens.iter().position(pred)?;
        let token = tokens.remove(idx);
        if tokens.is_empty() {
            self.marking.remove(place_id);
        }
        Some(token)
    }
}
