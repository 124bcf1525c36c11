use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use super::ArcExpression;
use crate::error::{PetriError, Result};

/// A colored token: an immutable value tagged with its creation time.
///
/// Two tokens are equal if and only if value and creation timestamp are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token<C> {
    value: C,
    creation_timestamp: i64,
}

impl<C> Token<C> {
    pub fn new(value: C, creation_timestamp: i64) -> Self {
        Token { value, creation_timestamp }
    }

    pub fn value(&self) -> &C {
        &self.value
    }

    pub fn creation_timestamp(&self) -> i64 {
        self.creation_timestamp
    }

    /// Same color, new creation time.
    pub fn restamped(self, creation_timestamp: i64) -> Self {
        Token { value: self.value, creation_timestamp }
    }
}

impl<C: Debug> Display for Token<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {})", self.value, self.creation_timestamp)
    }
}

#[derive(Clone, Debug)]
pub struct Place {
    id: String,
    name: String,
}

impl Place {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Place { id: id.into(), name: name.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Place {}

impl Hash for Place {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Clone, Debug)]
pub struct Transition {
    id: String,
    name: String,
    min_firing_delay: u64,
    max_firing_delay: u64,
}

impl Transition {
    /// Create a transition with the firing delay window `[min_firing_delay, max_firing_delay]`.
    ///
    /// Fails if `max_firing_delay < min_firing_delay`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        min_firing_delay: u64,
        max_firing_delay: u64,
    ) -> Result<Self> {
        let id = id.into();
        if max_firing_delay < min_firing_delay {
            return Err(PetriError::ValueError(format!(
                "Transition '{id}': max_firing_delay ({max_firing_delay}) must be >= \
                 min_firing_delay ({min_firing_delay})."
            )));
        }
        Ok(Transition { id, name: name.into(), min_firing_delay, max_firing_delay })
    }

    /// Transition without an upper bound on its firing delay.
    pub fn unbounded(id: impl Into<String>, name: impl Into<String>, min_firing_delay: u64) -> Self {
        Transition {
            id: id.into(),
            name: name.into(),
            min_firing_delay,
            max_firing_delay: u64::MAX,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_firing_delay(&self) -> u64 {
        self.min_firing_delay
    }

    pub fn max_firing_delay(&self) -> u64 {
        self.max_firing_delay
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transition {}

impl Hash for Transition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArcVariant {
    /// place -> transition
    Input,
    /// transition -> place
    Output,
    /// place -o transition, blocks firing while the place holds tokens
    Inhibitor,
}

impl ArcVariant {
    pub fn is_input(&self) -> bool {
        *self == Self::Input
    }

    pub fn is_output(&self) -> bool {
        *self == Self::Output
    }

    pub fn is_inhibitor(&self) -> bool {
        *self == Self::Inhibitor
    }
}

impl Display for ArcVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcVariant::Input => write!(f, "INPUT"),
            ArcVariant::Output => write!(f, "OUTPUT"),
            ArcVariant::Inhibitor => write!(f, "INHIBITOR"),
        }
    }
}

/// Directed edge between one place and one transition.
///
/// The expression maps the binding of a firing to the multiset of tokens the arc consumes
/// (input) or produces (output). It is ignored for inhibitor arcs.
pub struct Arc<C, B> {
    place_id: String,
    transition_id: String,
    variant: ArcVariant,
    expression: std::sync::Arc<dyn ArcExpression<C, B>>,
}

impl<C, B> Arc<C, B> {
    pub fn new(
        place_id: impl Into<String>,
        transition_id: impl Into<String>,
        variant: ArcVariant,
        expression: impl ArcExpression<C, B> + 'static,
    ) -> Self {
        Arc {
            place_id: place_id.into(),
            transition_id: transition_id.into(),
            variant,
            expression: std::sync::Arc::new(expression),
        }
    }

    pub fn input(
        place_id: impl Into<String>,
        transition_id: impl Into<String>,
        expression: impl ArcExpression<C, B> + 'static,
    ) -> Self {
        Self::new(place_id, transition_id, ArcVariant::Input, expression)
    }

    pub fn output(
        place_id: impl Into<String>,
        transition_id: impl Into<String>,
        expression: impl ArcExpression<C, B> + 'static,
    ) -> Self {
        Self::new(place_id, transition_id, ArcVariant::Output, expression)
    }

    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    pub fn transition_id(&self) -> &str {
        &self.transition_id
    }

    pub fn variant(&self) -> ArcVariant {
        self.variant
    }

    pub fn expression(&self) -> &dyn ArcExpression<C, B> {
        self.expression.as_ref()
    }
}

impl<C, B> Arc<C, B>
where
    C: Clone + Send + Sync + 'static,
{
    pub fn inhibitor(place_id: impl Into<String>, transition_id: impl Into<String>) -> Self {
        Self::new(place_id, transition_id, ArcVariant::Inhibitor, super::ConstantTokens::empty())
    }
}

impl<C, B> Clone for Arc<C, B> {
    fn clone(&self) -> Self {
        Arc {
            place_id: self.place_id.clone(),
            transition_id: self.transition_id.clone(),
            variant: self.variant,
            expression: std::sync::Arc::clone(&self.expression),
        }
    }
}

impl<C, B> Debug for Arc<C, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arc")
            .field("place_id", &self.place_id)
            .field("transition_id", &self.transition_id)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}
