//! Serializable structures exchanged with the application layer: net definitions as they are
//! received or stored, bindings for externally defined nets, and state snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::Result,
    net::{
        Arc, ArcVariant, BindingLookup, BindingMap, ConstantTokens, PetriNet, PetriNetBuilder,
        Place, Token, Transition,
    },
    state::NetState,
};

/// Binding of externally defined nets: tokens keyed by place id.
pub type Binding = BindingMap<Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub places: Vec<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionDefinition>,
    #[serde(default)]
    pub arcs: Vec<ArcDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub min_firing_delay: u64,
    #[serde(default = "unbounded")]
    pub max_firing_delay: u64,
}

fn unbounded() -> u64 {
    u64::MAX
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcDefinition {
    pub place_id: String,
    pub transition_id: String,
    #[serde(rename = "type")]
    pub variant: ArcVariant,
    /// Fixed token colors for this arc. Without them the arc passes through whatever the
    /// binding holds under its place id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Value>>,
}

impl NetDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Build the net. Place names equal their ids, transitions without a name are named by id.
    pub fn build(&self) -> Result<PetriNet<Value, Binding>> {
        let mut builder = PetriNetBuilder::default();
        for place_id in &self.places {
            builder.insert_place(Place::new(place_id, place_id));
        }
        for tr in &self.transitions {
            let name = if tr.name.is_empty() { &tr.id } else { &tr.name };
            builder.insert_transition(Transition::new(
                &tr.id,
                name,
                tr.min_firing_delay,
                tr.max_firing_delay,
            )?);
        }
        for arc in &self.arcs {
            let arc = match &arc.tokens {
                Some(values) => Arc::new(
                    &arc.place_id,
                    &arc.transition_id,
                    arc.variant,
                    ConstantTokens::values(values.iter().cloned()),
                ),
                None => Arc::new(
                    &arc.place_id,
                    &arc.transition_id,
                    arc.variant,
                    BindingLookup::new(&arc.place_id),
                ),
            };
            builder.insert_arc(arc)?;
        }
        Ok(builder.build())
    }
}

/// Current time plus the tokens of every non-empty place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot<C = Value> {
    pub current_time: i64,
    #[serde(default)]
    pub marking: BTreeMap<String, Vec<Token<C>>>,
}

impl<C: Clone> From<&NetState<C>> for StateSnapshot<C> {
    fn from(state: &NetState<C>) -> Self {
        StateSnapshot { current_time: state.current_time(), marking: state.marking().clone() }
    }
}

impl<C> From<StateSnapshot<C>> for NetState<C> {
    fn from(snapshot: StateSnapshot<C>) -> Self {
        NetState::new(snapshot.marking, snapshot.current_time)
    }
}
