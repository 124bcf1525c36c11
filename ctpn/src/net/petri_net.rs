use std::collections::HashMap;

use super::{Arc, ArcVariant, BindingMap, PetriNetBuilder, Place, Transition};
use crate::error::{PetriError, Result};

/// Static structure of a colored timed petri net (places, transitions, arcs).
///
/// Immutable once built. Arcs keep their insertion order, which is the order the engine walks
/// them in when firing.
pub struct PetriNet<C, B = BindingMap<C>> {
    pub(super) places: HashMap<String, Place>,
    pub(super) transitions: HashMap<String, Transition>,
    pub(super) arcs: Vec<Arc<C, B>>,
}

impl<C, B> Default for PetriNet<C, B> {
    fn default() -> Self {
        PetriNet { places: HashMap::new(), transitions: HashMap::new(), arcs: Vec::new() }
    }
}

impl<C, B> PetriNet<C, B> {
    /// Build a net from its parts. Fails if an arc references an unknown place or transition.
    pub fn new(
        places: impl IntoIterator<Item = Place>,
        transitions: impl IntoIterator<Item = Transition>,
        arcs: impl IntoIterator<Item = Arc<C, B>>,
    ) -> Result<Self> {
        let mut builder = PetriNetBuilder::default();
        for place in places {
            builder.insert_place(place);
        }
        for transition in transitions {
            builder.insert_transition(transition);
        }
        for arc in arcs {
            builder.insert_arc(arc)?;
        }
        Ok(builder.build())
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.values()
    }

    pub fn arcs(&self) -> &[Arc<C, B>] {
        &self.arcs
    }

    pub fn place(&self, id: &str) -> Result<&Place> {
        self.places.get(id).ok_or_else(|| PetriError::PlaceNotFound(id.to_string()))
    }

    pub fn transition(&self, id: &str) -> Result<&Transition> {
        self.transitions.get(id).ok_or_else(|| PetriError::TransitionNotFound(id.to_string()))
    }

    /// All arcs connected to the given transition, in insertion order.
    pub fn arcs_for<'a>(&'a self, transition_id: &'a str) -> impl Iterator<Item = &'a Arc<C, B>> {
        self.arcs.iter().filter(move |arc| arc.transition_id() == transition_id)
    }

    pub fn arcs_of_variant<'a>(
        &'a self,
        transition_id: &'a str,
        variant: ArcVariant,
    ) -> impl Iterator<Item = &'a Arc<C, B>> {
        self.arcs_for(transition_id).filter(move |arc| arc.variant() == variant)
    }

    /// Transition ids in ascending order.
    pub fn transition_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.transitions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<C, B> std::fmt::Debug for PetriNet<C, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetriNet")
            .field("places", &self.places.len())
            .field("transitions", &self.transitions.len())
            .field("arcs", &self.arcs)
            .finish()
    }
}
