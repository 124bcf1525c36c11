use std::collections::HashMap;

use tracing::debug;

use crate::error::{PetriError, Result};

use super::{Arc, BindingMap, PetriNet, Place, Transition};

pub struct PetriNetBuilder<C, B = BindingMap<C>> {
    places: HashMap<String, Place>,
    transitions: HashMap<String, Transition>,
    arcs: Vec<Arc<C, B>>,
}

impl<C, B> Default for PetriNetBuilder<C, B> {
    fn default() -> Self {
        PetriNetBuilder { places: HashMap::new(), transitions: HashMap::new(), arcs: Vec::new() }
    }
}

impl<C, B> Clone for PetriNetBuilder<C, B> {
    fn clone(&self) -> Self {
        PetriNetBuilder {
            places: self.places.clone(),
            transitions: self.transitions.clone(),
            arcs: self.arcs.clone(),
        }
    }
}

impl<C, B> PetriNetBuilder<C, B> {
    pub fn places(&self) -> &HashMap<String, Place> {
        &self.places
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty() && self.transitions.is_empty() && self.arcs.is_empty()
    }

    /// Insert place into this petri net.
    ///
    /// Returns the existing place for this id, or None if the id is not in use.
    pub fn insert_place(&mut self, place: Place) -> Option<Place> {
        self.places.insert(place.id().to_string(), place)
    }

    /// Insert transition into this petri net.
    ///
    /// Returns the existing transition for this id, or None if the id is not in use.
    pub fn insert_transition(&mut self, transition: Transition) -> Option<Transition> {
        self.transitions.insert(transition.id().to_string(), transition)
    }

    /// Insert arc into this petri net.
    ///
    /// Place and transition must already be part of the net. Several arcs may connect the same
    /// place and transition; all of them are evaluated when firing.
    pub fn insert_arc(&mut self, arc: Arc<C, B>) -> Result<()> {
        let place_id = arc.place_id();
        let transition_id = arc.transition_id();
        if !self.places.contains_key(place_id) {
            return Err(PetriError::ValueError(format!(
                "Arc '{place_id}' <-> '{transition_id}' cannot be added, place does not exist."
            )));
        };
        if !self.transitions.contains_key(transition_id) {
            return Err(PetriError::ValueError(format!(
                "Arc '{place_id}' <-> '{transition_id}' cannot be added, transition does not exist."
            )));
        };
        self.arcs.push(arc);
        Ok(())
    }

    /// Build the PetriNet
    pub fn build(&self) -> PetriNet<C, B> {
        let places = self.places.len();
        let transitions = self.transitions.len();
        let arcs = self.arcs.len();
        debug!(places, transitions, arcs, "Built petri net.");
        PetriNet {
            places: self.places.clone(),
            transitions: self.transitions.clone(),
            arcs: self.arcs.clone(),
        }
    }
}
