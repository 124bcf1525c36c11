mod builder;
mod common;
mod expression;
mod petri_net;

pub use builder::PetriNetBuilder;
pub use common::{Arc, ArcVariant, Place, Token, Transition};
pub use expression::{ArcExpression, BindingLookup, BindingMap, ConstantTokens};
pub use petri_net::PetriNet;
