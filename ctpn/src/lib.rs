//! Colored timed petri net (CTPN) engine.
//!
//! A [`net::PetriNet`] describes the static structure, a [`state::NetState`] the marking and
//! virtual clock. [`engine::PetriNetEngine`] computes successor states, [`service::CtpnService`]
//! keeps one net running and notifies [`observe::NetObserver`]s, [`registry::NetRegistry`] keeps
//! many of them.

pub mod definition;
pub mod engine;
pub mod error;
pub mod net;
pub mod observe;
pub mod registry;
pub mod service;
pub mod state;

pub use engine::{EngineConfig, EngineConfigBuilder, PetriNetEngine, StepResult};
pub use error::{PetriError, Result};
pub use service::CtpnService;
