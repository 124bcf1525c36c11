mod net_state;

pub use net_state::NetState;
