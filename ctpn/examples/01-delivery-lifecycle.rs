use std::sync::Arc;

use ctpn::{
    error::Result as PetriResult,
    net::{self, PetriNetBuilder, Place, Token, Transition},
    observe::TracingObserver,
    CtpnService,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq)]
struct Delivery {
    id: u32,
    courier: Option<String>,
}

#[derive(Debug)]
struct Assignment {
    delivery: u32,
    courier: String,
}

impl Assignment {
    fn unassigned(&self) -> Vec<Token<Delivery>> {
        vec![Token::new(Delivery { id: self.delivery, courier: None }, 0)]
    }

    fn assigned(&self) -> Vec<Token<Delivery>> {
        vec![Token::new(Delivery { id: self.delivery, courier: Some(self.courier.clone()) }, 0)]
    }
}

/// created -> assign -> assigned -> pickup -> in_transit -> deliver -> delivered
///
/// `pickup` is blocked while anything sits in `on_hold`.
fn lifecycle() -> PetriResult<PetriNetBuilder<Delivery, Assignment>> {
    let mut net = PetriNetBuilder::default();
    for place in ["created", "assigned", "in_transit", "delivered", "on_hold"] {
        net.insert_place(Place::new(place, place.replace('_', " ")));
    }
    net.insert_transition(Transition::new("assign", "Assign courier", 0, 30)?);
    net.insert_transition(Transition::new("pickup", "Pick up parcel", 5, 60)?);
    net.insert_transition(Transition::unbounded("deliver", "Hand over parcel", 10));

    net.insert_arc(net::Arc::input("created", "assign", Assignment::unassigned))?;
    net.insert_arc(net::Arc::output("assigned", "assign", Assignment::assigned))?;
    net.insert_arc(net::Arc::input("assigned", "pickup", Assignment::assigned))?;
    net.insert_arc(net::Arc::inhibitor("on_hold", "pickup"))?;
    net.insert_arc(net::Arc::output("in_transit", "pickup", Assignment::assigned))?;
    net.insert_arc(net::Arc::input("in_transit", "deliver", Assignment::assigned))?;
    net.insert_arc(net::Arc::output("delivered", "deliver", Assignment::assigned))?;
    Ok(net)
}

fn run() -> PetriResult<()> {
    let mut service = CtpnService::new(lifecycle()?.build());
    service.add_observer(Arc::new(TracingObserver::default()));

    let parcel = Token::new(Delivery { id: 7, courier: None }, 0);
    service.set_initial_state(service.current_state().with_token("created", parcel));
    let binding = Assignment { delivery: 7, courier: "alice".into() };

    service.fire("assign", &binding)?;
    if let Err(err) = service.fire("pickup", &binding) {
        warn!("Pickup rejected: {}", err);
    }
    service.advance_time(5)?;

    info!("Putting delivery on hold.");
    let hold = Token::new(Delivery { id: 7, courier: None }, service.current_state().current_time());
    service.set_initial_state(service.current_state().with_token("on_hold", hold.clone()));
    if let Err(err) = service.fire("pickup", &binding) {
        warn!("Pickup rejected: {}", err);
    }

    info!("Releasing hold.");
    let released = service.current_state().with_tokens_consumed("on_hold", &[hold])?;
    service.set_initial_state(released);
    service.fire("pickup", &binding)?;

    service.advance_time(10)?;
    service.fire("deliver", &binding)?;

    for (place, tokens) in service.current_state().marking() {
        for token in tokens {
            info!(place = %place, %token, "Final marking.");
        }
    }
    Ok(())
}

fn main() -> PetriResult<()> {
    // set up logging
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::try_new("info,ctpn=debug").unwrap())
        .init();

    run()
}
