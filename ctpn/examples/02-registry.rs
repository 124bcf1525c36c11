use std::sync::Arc;

use ctpn::{
    definition::{Binding, NetDefinition, StateSnapshot},
    error::Result as PetriResult,
    net::Token,
    observe::{ChannelObserver, NetEvent},
    registry::NetRegistry,
    EngineConfigBuilder,
};
use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const NET: &str = r#"{
    "name": "order",
    "places": ["received", "packed", "shipped"],
    "transitions": [
        {"id": "pack", "name": "Pack order", "minFiringDelay": 2, "maxFiringDelay": 20},
        {"id": "ship", "name": "Ship order", "minFiringDelay": 5, "maxFiringDelay": 50}
    ],
    "arcs": [
        {"placeId": "received", "transitionId": "pack", "type": "INPUT"},
        {"placeId": "packed", "transitionId": "pack", "type": "OUTPUT"},
        {"placeId": "packed", "transitionId": "ship", "type": "INPUT"},
        {"placeId": "shipped", "transitionId": "ship", "type": "OUTPUT"}
    ]
}"#;

fn binding(order: &Value, places: &[&str]) -> Binding {
    places.iter().map(|place| (place.to_string(), vec![Token::new(order.clone(), 0)])).collect()
}

async fn run() -> PetriResult<()> {
    let config = EngineConfigBuilder::default().enforce_max_delay(true).build()?;
    let registry = NetRegistry::<Value, Binding>::with_config(config);
    let definition = NetDefinition::from_json(NET)?;
    let id = registry.create(&definition).await?;

    let order = json!({"order": 1001, "items": 3});
    let snapshot = StateSnapshot {
        current_time: 0,
        marking: [("received".to_string(), vec![Token::new(order.clone(), 0)])].into(),
    };
    registry.restore(id, &definition, snapshot).await?;

    // forward events to a separate task, e.g. a websocket broadcaster
    let (observer, mut rx) = ChannelObserver::<Value, Binding>::channel();
    registry.service(id).await?.lock().await.add_observer(Arc::new(observer));
    let listener = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => info!(%json, "Event."),
                Err(err) => error!("Could not serialize event: {}", err),
            }
            if let NetEvent::TransitionFired { transition_id, .. } = &event {
                if transition_id == "ship" {
                    break;
                }
            }
        }
    });

    registry.advance_time(id, 2).await?;
    registry.fire(id, "pack", &binding(&order, &["received", "packed"])).await?;
    if let Err(err) = registry.fire(id, "ship", &binding(&order, &["packed", "shipped"])).await {
        info!("Not yet: {}", err);
    }
    registry.advance_time(id, 5).await?;
    registry.fire(id, "ship", &binding(&order, &["packed", "shipped"])).await?;

    if let Err(err) = listener.await {
        error!("Listener failed: {}", err);
    }
    let snapshot = serde_json::to_string(&registry.snapshot(id).await?)?;
    info!(%snapshot, "Done.");
    Ok(())
}

#[tokio::main]
async fn main() -> PetriResult<()> {
    // set up logging
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::try_new("info,ctpn=debug").unwrap())
        .init();

    run().await
}
