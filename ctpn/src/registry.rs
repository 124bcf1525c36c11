use std::{collections::HashMap, fmt::Debug, sync::Arc};

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    definition::{Binding, NetDefinition, StateSnapshot},
    engine::EngineConfig,
    error::{PetriError, Result},
    net::BindingMap,
    service::CtpnService,
    state::NetState,
};

pub type NetId = Uuid;

type SharedService<C, B> = Arc<Mutex<CtpnService<C, B>>>;

/// Keeps running nets by id.
///
/// Every net sits behind its own lock, so operations on one net are serialized while different
/// nets proceed concurrently.
pub struct NetRegistry<C, B = BindingMap<C>> {
    config: EngineConfig,
    nets: RwLock<HashMap<NetId, SharedService<C, B>>>,
}

impl<C, B> Default for NetRegistry<C, B> {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl<C, B> NetRegistry<C, B> {
    /// Registry whose [`NetRegistry::create`]d and [`NetRegistry::restore`]d nets use `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        NetRegistry { config, nets: RwLock::new(HashMap::new()) }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a service under `id`, returning the service previously registered there.
    pub async fn insert(
        &self,
        id: NetId,
        service: CtpnService<C, B>,
    ) -> Option<SharedService<C, B>> {
        self.nets.write().await.insert(id, Arc::new(Mutex::new(service)))
    }

    pub async fn remove(&self, id: NetId) -> bool {
        self.nets.write().await.remove(&id).is_some()
    }

    pub async fn contains(&self, id: NetId) -> bool {
        self.nets.read().await.contains_key(&id)
    }

    /// Ids of all registered nets, sorted.
    pub async fn ids(&self) -> Vec<NetId> {
        let mut ids: Vec<NetId> = self.nets.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Shared handle to a registered service, e.g. to attach observers.
    pub async fn service(&self, id: NetId) -> Result<SharedService<C, B>> {
        self.nets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PetriError::NetNotFound(id.to_string()))
    }
}

impl<C, B> NetRegistry<C, B>
where
    C: Clone + PartialEq + Debug,
{
    #[tracing::instrument(level = "debug", skip(self, binding), fields(net = %id))]
    pub async fn fire(&self, id: NetId, transition_id: &str, binding: &B) -> Result<()> {
        let service = self.service(id).await?;
        let mut service = service.lock().await;
        service.fire(transition_id, binding)
    }

    #[tracing::instrument(level = "debug", skip(self), fields(net = %id))]
    pub async fn advance_time(&self, id: NetId, delta: i64) -> Result<()> {
        let service = self.service(id).await?;
        let mut service = service.lock().await;
        service.advance_time(delta)
    }

    pub async fn state(&self, id: NetId) -> Result<NetState<C>> {
        let service = self.service(id).await?;
        let service = service.lock().await;
        Ok(service.current_state().clone())
    }

    pub async fn snapshot(&self, id: NetId) -> Result<StateSnapshot<C>> {
        Ok(StateSnapshot::from(&self.state(id).await?))
    }
}

impl NetRegistry<Value, Binding> {
    /// Build the net, register it under a fresh id with an empty marking at time 0.
    #[tracing::instrument(level = "info", skip_all, fields(name = %definition.name))]
    pub async fn create(&self, definition: &NetDefinition) -> Result<NetId> {
        let net = definition.build()?;
        let id = Uuid::new_v4();
        self.insert(id, CtpnService::with_config(net, self.config.clone())).await;
        info!(net = %id, "Created net.");
        Ok(id)
    }

    /// Rebuild a net and its state, e.g. after loading both from storage.
    ///
    /// A running net is replaced under its lock: operations already in flight finish first,
    /// operations started afterwards see the restored net. Observers of the replaced service are
    /// dropped.
    #[tracing::instrument(level = "info", skip(self, definition, snapshot), fields(net = %id))]
    pub async fn restore(
        &self,
        id: NetId,
        definition: &NetDefinition,
        snapshot: StateSnapshot,
    ) -> Result<()> {
        let net = definition.build()?;
        let mut service = CtpnService::with_config(net, self.config.clone());
        service.set_initial_state(snapshot.into());

        let running = {
            let mut nets = self.nets.write().await;
            match nets.get(&id).cloned() {
                Some(running) => running,
                None => {
                    nets.insert(id, Arc::new(Mutex::new(service)));
                    return Ok(());
                }
            }
        };
        // same lock as every other writer of this net, the map entry stays in place
        *running.lock().await = service;
        debug!("Replaced running net.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    use serde_json::json;

    use super::*;
    use crate::{
        net::Token,
        observe::{ChannelObserver, NetEvent, NetObserver},
    };

    fn definition() -> NetDefinition {
        NetDefinition::from_json(
            r#"{
                "name": "parcel",
                "places": ["waiting", "done"],
                "transitions": [{"id": "ship", "minFiringDelay": 10, "maxFiringDelay": 100}],
                "arcs": [
                    {"placeId": "waiting", "transitionId": "ship", "type": "INPUT"},
                    {"placeId": "done", "transitionId": "ship", "type": "OUTPUT"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn parcel_binding() -> Binding {
        let token = vec![Token::new(json!("parcel"), 0)];
        [("waiting".to_string(), token.clone()), ("done".to_string(), token)].into()
    }

    #[tokio::test]
    async fn create_fire_and_snapshot() {
        let registry = NetRegistry::<Value, Binding>::default();
        let id = registry.create(&definition()).await.unwrap();
        assert_eq!(registry.ids().await, vec![id]);

        let snapshot = StateSnapshot {
            current_time: 0,
            marking: [("waiting".to_string(), vec![Token::new(json!("parcel"), 0)])].into(),
        };
        registry.restore(id, &definition(), snapshot).await.unwrap();

        let err = registry.fire(id, "ship", &parcel_binding()).await.unwrap_err();
        assert!(matches!(err, PetriError::TimeConstraintViolation { .. }));

        registry.advance_time(id, 10).await.unwrap();
        registry.fire(id, "ship", &parcel_binding()).await.unwrap();

        let snapshot = registry.snapshot(id).await.unwrap();
        assert_eq!(snapshot.current_time, 10);
        assert_eq!(snapshot.marking.len(), 1);
        assert_eq!(snapshot.marking["done"], vec![Token::new(json!("parcel"), 10)]);
    }

    #[tokio::test]
    async fn unknown_net() {
        let registry = NetRegistry::<Value, Binding>::default();
        let id = Uuid::new_v4();
        let err = registry.advance_time(id, 1).await.unwrap_err();
        assert!(matches!(err, PetriError::NetNotFound(_)));
        assert!(err.is_not_found());
        assert!(registry.state(id).await.is_err());
        assert!(!registry.remove(id).await);
    }

    #[tokio::test]
    async fn concurrent_advances_are_serialized() {
        let registry = Arc::new(NetRegistry::<Value, Binding>::default());
        let id = registry.create(&definition()).await.unwrap();
        let (observer, mut rx) = ChannelObserver::<Value, Binding>::channel();
        registry.service(id).await.unwrap().lock().await.add_observer(Arc::new(observer));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            tasks.spawn(async move { registry.advance_time(id, 1).await });
        }
        while let Some(res) = tasks.join_next().await {
            res.unwrap().unwrap();
        }

        assert_eq!(registry.state(id).await.unwrap().current_time(), 16);
        let mut times = Vec::new();
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(event, NetEvent::TimeAdvanced { .. }));
            times.push(event.time());
        }
        assert_eq!(times, (1..=16).collect::<Vec<_>>());
        assert!(registry.remove(id).await);
        assert!(!registry.contains(id).await);
    }

    /// Blocks inside the service's lock while time is advanced.
    struct SlowObserver {
        started: Arc<AtomicBool>,
        finished: Arc<AtomicBool>,
    }

    impl NetObserver<Value, Binding> for SlowObserver {
        fn on_time_advanced(&self, _time: i64) {
            self.started.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(200));
            self.finished.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn restore_waits_for_running_operation() {
        let registry = Arc::new(NetRegistry::<Value, Binding>::default());
        let id = registry.create(&definition()).await.unwrap();
        let started = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let handle = registry.service(id).await.unwrap();
        handle.lock().await.add_observer(Arc::new(SlowObserver {
            started: Arc::clone(&started),
            finished: Arc::clone(&finished),
        }));

        let advancing = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.advance_time(id, 5).await })
        };
        while !started.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let snapshot = StateSnapshot { current_time: 1, marking: BTreeMap::new() };
        registry.restore(id, &definition(), snapshot).await.unwrap();
        assert!(finished.load(Ordering::SeqCst));
        advancing.await.unwrap().unwrap();

        // restored in place: handles taken before the restore see the new state
        assert!(Arc::ptr_eq(&handle, &registry.service(id).await.unwrap()));
        assert_eq!(registry.state(id).await.unwrap().current_time(), 1);
        registry.advance_time(id, 2).await.unwrap();
        assert_eq!(handle.lock().await.current_state().current_time(), 3);
    }
}
