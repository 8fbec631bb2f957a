///! Shared refresh state
///!
///! One slot per data source holding the loading flag, the last error, the
///! last successful update time and the current result set. Slots are only
///! mutated through a [`LoadingGuard`], which the refresh orchestrator takes
///! at the start of every attempt. Every mutation is announced on a
///! broadcast channel so readers never have to poll.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use terra_common::DataLayer;

use super::fixed::{CctvCamera, MilitaryBase, NuclearSite};
use super::flight::FlightState;
use super::quake::SeismicEvent;
use super::sat::OrbitalElementSet;
use super::weather::WeatherFrames;

const CHANNEL_CAPACITY: usize = 64;

/// What happened to a source or layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A fetch attempt started
    Loading,
    /// New data was stored
    Updated,
    /// The attempt failed; `last_error` holds the message
    Failed,
    /// The attempt ended without a result (panic or cancellation)
    Aborted,
    LayerActivated,
    LayerDeactivated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub layer: DataLayer,
    pub kind: ChangeKind,
}

/// Anything a slot can hold
pub trait Payload: Clone + Default + Send + Sync + 'static {
    fn record_count(&self) -> usize;
}

impl<T: Clone + Send + Sync + 'static> Payload for Vec<T> {
    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Payload for WeatherFrames {
    fn record_count(&self) -> usize {
        self.radar.len() + self.satellite.len()
    }
}

/// Refresh state of one source
#[derive(Debug, Clone, Default)]
pub struct SourceState<T> {
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub data: T,
}

/// Data-free view of a slot, for logging and health output
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStatus {
    pub layer: DataLayer,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub records: usize,
}

pub struct SourceSlot<T> {
    layer: DataLayer,
    state: RwLock<SourceState<T>>,
    tx: broadcast::Sender<StateChange>,
}

impl<T: Payload> SourceSlot<T> {
    fn new(layer: DataLayer, tx: broadcast::Sender<StateChange>) -> Self {
        Self {
            layer,
            state: RwLock::new(SourceState::default()),
            tx,
        }
    }

    pub fn layer(&self) -> DataLayer {
        self.layer
    }

    /// Mark the source as loading and clear its last error
    ///
    /// The returned guard must be finished with [`LoadingGuard::succeed`] or
    /// [`LoadingGuard::fail`]; dropping it any other way still clears the
    /// loading flag.
    pub fn begin(&self) -> LoadingGuard<'_, T> {
        {
            let mut state = self.write();
            state.is_loading = true;
            state.last_error = None;
        }
        self.notify(ChangeKind::Loading);
        LoadingGuard { slot: self, finished: false }
    }

    pub fn snapshot(&self) -> SourceState<T> {
        self.read().clone()
    }

    pub fn data(&self) -> T {
        self.read().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.read().last_update
    }

    pub fn status(&self) -> SourceStatus {
        let state = self.read();
        SourceStatus {
            layer: self.layer,
            is_loading: state.is_loading,
            last_error: state.last_error.clone(),
            last_update: state.last_update,
            records: state.data.record_count(),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SourceState<T>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SourceState<T>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, kind: ChangeKind) {
        // No receivers is fine
        let _ = self.tx.send(StateChange { layer: self.layer, kind });
    }
}

/// One in-flight refresh attempt on a slot
pub struct LoadingGuard<'a, T: Payload> {
    slot: &'a SourceSlot<T>,
    finished: bool,
}

impl<T: Payload> LoadingGuard<'_, T> {
    /// Replace the result set and stamp the update time
    pub fn succeed(mut self, data: T) {
        {
            let mut state = self.slot.write();
            state.data = data;
            state.last_update = Some(Utc::now());
            state.is_loading = false;
        }
        self.finished = true;
        self.slot.notify(ChangeKind::Updated);
    }

    /// Record a failure message; the previous result set is kept
    pub fn fail(mut self, message: impl Into<String>) {
        {
            let mut state = self.slot.write();
            state.last_error = Some(message.into());
            state.is_loading = false;
        }
        self.finished = true;
        self.slot.notify(ChangeKind::Failed);
    }
}

impl<T: Payload> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.slot.write().is_loading = false;
        self.slot.notify(ChangeKind::Aborted);
    }
}

/// All per-source slots plus the set of active layers
pub struct StateStore {
    pub flights: SourceSlot<Vec<FlightState>>,
    pub satellites: SourceSlot<Vec<OrbitalElementSet>>,
    pub earthquakes: SourceSlot<Vec<SeismicEvent>>,
    pub weather: SourceSlot<WeatherFrames>,
    pub cctv: SourceSlot<Vec<CctvCamera>>,
    pub military: SourceSlot<Vec<MilitaryBase>>,
    pub nuclear: SourceSlot<Vec<NuclearSite>>,
    active_layers: RwLock<HashSet<DataLayer>>,
    tx: broadcast::Sender<StateChange>,
}

impl StateStore {
    pub fn new(active_layers: impl IntoIterator<Item = DataLayer>) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            flights: SourceSlot::new(DataLayer::Flights, tx.clone()),
            satellites: SourceSlot::new(DataLayer::Satellites, tx.clone()),
            earthquakes: SourceSlot::new(DataLayer::Earthquakes, tx.clone()),
            weather: SourceSlot::new(DataLayer::Weather, tx.clone()),
            cctv: SourceSlot::new(DataLayer::Cctv, tx.clone()),
            military: SourceSlot::new(DataLayer::Military, tx.clone()),
            nuclear: SourceSlot::new(DataLayer::Nuclear, tx.clone()),
            active_layers: RwLock::new(active_layers.into_iter().collect()),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.tx.subscribe()
    }

    /// Same as [`subscribe`](Self::subscribe) as a `Stream`; lagged
    /// receivers yield an error item instead of blocking the sender.
    pub fn subscribe_stream(&self) -> BroadcastStream<StateChange> {
        BroadcastStream::new(self.tx.subscribe())
    }

    pub fn is_layer_active(&self, layer: DataLayer) -> bool {
        self.active_layers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&layer)
    }

    /// Returns true if the layer state changed
    pub fn set_layer_active(&self, layer: DataLayer, active: bool) -> bool {
        let changed = {
            let mut layers = self.active_layers.write().unwrap_or_else(|e| e.into_inner());
            if active {
                layers.insert(layer)
            } else {
                layers.remove(&layer)
            }
        };

        if changed {
            let kind = if active {
                ChangeKind::LayerActivated
            } else {
                ChangeKind::LayerDeactivated
            };
            let _ = self.tx.send(StateChange { layer, kind });
        }
        changed
    }

    /// Flip a layer and return its new state
    pub fn toggle_layer(&self, layer: DataLayer) -> bool {
        let active = !self.is_layer_active(layer);
        self.set_layer_active(layer, active);
        active
    }

    pub fn active_layers(&self) -> Vec<DataLayer> {
        let layers = self.active_layers.read().unwrap_or_else(|e| e.into_inner());
        let mut active: Vec<DataLayer> = layers.iter().copied().collect();
        active.sort();
        active
    }

    pub fn status(&self, layer: DataLayer) -> SourceStatus {
        match layer {
            DataLayer::Flights => self.flights.status(),
            DataLayer::Satellites => self.satellites.status(),
            DataLayer::Earthquakes => self.earthquakes.status(),
            DataLayer::Weather => self.weather.status(),
            DataLayer::Cctv => self.cctv.status(),
            DataLayer::Military => self.military.status(),
            DataLayer::Nuclear => self.nuclear.status(),
        }
    }

    pub fn statuses(&self) -> Vec<SourceStatus> {
        DataLayer::ALL.iter().map(|&layer| self.status(layer)).collect()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new([DataLayer::Flights, DataLayer::Satellites, DataLayer::Earthquakes])
    }
}
