///! Refresh orchestrator - Centralize all periodic source refreshes
///!
///! Every data source gets its own repeating timer:
///! - Flights (every 15 seconds)
///! - Satellites (every minute)
///! - Earthquakes and weather frames (every 5 minutes)
///! - CCTV cameras (every 10 minutes)
///!
///! Military bases and nuclear sites never change at runtime; they are
///! loaded by the initial fan-out, on manual refresh and when their layer
///! is switched on.
///!
///! A timer-driven refresh only runs while its layer is active. Manual
///! refreshes always run. Timer firings of one source are not serialized,
///! so two fetches of the same source may overlap; the one that completes
///! last owns the stored result.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use terra_common::DataLayer;

use super::feed::LiveFeed;
use super::fixed::{
    CctvCamera, CctvTable, MilitaryBase, MilitaryBaseTable, NuclearSite, NuclearSiteTable,
    StaticTable,
};
use super::flight::FlightState;
use super::quake::SeismicEvent;
use super::sat::OrbitalElementSet;
use super::state::{Payload, SourceSlot, StateStore};
use super::weather::WeatherFrames;

/// Timer period per source
#[derive(Debug, Clone)]
pub struct RefreshIntervals {
    pub flights: Duration,
    pub satellites: Duration,
    pub earthquakes: Duration,
    pub weather: Duration,
    pub cctv: Duration,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            flights: Duration::from_secs(15),
            satellites: Duration::from_secs(60),
            earthquakes: Duration::from_secs(300),
            weather: Duration::from_secs(300),
            cctv: Duration::from_secs(600),
        }
    }
}

impl RefreshIntervals {
    /// `None` for layers without a timer
    pub fn for_layer(&self, layer: DataLayer) -> Option<Duration> {
        match layer {
            DataLayer::Flights => Some(self.flights),
            DataLayer::Satellites => Some(self.satellites),
            DataLayer::Earthquakes => Some(self.earthquakes),
            DataLayer::Weather => Some(self.weather),
            DataLayer::Cctv => Some(self.cctv),
            DataLayer::Military | DataLayer::Nuclear => None,
        }
    }
}

/// The client behind every data layer
pub struct Sources {
    pub flights: Arc<dyn LiveFeed<Output = Vec<FlightState>>>,
    pub satellites: Arc<dyn LiveFeed<Output = Vec<OrbitalElementSet>>>,
    pub earthquakes: Arc<dyn LiveFeed<Output = Vec<SeismicEvent>>>,
    pub weather: Arc<dyn LiveFeed<Output = WeatherFrames>>,
    pub cctv: Arc<dyn StaticTable<Record = CctvCamera>>,
    pub military: Arc<dyn StaticTable<Record = MilitaryBase>>,
    pub nuclear: Arc<dyn StaticTable<Record = NuclearSite>>,
}

impl Sources {
    /// Live feeds plus the built-in static tables
    pub fn new(
        flights: Arc<dyn LiveFeed<Output = Vec<FlightState>>>,
        satellites: Arc<dyn LiveFeed<Output = Vec<OrbitalElementSet>>>,
        earthquakes: Arc<dyn LiveFeed<Output = Vec<SeismicEvent>>>,
        weather: Arc<dyn LiveFeed<Output = WeatherFrames>>,
    ) -> Self {
        Self {
            flights,
            satellites,
            earthquakes,
            weather,
            cctv: Arc::new(CctvTable),
            military: Arc::new(MilitaryBaseTable),
            nuclear: Arc::new(NuclearSiteTable),
        }
    }
}

/// Result of one refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Layer inactive and not forced; nothing was touched
    Skipped,
    /// New data stored, with its record count
    Updated(usize),
    /// The client returned an error, now stored as the last error
    Failed,
    /// The refresh task panicked or was cancelled
    Aborted,
}

struct Inner {
    store: Arc<StateStore>,
    sources: Sources,
}

impl Inner {
    async fn refresh_layer(&self, layer: DataLayer, force: bool) -> RefreshOutcome {
        if !force && !self.store.is_layer_active(layer) {
            tracing::debug!("Layer '{}' inactive, skipping refresh", layer);
            return RefreshOutcome::Skipped;
        }

        let store = &self.store;
        let sources = &self.sources;
        match layer {
            DataLayer::Flights => run_feed(&store.flights, sources.flights.as_ref()).await,
            DataLayer::Satellites => run_feed(&store.satellites, sources.satellites.as_ref()).await,
            DataLayer::Earthquakes => run_feed(&store.earthquakes, sources.earthquakes.as_ref()).await,
            DataLayer::Weather => run_feed(&store.weather, sources.weather.as_ref()).await,
            DataLayer::Cctv => run_table(&store.cctv, sources.cctv.as_ref()),
            DataLayer::Military => run_table(&store.military, sources.military.as_ref()),
            DataLayer::Nuclear => run_table(&store.nuclear, sources.nuclear.as_ref()),
        }
    }
}

async fn run_feed<T: Payload>(slot: &SourceSlot<T>, feed: &dyn LiveFeed<Output = T>) -> RefreshOutcome {
    let guard = slot.begin();

    match feed.fetch().await {
        Ok(data) => {
            let count = data.record_count();
            tracing::info!("Fetched {} records from {}", count, feed.name());
            guard.succeed(data);
            RefreshOutcome::Updated(count)
        }
        Err(e) => {
            if e.is_transient() {
                tracing::warn!("{} fetch failed: {}", feed.name(), e);
            } else {
                tracing::error!("{} fetch failed: {}", feed.name(), e);
            }
            guard.fail(e.to_string());
            RefreshOutcome::Failed
        }
    }
}

fn run_table<R>(slot: &SourceSlot<Vec<R>>, table: &dyn StaticTable<Record = R>) -> RefreshOutcome
where
    R: Clone + Send + Sync + 'static,
{
    let guard = slot.begin();
    let records = table.load();
    let count = records.len();
    tracing::debug!("Loaded {} records from {}", count, table.name());
    guard.succeed(records);
    RefreshOutcome::Updated(count)
}

/// Refresh orchestrator
pub struct RefreshOrchestrator {
    inner: Arc<Inner>,
    intervals: RefreshIntervals,
    task_handles: Vec<JoinHandle<()>>,
}

impl RefreshOrchestrator {
    pub fn new(store: Arc<StateStore>, sources: Sources, intervals: RefreshIntervals) -> Self {
        Self {
            inner: Arc::new(Inner { store, sources }),
            intervals,
            task_handles: Vec::new(),
        }
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.inner.store
    }

    pub fn is_running(&self) -> bool {
        !self.task_handles.is_empty()
    }

    /// Fetch every active source once, then arm one timer per source
    pub async fn start(&mut self) {
        if self.is_running() {
            tracing::warn!("Refresh orchestrator already running");
            return;
        }
        tracing::info!("Starting refresh orchestrator...");

        let initial = self.fan_out(false).await;
        let updated = initial
            .iter()
            .filter(|(_, outcome)| matches!(outcome, RefreshOutcome::Updated(_)))
            .count();
        tracing::info!("Initial refresh: {}/{} sources updated", updated, initial.len());

        for layer in DataLayer::ALL {
            match self.intervals.for_layer(layer) {
                Some(period) if period.is_zero() => {
                    tracing::error!("Refresh period for '{}' is zero, timer not armed", layer);
                }
                Some(period) => {
                    let handle = Self::spawn_timer(self.inner.clone(), layer, period);
                    self.task_handles.push(handle);
                }
                None => {}
            }
        }

        tracing::info!(
            "Started {} refresh timers (flights {}s, satellites {}s, earthquakes {}s, weather {}s, cctv {}s)",
            self.task_handles.len(),
            self.intervals.flights.as_secs(),
            self.intervals.satellites.as_secs(),
            self.intervals.earthquakes.as_secs(),
            self.intervals.weather.as_secs(),
            self.intervals.cctv.as_secs()
        );
    }

    /// Cancel all timers; fetches already in flight still complete
    pub fn stop(&mut self) {
        if self.task_handles.is_empty() {
            return;
        }
        tracing::info!("Stopping refresh orchestrator...");

        for handle in self.task_handles.drain(..) {
            handle.abort();
        }

        tracing::info!("All refresh timers stopped");
    }

    /// Refresh every source regardless of layer state and wait for all
    pub async fn refresh_all(&self) -> Vec<(DataLayer, RefreshOutcome)> {
        self.fan_out(true).await
    }

    /// Refresh one source regardless of layer state
    pub async fn refresh(&self, layer: DataLayer) -> RefreshOutcome {
        Self::spawn_refresh(self.inner.clone(), layer, true).await
    }

    /// Refresh one source only if its layer is active (timer path)
    pub async fn refresh_if_active(&self, layer: DataLayer) -> RefreshOutcome {
        Self::spawn_refresh(self.inner.clone(), layer, false).await
    }

    /// Switch a layer on or off
    ///
    /// Turning on a layer that has never been loaded starts a refresh in the
    /// background instead of waiting for its next timer tick.
    pub fn set_layer_active(&self, layer: DataLayer, active: bool) -> bool {
        let changed = self.inner.store.set_layer_active(layer, active);
        if changed && active && self.inner.store.status(layer).last_update.is_none() {
            let inner = self.inner.clone();
            tokio::spawn(async move {
                inner.refresh_layer(layer, false).await;
            });
        }
        changed
    }

    async fn fan_out(&self, force: bool) -> Vec<(DataLayer, RefreshOutcome)> {
        let tasks = DataLayer::ALL
            .iter()
            .map(|&layer| Self::spawn_refresh(self.inner.clone(), layer, force));
        let outcomes = join_all(tasks).await;
        DataLayer::ALL.iter().copied().zip(outcomes).collect()
    }

    /// Run one refresh on its own task so a panic stays contained
    async fn spawn_refresh(inner: Arc<Inner>, layer: DataLayer, force: bool) -> RefreshOutcome {
        let handle = tokio::spawn(async move { inner.refresh_layer(layer, force).await });

        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Refresh task for '{}' did not finish: {}", layer, e);
                RefreshOutcome::Aborted
            }
        }
    }

    fn spawn_timer(inner: Arc<Inner>, layer: DataLayer, period: Duration) -> JoinHandle<()> {
        tracing::debug!("Scheduling '{}' refresh every {:?}", layer, period);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let inner = inner.clone();
                // Detached: a slow fetch never delays the next tick
                tokio::spawn(async move {
                    inner.refresh_layer(layer, false).await;
                });
            }
        })
    }
}
