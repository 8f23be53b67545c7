//! Dashboard controller: loads every chart concurrently, tears down and
//! reloads on a fixed period, and reports per-chart outcomes.

use futures_util::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};

use crate::charts::ChartId;
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::http::JsonClient;
use crate::i18n::Localizer;
use crate::logging::{log, log_cycle, log_load_failure, obj, v_str, Domain, Level};
use crate::surface::RenderSurface;

/// Result of one chart loader within a cycle.
#[derive(Debug)]
pub struct LoadOutcome {
    pub chart: ChartId,
    pub result: Result<()>,
}

/// Every loader's outcome for one `load_charts` call, in loader order.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub outcomes: Vec<LoadOutcome>,
}

impl CycleReport {
    pub fn loaded(&self) -> impl Iterator<Item = ChartId> + '_ {
        self.outcomes.iter().filter(|o| o.result.is_ok()).map(|o| o.chart)
    }

    pub fn failures(&self) -> impl Iterator<Item = (ChartId, &DashboardError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.chart, e)))
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

pub struct Dashboard {
    config: Config,
    client: Arc<dyn JsonClient>,
    surface: Arc<dyn RenderSurface>,
    localizer: Arc<dyn Localizer + Send + Sync>,
}

impl Dashboard {
    pub fn new(
        config: Config,
        client: Arc<dyn JsonClient>,
        surface: Arc<dyn RenderSurface>,
        localizer: Arc<dyn Localizer + Send + Sync>,
    ) -> Self {
        Self {
            config,
            client,
            surface,
            localizer,
        }
    }

    /// Mount an empty slot for every configured chart, as the page does on load.
    pub fn mount_all(&self) -> Result<()> {
        for id in self.config.endpoints.ids() {
            self.surface.mount(id)?;
        }
        Ok(())
    }

    /// Fetch, map and draw a single chart.
    pub async fn load_chart(&self, chart: ChartId) -> Result<()> {
        let url = self
            .config
            .endpoints
            .get(chart.as_str())
            .ok_or_else(|| DashboardError::MissingEndpoint(chart.as_str().to_string()))?;
        let payload = self.client.get_json(url).await?;
        let spec = chart.build(&payload, self.localizer.as_ref(), &mut rand::thread_rng())?;
        self.surface.create(chart.as_str(), spec)
    }

    /// Run all six loaders concurrently and wait for every one to settle.
    pub async fn load_charts(&self) -> CycleReport {
        let loads = ChartId::ALL.iter().map(|&chart| async move {
            let result = self.load_chart(chart).await;
            if let Err(e) = &result {
                log_load_failure(chart.as_str(), &e.to_string());
            }
            LoadOutcome { chart, result }
        });
        CycleReport {
            outcomes: join_all(loads).await,
        }
    }

    /// Replace every configured slot with a fresh empty one, then reload.
    pub async fn refresh_charts(&self) -> CycleReport {
        for id in self.config.endpoints.ids() {
            let reset = self.surface.destroy(id).and_then(|_| self.surface.mount(id));
            if let Err(e) = reset {
                log(
                    Level::Error,
                    Domain::Surface,
                    "reset_failed",
                    obj(&[("chart", v_str(id)), ("error", v_str(&e.to_string()))]),
                );
            }
        }
        self.load_charts().await
    }

    /// Start refreshing every `config.refresh_every`.
    ///
    /// A cycle still running when the next tick fires is dropped, cancelling
    /// its pending requests, before the next teardown begins.
    pub fn spawn_refresh(self: Arc<Self>) -> RefreshHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let period = self.config.refresh_every.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cycle: u64 = 0;
            let mut tick_pending = false;

            loop {
                if !tick_pending {
                    tokio::select! {
                        _ = ticker.tick() => {}
                        _ = stop_rx.changed() => break,
                    }
                }
                tick_pending = false;
                cycle += 1;
                let started = Instant::now();

                let refresh = self.refresh_charts();
                tokio::pin!(refresh);
                tokio::select! {
                    report = &mut refresh => {
                        log_cycle(
                            cycle,
                            report.loaded().count(),
                            report.failures().count(),
                            started.elapsed().as_millis() as u64,
                        );
                    }
                    _ = ticker.tick() => {
                        log(
                            Level::Warn,
                            Domain::Refresh,
                            "cycle_abandoned",
                            obj(&[("cycle", json!(cycle))]),
                        );
                        tick_pending = true;
                    }
                    _ = stop_rx.changed() => break,
                }
            }
            log(Level::Info, Domain::Refresh, "stopped", obj(&[("cycle", json!(cycle))]));
        });

        RefreshHandle { stop_tx, task }
    }
}

/// Owns the periodic refresh task. Dropping the handle stops the task too.
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop refreshing and wait for the task to exit. An in-flight cycle is cancelled.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
