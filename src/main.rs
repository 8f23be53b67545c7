use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;

use apm_dashboard::config::Config;
use apm_dashboard::dashboard::Dashboard;
use apm_dashboard::http::HttpJsonClient;
use apm_dashboard::i18n::{Catalog, Identity, Localizer};
use apm_dashboard::logging::{log, log_cycle, obj, v_num, v_str, Domain, Level};
use apm_dashboard::surface::JsonDirSurface;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env()?;

    let localizer: Arc<dyn Localizer + Send + Sync> = match &cfg.locale_catalog {
        Some(path) => Arc::new(Catalog::load(path)?),
        None => Arc::new(Identity),
    };
    let client = HttpJsonClient::from_config(&cfg).context("building http client")?;
    let surface = JsonDirSurface::open(&cfg.output_dir).context("opening output dir")?;

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("base_url", v_str(cfg.base_url.as_str())),
            ("charts", json!(cfg.endpoints.ids().collect::<Vec<_>>())),
            ("refresh_secs", v_num(cfg.refresh_every.as_secs_f64())),
            ("output_dir", v_str(&surface.dir().to_string_lossy())),
            ("cookies_set", json!(cfg.cookies.is_some())),
        ]),
    );

    let dashboard = Arc::new(Dashboard::new(cfg, Arc::new(client), Arc::new(surface), localizer));
    dashboard.mount_all().context("mounting chart slots")?;

    let started = std::time::Instant::now();
    let report = dashboard.load_charts().await;
    log_cycle(
        0,
        report.loaded().count(),
        report.failures().count(),
        started.elapsed().as_millis() as u64,
    );

    let refresher = dashboard.clone().spawn_refresh();
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    refresher.stop().await;

    log(Level::Info, Domain::System, "shutdown", obj(&[]));
    Ok(())
}
