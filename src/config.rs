use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::charts::ChartId;

/// Chart identifier to API URL, in document order. Immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartEndpointMap {
    entries: Vec<(String, String)>,
}

impl ChartEndpointMap {
    /// Parse the embedded `{"ChartId": "/url/", ...}` document.
    pub fn from_json(doc: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(doc).context("endpoint map is not valid JSON")?;
        let map = value
            .as_object()
            .ok_or_else(|| anyhow!("endpoint map must be a JSON object"))?;
        let mut entries = Vec::with_capacity(map.len());
        for (id, url) in map {
            let url = url
                .as_str()
                .ok_or_else(|| anyhow!("endpoint for {} must be a string", id))?;
            entries.push((id.clone(), url.to_string()));
        }
        Ok(Self { entries })
    }

    /// The routes the APM backend registers under `/apm/metrics/`.
    pub fn default_routes() -> Self {
        let entries = ChartId::ALL
            .iter()
            .map(|id| {
                let route = match id {
                    ChartId::RequestsCountByDate => "rc_date",
                    ChartId::RequestsViewNameCountToday => "rvnc_date",
                    ChartId::ResponseEllapsedTimeByDate => "ret_date",
                    ChartId::ResponseEllapsedTimeByView => "rvne_date",
                    ChartId::RequestsCountLast24Hours => "rch",
                    ChartId::ErrorsPerClassLastWeek => "epec",
                };
                (id.as_str().to_string(), format!("/apm/metrics/{}/", route))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, url)| url.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub endpoints: ChartEndpointMap,
    pub cookies: Option<String>,
    pub refresh_every: Duration,
    pub request_timeout: Option<Duration>,
    pub output_dir: PathBuf,
    pub locale_catalog: Option<PathBuf>,
}

impl Config {
    /// Defaults for a dashboard served from `base_url`.
    pub fn new(base_url: Url, endpoints: ChartEndpointMap) -> Self {
        Self {
            base_url,
            endpoints,
            cookies: None,
            refresh_every: Duration::from_secs(60),
            request_timeout: None,
            output_dir: PathBuf::from("out/charts"),
            locale_catalog: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let base = std::env::var("APM_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/".to_string());
        let base_url = Url::parse(&base).with_context(|| format!("APM_BASE_URL {} is not a url", base))?;

        let endpoints = match (std::env::var("APM_API_URLS"), std::env::var("APM_API_URLS_FILE")) {
            (Ok(doc), _) => ChartEndpointMap::from_json(&doc).context("APM_API_URLS")?,
            (Err(_), Ok(path)) => {
                let doc = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading endpoint map {}", path))?;
                ChartEndpointMap::from_json(&doc).with_context(|| format!("parsing {}", path))?
            }
            _ => ChartEndpointMap::default_routes(),
        };

        let mut cfg = Self::new(base_url, endpoints);
        cfg.cookies = std::env::var("APM_COOKIES").ok().filter(|c| !c.is_empty());
        cfg.refresh_every = Duration::from_secs(
            std::env::var("REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(60),
        );
        // 0 means no timeout, same as unset
        cfg.request_timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs);
        if let Ok(dir) = std::env::var("OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(dir);
        }
        cfg.locale_catalog = std::env::var("APM_LOCALE_CATALOG").ok().map(PathBuf::from);
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_map_keeps_document_order() {
        let map = ChartEndpointMap::from_json(
            r#"{"RequestsCountLast24Hours": "/apm/metrics/rch/", "RequestsCountByDate": "/apm/metrics/rc_date/"}"#,
        )
        .unwrap();
        let ids: Vec<&str> = map.ids().collect();
        assert_eq!(ids, vec!["RequestsCountLast24Hours", "RequestsCountByDate"]);
        assert_eq!(map.get("RequestsCountByDate"), Some("/apm/metrics/rc_date/"));
        assert_eq!(map.get("Missing"), None);
    }

    #[test]
    fn test_endpoint_map_rejects_non_string_url() {
        assert!(ChartEndpointMap::from_json(r#"{"RequestsCountByDate": 3}"#).is_err());
        assert!(ChartEndpointMap::from_json(r#"["RequestsCountByDate"]"#).is_err());
    }

    #[test]
    fn test_default_routes_cover_every_chart() {
        let map = ChartEndpointMap::default_routes();
        assert_eq!(map.len(), ChartId::ALL.len());
        for id in ChartId::ALL {
            assert!(map.get(id.as_str()).unwrap().starts_with("/apm/metrics/"));
        }
    }

    const ENV_KEYS: [&str; 8] = [
        "APM_BASE_URL",
        "APM_API_URLS",
        "APM_API_URLS_FILE",
        "APM_COOKIES",
        "REFRESH_SECS",
        "REQUEST_TIMEOUT_SECS",
        "OUTPUT_DIR",
        "APM_LOCALE_CATALOG",
    ];

    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    /// Run `f` with exactly `vars` set among the keys `from_env` reads.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let out = f();
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
        out
    }

    #[test]
    fn test_from_env_defaults() {
        let cfg = with_env(&[], || Config::from_env().unwrap());
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(cfg.endpoints, ChartEndpointMap::default_routes());
        assert_eq!(cfg.refresh_every, Duration::from_secs(60));
        assert!(cfg.request_timeout.is_none());
        assert!(cfg.cookies.is_none());
        assert_eq!(cfg.output_dir, PathBuf::from("out/charts"));
        assert!(cfg.locale_catalog.is_none());
    }

    #[test]
    fn test_from_env_zero_durations_fall_back() {
        let cfg = with_env(&[("REFRESH_SECS", "0"), ("REQUEST_TIMEOUT_SECS", "0")], || {
            Config::from_env().unwrap()
        });
        assert_eq!(cfg.refresh_every, Duration::from_secs(60));
        assert!(cfg.request_timeout.is_none());
    }

    #[test]
    fn test_from_env_positive_durations() {
        let cfg = with_env(&[("REFRESH_SECS", "15"), ("REQUEST_TIMEOUT_SECS", "5")], || {
            Config::from_env().unwrap()
        });
        assert_eq!(cfg.refresh_every, Duration::from_secs(15));
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(5)));

        let cfg = with_env(&[("REFRESH_SECS", "soon")], || Config::from_env().unwrap());
        assert_eq!(cfg.refresh_every, Duration::from_secs(60));
    }

    #[test]
    fn test_from_env_empty_cookies_is_none() {
        let cfg = with_env(&[("APM_COOKIES", "")], || Config::from_env().unwrap());
        assert!(cfg.cookies.is_none());
        let cfg = with_env(&[("APM_COOKIES", "csrftoken=t")], || Config::from_env().unwrap());
        assert_eq!(cfg.cookies.as_deref(), Some("csrftoken=t"));
    }

    #[test]
    fn test_from_env_reads_endpoint_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("api_urls.json");
        std::fs::write(&path, r#"{"RequestsCountLast24Hours": "/custom/rch/"}"#).unwrap();
        let path_str = path.to_string_lossy().to_string();

        let cfg = with_env(&[("APM_API_URLS_FILE", path_str.as_str())], || Config::from_env().unwrap());
        assert_eq!(cfg.endpoints.len(), 1);
        assert_eq!(cfg.endpoints.get("RequestsCountLast24Hours"), Some("/custom/rch/"));
    }

    #[test]
    fn test_from_env_inline_map_wins_over_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("api_urls.json");
        std::fs::write(&path, r#"{"RequestsCountLast24Hours": "/from/file/"}"#).unwrap();
        let path_str = path.to_string_lossy().to_string();

        let cfg = with_env(
            &[
                ("APM_API_URLS", r#"{"ErrorsPerClassLastWeek": "/inline/epec/"}"#),
                ("APM_API_URLS_FILE", path_str.as_str()),
            ],
            || Config::from_env().unwrap(),
        );
        assert_eq!(cfg.endpoints.ids().collect::<Vec<_>>(), vec!["ErrorsPerClassLastWeek"]);
        assert_eq!(cfg.endpoints.get("ErrorsPerClassLastWeek"), Some("/inline/epec/"));
    }

    #[test]
    fn test_from_env_missing_endpoint_file_errors() {
        let res = with_env(&[("APM_API_URLS_FILE", "/nonexistent/api_urls.json")], Config::from_env);
        assert!(res.is_err());
    }

    #[test]
    fn test_new_defaults_to_one_minute_refresh() {
        let cfg = Config::new(Url::parse("http://localhost/").unwrap(), ChartEndpointMap::default());
        assert_eq!(cfg.refresh_every, Duration::from_secs(60));
        assert!(cfg.request_timeout.is_none());
    }
}
