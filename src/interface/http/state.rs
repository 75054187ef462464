use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::context::AppContext;
use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<AppContext>,
    pub settings: Settings,
    /// Present when a Prometheus recorder was installed at startup.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(ctx: AppContext, settings: Settings, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            ctx: Arc::new(ctx),
            settings,
            metrics,
        }
    }
}
