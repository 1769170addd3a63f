use crate::config::DashboardConfig;
use crate::source::DataSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(config: DashboardConfig, source: Arc<dyn DataSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }
}
