use std::sync::Arc;
use std::time::Duration;

use crate::agent_service::AgentServiceClient;
use crate::config::Config;
use crate::relay::RelayGateway;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<RelayGateway<AgentServiceClient>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let relay_config = &config.relay_config;
        let client = AgentServiceClient::new(Duration::from_secs(relay_config.request_timeout_secs))?;
        let gateway = Arc::new(RelayGateway::new(
            relay_config.base_url().map(str::to_string),
            client,
        ));

        Ok(Self { config, gateway })
    }
}
