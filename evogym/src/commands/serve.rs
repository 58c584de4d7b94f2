use evogym_config::Config;
use tracing::info;

use crate::environment::{ConfigProvider, Provider};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let config_provider = ConfigProvider::new(&config)?;
    let provider = Provider::new(config_provider);

    info!(
        "Sending contact messages to {}",
        provider.email().config().endpoint()
    );
    provider.email().setup();

    provider.rest_server().serve().await
}
