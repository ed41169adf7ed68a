use crate::{config::Config, error, server};

pub async fn serve(config: &Config, address: Option<String>) {
    if let Err(e) = server::start_trigger_server(config, address).await {
        error!("Trigger server stopped. Err: {}", e);
    }
}
