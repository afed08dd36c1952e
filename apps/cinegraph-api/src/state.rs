use std::sync::Arc;

use cinegraph_service::CinegraphService;
use cinegraph_store::SparqlStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CinegraphService>,
	pub auth_token: Option<String>,
}
impl AppState {
	pub fn new(config: cinegraph_config::Config) -> color_eyre::Result<Self> {
		let auth_token = config.security.api_auth_token.clone();
		let store = SparqlStore::new(&config.storage.graphdb)?;
		let service = CinegraphService::new(config, store);

		Ok(Self { service: Arc::new(service), auth_token })
	}
}
