//! Wiring of store, service, router, dispatcher, and middleware.

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;
use crate::dispatcher::Dispatcher;
use crate::middleware::{MetricsMiddleware, TracingMiddleware};
use crate::model::Item;
use crate::router::Router;
use crate::routes::item_routes;
use crate::schema::create_item_input;
use crate::server::AppService;
use crate::service::ItemService;
use crate::store::MemoryStore;
use crate::validator::validate;

/// A fully assembled application, ready to be served
pub struct App {
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Arc<MetricsMiddleware>,
}

impl App {
    /// Build the application described by `config`.
    ///
    /// # Errors
    ///
    /// Fails on duplicate seed ids, a seed item whose name breaks the create
    /// contract, a rejected routing table, or an output schema that does not
    /// compile.
    pub fn build(config: &ServiceConfig) -> anyhow::Result<Self> {
        check_seed(&config.seed).context("failed to seed the item store")?;
        let store = MemoryStore::with_items(config.seed.iter().cloned())
            .context("failed to seed the item store")?;
        info!(seeded = config.seed.len(), "Item store ready");

        let service = ItemService::new(Arc::new(store));
        let router = Router::new(item_routes())?;

        let metrics = Arc::new(MetricsMiddleware::new());
        let mut dispatcher = Dispatcher::new(router, service)?
            .with_response_validation(config.validation.responses);
        dispatcher.add_middleware(Arc::new(TracingMiddleware));
        let metrics_mw: Arc<MetricsMiddleware> = Arc::clone(&metrics);
        dispatcher.add_middleware(metrics_mw);

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            metrics,
        })
    }

    /// The HTTP service for this application.
    #[must_use]
    pub fn http_service(&self) -> AppService {
        let mut service = AppService::new(Arc::clone(&self.dispatcher));
        service.set_metrics_middleware(Arc::clone(&self.metrics));
        service
    }
}

/// Seed items must satisfy the same contract as items created over HTTP.
fn check_seed(seed: &[Item]) -> anyhow::Result<()> {
    let contract = create_item_input();
    for item in seed {
        let value = serde_json::to_value(item)?;
        if let Err(violations) = validate(Some(&value), &contract) {
            let details: Vec<String> = violations.iter().map(ToString::to_string).collect();
            bail!("seed item '{}' is invalid: {}", item.id, details.join("; "));
        }
    }
    Ok(())
}
