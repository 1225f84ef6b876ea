use std::sync::Arc;

use crate::config::Config;
use crate::matching::semantic::{HashedEncoder, SemanticEncoder};
use crate::training::{ModelRegistry, Trainer};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model lifecycle. Handlers take a scorer snapshot per request.
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    /// Wires the default encoder into trainer and registry. The registry starts
    /// `Uninitialized`; call `bootstrap` before serving.
    pub fn new(config: Config) -> Self {
        let encoder: Arc<dyn SemanticEncoder> = Arc::new(HashedEncoder::default());
        let trainer = Trainer::new(config.training_config(), Arc::clone(&encoder));
        let registry = Arc::new(ModelRegistry::new(trainer, encoder));
        Self { config, registry }
    }
}
