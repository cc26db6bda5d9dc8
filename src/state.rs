//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::engine::{CommandEngine, SharedEngine};
use crate::executor::BoundedExecutor;
use crate::health::HealthProbe;
use crate::pipeline::ConversionPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: ConversionPipeline,
    probe: HealthProbe,
}

impl AppState {
    /// Create application state around the given engine.
    ///
    /// The executor is sized from `config.render`; the probe shares the
    /// pipeline so self-tests go through the same worker slots as traffic.
    pub fn new(config: Config, engine: SharedEngine) -> Self {
        let executor = Arc::new(BoundedExecutor::from_config(&config.render));
        let pipeline = ConversionPipeline::new(executor, engine, config.render.timeout);
        let probe = HealthProbe::new(pipeline.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                probe,
            }),
        }
    }

    /// Create application state with the subprocess engine from config
    pub fn from_config(config: Config) -> Self {
        let engine: SharedEngine = Arc::new(CommandEngine::from_config(&config.render));
        Self::new(config, engine)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the conversion pipeline
    pub fn pipeline(&self) -> &ConversionPipeline {
        &self.inner.pipeline
    }

    /// Get the engine health probe
    pub fn probe(&self) -> &HealthProbe {
        &self.inner.probe
    }

    pub fn executor(&self) -> &BoundedExecutor {
        self.inner.pipeline.executor()
    }

    /// Stop accepting render jobs
    ///
    /// Renders already running are left to finish; they cannot be interrupted.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down application state...");
        self.executor().close();
    }
}
