//! Shared fixtures for HTTP tests
#![allow(dead_code)]

use std::time::Duration;

use axum_test::TestServer;
use pdf_api::config::Config;
use pdf_api::engine::SharedEngine;
use pdf_api::routes;
use pdf_api::state::AppState;

pub use pdf_api::engine::fake::{EchoLengthEngine, FixedEngine, FlakyEngine, GatedEngine};

pub fn test_config(workers: usize, queue_depth: usize, timeout: Duration) -> Config {
    let mut config = Config::default();
    config.render.workers = workers;
    config.render.queue_depth = queue_depth;
    config.render.timeout = timeout;
    config
}

pub fn state_with(engine: SharedEngine) -> AppState {
    AppState::new(test_config(2, 2, Duration::from_secs(5)), engine)
}

pub fn server_for(state: &AppState) -> TestServer {
    TestServer::new(routes::router(state.clone())).expect("test server")
}
