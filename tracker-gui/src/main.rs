mod app;
mod widgets;

use std::sync::Arc;

use eframe::{egui, NativeOptions};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracker_core::{spawn_refresher, ApiClient, Fetcher, TrackerConfig};

use crate::app::{AppInit, TrackerApp};

fn main() -> eframe::Result<()> {
    init_tracing();

    let runtime = Arc::new(Runtime::new().expect("failed to initialise Tokio runtime"));
    let config = TrackerConfig::load();
    let api = match ApiClient::new(config.api.clone()) {
        Ok(api) => api,
        Err(err) => {
            error!(error = %err, base_url = %config.api.base_url, "failed to build API client");
            std::process::exit(1);
        }
    };

    let (event_tx, event_rx) = mpsc::channel(64);
    let fetcher = Fetcher::new(api, event_tx.clone(), runtime.handle().clone());

    let refresher = config.api.refresh_interval().map(|interval| {
        let guard = runtime.enter();
        let handle = spawn_refresher(interval, event_tx);
        drop(guard);
        handle
    });

    let init = AppInit {
        runtime: runtime.clone(),
        fetcher,
        events: event_rx,
        refresher,
        config,
    };

    eframe::run_native(
        "Covid-19 Tracker",
        NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 800.0])
                .with_min_inner_size([900.0, 600.0]),
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(TrackerApp::new(init))),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
