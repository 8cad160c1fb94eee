use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::controller::{Request, RequestToken};
use crate::error::FetchError;
use crate::models::{CountrySummary, HistoricalSeries, Metric, Region, Snapshot};

/// Result of one request, tagged with the token it was issued under.
#[derive(Debug)]
pub enum Event {
    Snapshot {
        token: RequestToken,
        region: Region,
        result: Result<Snapshot, FetchError>,
    },
    Countries {
        token: RequestToken,
        result: Result<Vec<CountrySummary>, FetchError>,
    },
    History {
        token: RequestToken,
        metric: Metric,
        result: Result<HistoricalSeries, FetchError>,
    },
    RefreshDue,
}

/// Performs `request` and wraps the outcome. Never fails: errors travel
/// inside the event.
pub async fn fetch_once(api: &ApiClient, request: Request) -> Event {
    match request {
        Request::Snapshot { token, region } => {
            let result = api.fetch_snapshot(&region).await;
            Event::Snapshot {
                token,
                region,
                result,
            }
        }
        Request::Countries { token } => Event::Countries {
            token,
            result: api.fetch_countries().await,
        },
        Request::History { token, metric } => Event::History {
            token,
            metric,
            result: api.fetch_historical().await,
        },
    }
}

/// Spawns each request as its own task on the runtime and reports back on
/// the event channel. In-flight tasks are never cancelled; the controller
/// discards what arrives late.
#[derive(Debug, Clone)]
pub struct Fetcher {
    api: ApiClient,
    events: mpsc::Sender<Event>,
    runtime: Handle,
}

impl Fetcher {
    pub fn new(api: ApiClient, events: mpsc::Sender<Event>, runtime: Handle) -> Self {
        Self {
            api,
            events,
            runtime,
        }
    }

    pub fn dispatch(&self, request: Request) -> JoinHandle<()> {
        let api = self.api.clone();
        let events = self.events.clone();
        debug!(?request, "dispatching request");
        self.runtime.spawn(async move {
            let event = fetch_once(&api, request).await;
            if events.send(event).await.is_err() {
                warn!("event receiver dropped");
            }
        })
    }

    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = Request>) {
        for request in requests {
            self.dispatch(request);
        }
    }
}

pub struct RefresherHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl RefresherHandle {
    pub async fn stop(self) -> Result<(), tokio::task::JoinError> {
        let _ = self.cancel_tx.send(());
        self.join.await
    }
}

/// Emits `Event::RefreshDue` every `interval`. The first tick is skipped
/// because the initial requests are issued at startup.
pub fn spawn_refresher(interval: Duration, events: mpsc::Sender<Event>) -> RefresherHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("refresher shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    if events.send(Event::RefreshDue).await.is_err() {
                        warn!("event receiver dropped, stopping refresher");
                        break;
                    }
                }
            }
        }
    });

    RefresherHandle { cancel_tx, join }
}
