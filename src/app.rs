use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::{PairSpec, Settings};
use crate::engine::Supervisor;
use crate::errors::{AppError, AppResult};
use crate::exchange::WsFeedSource;
use crate::reporting::StdoutSink;

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs every configured pair until the feeds end or Ctrl-C is received.
    pub async fn run(self) -> AppResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "unable to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    pub async fn run_until<S>(self, shutdown: S) -> AppResult<()>
    where
        S: Future<Output = ()>,
    {
        self.settings.validate()?;
        let specs = self.settings.pair_specs();
        let source = Arc::new(WsFeedSource::new(&self.settings.feed));
        let interval = self.settings.feed.interval.clone();

        info!(
            pairs = specs.len(),
            window = self.settings.tracker.window_size,
            interval = %interval,
            "starting moving-average feeds"
        );

        let report = Supervisor::new(source, specs, |_: &PairSpec| {
            StdoutSink::new(interval.clone())
        })
        .run(shutdown)
        .await;

        info!(
            finished = report.finished.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "all pair tasks ended"
        );

        if report.failed.is_empty() {
            Ok(())
        } else {
            for failure in &report.failed {
                error!(pair = %failure.pair, error = %failure.error, "pair failed");
            }
            Err(AppError::PairsFailed(report.failed.len()))
        }
    }
}
