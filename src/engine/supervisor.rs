use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{Instrument, error, info, info_span, warn};

use crate::config::PairSpec;
use crate::engine::runner::{PairRunner, PairSummary};
use crate::errors::{AppError, AppResult};
use crate::marketdata::feeds::FeedSource;
use crate::reporting::ReportSink;

#[derive(Debug)]
pub struct PairFailure {
    pub pair: String,
    pub error: AppError,
}

#[derive(Debug, Default)]
pub struct FanOutReport {
    pub finished: Vec<PairSummary>,
    pub failed: Vec<PairFailure>,
    pub cancelled: bool,
}

/// Runs one connector and tracker per configured pair. A failing pair is
/// logged and recorded; the remaining pairs keep running.
pub struct Supervisor<F, M> {
    source: Arc<F>,
    specs: Vec<PairSpec>,
    make_sink: M,
}

impl<F, M, K> Supervisor<F, M>
where
    F: FeedSource,
    M: Fn(&PairSpec) -> K,
    K: ReportSink,
{
    pub fn new(source: Arc<F>, specs: Vec<PairSpec>, make_sink: M) -> Self {
        Self {
            source,
            specs,
            make_sink,
        }
    }

    /// Waits for every pair to end, or for `shutdown` to resolve, in which
    /// case all pair tasks are aborted and their connections dropped.
    pub async fn run<S>(self, shutdown: S) -> FanOutReport
    where
        S: Future<Output = ()>,
    {
        let mut tasks = JoinSet::new();
        for spec in self.specs {
            let sink = (self.make_sink)(&spec);
            let source = self.source.clone();
            let span = info_span!("pair", symbol = %spec.pair, window = spec.window_size);
            tasks.spawn(
                async move {
                    let pair = spec.pair.to_string();
                    (pair, run_pair(source, spec, sink).await)
                }
                .instrument(span),
            );
        }
        info!(pairs = tasks.len(), "pair tasks started");

        let mut report = FanOutReport::default();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(running = tasks.len(), "shutdown requested, closing feeds");
                    tasks.shutdown().await;
                    report.cancelled = true;
                    break;
                }
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok((_, Ok(summary)))) => {
                        info!(pair = %summary.pair, "pair task finished");
                        report.finished.push(summary);
                    }
                    Some(Ok((pair, Err(error)))) => {
                        error!(pair = %pair, error = %error, "pair task failed");
                        report.failed.push(PairFailure { pair, error });
                    }
                    Some(Err(join_err)) => {
                        warn!(error = %join_err, "pair task aborted");
                        report.failed.push(PairFailure {
                            pair: "unknown".into(),
                            error: AppError::Other(join_err.to_string()),
                        });
                    }
                },
            }
        }
        report
    }
}

async fn run_pair<F, K>(source: Arc<F>, spec: PairSpec, sink: K) -> AppResult<PairSummary>
where
    F: FeedSource,
    K: ReportSink,
{
    let messages = source.open(&spec.pair).await?;
    PairRunner::new(spec.pair, spec.window_size, sink)
        .run(messages)
        .await
}
