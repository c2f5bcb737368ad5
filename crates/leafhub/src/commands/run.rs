//! `leafhub run`: change events in, status bundles out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use leafhub_config::Config;
use leafhub_core::sync::components::build_controllers;
use leafhub_core::{
    ChangeEvent, FileTransport, SharedAggregationLevel, StatusSyncController, Transport,
};

use crate::cli::{GlobalOpts, RunArgs};
use crate::error::CliError;

#[derive(Debug, Default)]
struct EventStats {
    dispatched: usize,
    malformed: usize,
}

impl RunArgs {
    /// Command-line flags win over file and environment.
    fn apply(self, cfg: &mut Config) {
        if let Some(events) = self.events {
            cfg.events = Some(events);
        }
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if let Some(name) = self.leaf_hub_name {
            cfg.leaf_hub_name = name;
        }
        if let Some(level) = self.aggregation_level {
            cfg.aggregation_level = level.into();
        }
        if let Some(secs) = self.sync_interval {
            cfg.sync_interval_secs = secs;
        }
    }
}

pub async fn handle(args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = leafhub_config::load_config(global.config.as_deref())?;
    args.apply(&mut cfg);
    let sync_config = cfg.to_sync_config()?;

    let file = Arc::new(FileTransport::open(&cfg.output_dir).await?);
    let transport: Arc<dyn Transport> = file.clone();
    let level = SharedAggregationLevel::new(sync_config.aggregation_level);
    let controllers = build_controllers(&sync_config, &transport, &level);

    let cancel = CancellationToken::new();
    let tasks: Vec<_> = controllers
        .iter()
        .map(|controller| tokio::spawn(Arc::clone(controller).run(cancel.clone())))
        .collect();

    let outcome = tokio::select! {
        result = read_events(cfg.events.as_deref(), &controllers) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
            Ok(EventStats::default())
        }
    };

    // Each loop performs a final sync once cancelled.
    cancel.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "status sync task failed");
        }
    }
    file.flush().await?;
    file.close().await;

    let stats = outcome?;
    info!(
        dispatched = stats.dispatched,
        malformed = stats.malformed,
        output_dir = %cfg.output_dir.display(),
        "event stream finished"
    );
    Ok(())
}

async fn read_events(
    source: Option<&Path>,
    controllers: &[Arc<StatusSyncController>],
) -> Result<EventStats, CliError> {
    match source {
        Some(path) if path != Path::new("-") => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|e| CliError::io(path, e))?;
            dispatch_lines(BufReader::new(file), path, controllers).await
        }
        _ => {
            dispatch_lines(BufReader::new(tokio::io::stdin()), Path::new("<stdin>"), controllers)
                .await
        }
    }
}

/// Feed every JSON line to the controllers. Blank lines are ignored and
/// malformed ones skipped with a warning.
async fn dispatch_lines<R: AsyncBufRead + Unpin>(
    reader: R,
    source: &Path,
    controllers: &[Arc<StatusSyncController>],
) -> Result<EventStats, CliError> {
    let mut stats = EventStats::default();
    let mut lines = reader.lines();
    let mut line_no = 0_usize;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| CliError::io(PathBuf::from(source), e))?
    {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<ChangeEvent>(line) {
            Ok(event) => {
                for controller in controllers {
                    controller.handle(&event);
                }
                stats.dispatched += 1;
            }
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed change event");
                stats.malformed += 1;
            }
        }
    }
    Ok(stats)
}
