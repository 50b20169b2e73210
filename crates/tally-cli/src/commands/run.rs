//! Event loop fed by JSON lines on stdin.
//!
//! Stands in for a messaging-platform client: one task reads and decodes
//! events, a single consumer applies them to the dispatcher one at a time.

use std::path::Path;

use anyhow::Result;
use tally_core::TrackerOptions;
use tally_core::command::{Dispatcher, InboundEvent, Reply};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::open_tracker;

pub async fn execute(data_dir: &Path, options: TrackerOptions) -> Result<()> {
    let mut dispatcher = Dispatcher::new(open_tracker(data_dir, options)?);

    // Channel from the stdin reader to the single event consumer
    let (event_tx, mut event_rx) = mpsc::channel::<InboundEvent>(100);

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut line_no = 0usize;
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<InboundEvent>(&line) {
                Ok(event) => {
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(line = line_no, error = %e, "Skipping malformed event"),
            }
        }
        Ok::<_, std::io::Error>(())
    });

    info!("Processing events from stdin");
    let mut stdout = tokio::io::stdout();
    let mut handled = 0usize;
    while let Some(event) = event_rx.recv().await {
        handled += 1;
        if let Some(reply) = dispatcher.handle(event) {
            write_reply(&mut stdout, &reply).await?;
        }
    }

    reader.await??;

    if let Err(e) = dispatcher.tracker_mut().compact() {
        error!(error = %e, "Final compaction failed; journal kept for next start");
    }
    info!(events = handled, "Event stream closed");
    Ok(())
}

async fn write_reply(stdout: &mut tokio::io::Stdout, reply: &Reply) -> Result<()> {
    let mut line = serde_json::to_string(reply)?;
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
