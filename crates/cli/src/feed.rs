//! Change feeds - how host events reach the engine.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use teamdeps_core::ChangeEvent;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

/// An ordered source of change events, one JSON object per line.
///
/// Exactly one consumer drains a feed, one event at a time, which is
/// what gives the engine its no-overlap guarantee.
#[async_trait]
pub trait ChangeFeed: Send {
    /// Next event, or `None` when the feed is exhausted.
    async fn next_event(&mut self) -> Result<Option<ChangeEvent>>;
}

async fn next_from_lines<R>(lines: &mut Lines<R>) -> Result<Option<ChangeEvent>>
where
    R: AsyncBufRead + Send + Unpin,
{
    loop {
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(event) => return Ok(Some(event)),
            Err(err) => {
                // A malformed line must not stall the rest of the feed.
                warn!("skipping malformed event line: {err}");
            }
        }
    }
}

/// JSON-lines feed read from a file.
pub struct FileFeed {
    lines: Lines<BufReader<File>>,
}

impl FileFeed {
    /// Open a feed file.
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).await?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }
}

#[async_trait]
impl ChangeFeed for FileFeed {
    async fn next_event(&mut self) -> Result<Option<ChangeEvent>> {
        next_from_lines(&mut self.lines).await
    }
}

/// JSON-lines feed read from standard input.
pub struct StdinFeed {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinFeed {
    /// Attach to stdin.
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl ChangeFeed for StdinFeed {
    async fn next_event(&mut self) -> Result<Option<ChangeEvent>> {
        next_from_lines(&mut self.lines).await
    }
}
