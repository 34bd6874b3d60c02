//! Log-file follower.

use crate::utils::AppError;
use crate::watcher::Monitor;
use std::io::SeekFrom;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tracing::{debug, info};

/// Polling intervals for the follow loop.
#[derive(Debug, Clone)]
pub struct TailerConfig {
    /// How often to re-check for the log file while it does not exist yet.
    pub wait_poll: Duration,
    /// How long to sleep when no new content is available.
    pub read_poll: Duration,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            wait_poll: Duration::from_secs(2),
            read_poll: Duration::from_millis(200),
        }
    }
}

/// Follows a growing log file and feeds complete lines to the pipeline.
///
/// The file is opened once and read through an advancing offset; the
/// tailer never seeks backward or re-reads old content.
pub struct LogTailer {
    path: PathBuf,
    config: TailerConfig,
}

impl LogTailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, TailerConfig::default())
    }

    pub fn with_config(path: impl Into<PathBuf>, config: TailerConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Run the follow loop, feeding each complete line to `monitor`.
    ///
    /// Waits for the file to appear first. A file that already existed at
    /// startup is read from its end so historical content is never
    /// replayed; a file the tailer watched into existence is read from the
    /// beginning, since everything in it postdates the start of the tail.
    ///
    /// Only returns on I/O failure; the caller supervises.
    pub async fn run(&self, monitor: &mut Monitor) -> Result<(), AppError> {
        let existed_at_start = self.path.exists();
        while !self.path.exists() {
            debug!(path = %self.path.display(), "log file not present yet, waiting");
            tokio::time::sleep(self.config.wait_poll).await;
        }

        let file = File::open(&self.path).await?;
        let mut reader = BufReader::new(file);
        if existed_at_start {
            reader.seek(SeekFrom::End(0)).await?;
        }
        info!(
            path = %self.path.display(),
            from_start = !existed_at_start,
            "tailing log file"
        );

        let mut pending = String::new();
        loop {
            let read = reader.read_line(&mut pending).await?;
            if read == 0 {
                // At end of file; wait for the writer to append more.
                tokio::time::sleep(self.config.read_poll).await;
                continue;
            }
            if !pending.ends_with('\n') {
                // Partial line still being written; keep accumulating.
                continue;
            }
            monitor.handle_line(pending.trim_end()).await;
            pending.clear();
        }
    }
}
