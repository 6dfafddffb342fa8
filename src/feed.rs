//! Zone event feed.
//!
//! Zone transport events arrive as JSON lines, either from the stdout of a
//! configured companion command or from this process's stdin. Each line is
//! one event body carrying full zone snapshots; lines that fail to parse are
//! logged and skipped so one malformed event never stalls the feed.

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// One zone transport event from the core.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZoneEventBody {
    /// Full snapshot of all zones (initial subscription response).
    pub zones: Vec<Zone>,
    pub zones_added: Vec<Zone>,
    pub zones_changed: Vec<Zone>,
    /// Zone ids that disappeared.
    pub zones_removed: Vec<String>,
}

/// Transport state of one output zone.
#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    pub display_name: String,
    /// `"playing"`, `"paused"`, `"loading"`, or `"stopped"`.
    pub state: String,
    pub now_playing: Option<NowPlaying>,
}

/// The track a zone is currently playing.
#[derive(Debug, Clone, Deserialize)]
pub struct NowPlaying {
    pub three_line: ThreeLine,
    pub image_key: Option<String>,
    /// Track length in seconds.
    #[serde(default)]
    pub length: u64,
}

/// Song / artist / album display lines.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThreeLine {
    pub line1: String,
    pub line2: String,
    pub line3: String,
}

/// Spawn the event feed and return its receiver.
///
/// With a non-empty `feed_command` the command is launched through `sh -c`
/// and its stdout is read line by line; otherwise events are read from
/// stdin. The reader task ends when its input closes, which closes the
/// channel and lets the session loop drain and exit.
pub fn spawn(feed_command: &str) -> anyhow::Result<mpsc::Receiver<ZoneEventBody>> {
    let (tx, rx) = mpsc::channel(32);

    if feed_command.is_empty() {
        tracing::info!("Reading zone events from stdin");
        tokio::spawn(read_events(BufReader::new(tokio::io::stdin()), tx));
    } else {
        tracing::info!("Starting zone event feed: {}", feed_command);
        let mut child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(feed_command)
            .stdout(std::process::Stdio::piped())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("feed command has no stdout"))?;
        tokio::spawn(async move {
            read_events(BufReader::new(stdout), tx).await;
            match child.wait().await {
                Ok(status) => tracing::warn!("Zone event feed exited: {}", status),
                Err(e) => tracing::error!("Failed to reap zone event feed: {}", e),
            }
        });
    }

    Ok(rx)
}

/// Read JSON-line events from `reader` until EOF, forwarding parsed events.
async fn read_events<R>(reader: BufReader<R>, tx: mpsc::Sender<ZoneEventBody>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<ZoneEventBody>(line) {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Skipping malformed zone event: {}", e);
                    }
                }
            }
            Ok(None) => return,
            Err(e) => {
                tracing::error!("Zone event feed read error: {}", e);
                return;
            }
        }
    }
}
