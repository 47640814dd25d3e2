//! [`EventSource`] that replays a recorded host trace.
//!
//! A trace is newline-delimited JSON, one [`HostEvent`] per line, in the
//! order the compositor delivered them:
//!
//! ```json
//! {"ScreenEdge":{"edge":"bottom","delta":{"width":0,"height":-90},"screen":{"x":0,"y":0,"width":1600,"height":900}}}
//! {"ScreenEdge":{"edge":"bottom"}}
//! {"ShowingDesktopChanged":true}
//! "ConfigChanged"
//! ```
//!
//! Blank lines are skipped and malformed lines are logged and dropped, so
//! a partially corrupted trace still replays.

use crate::event::HostEvent;
use crate::traits::EventSource;
use log::{debug, error, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc;

/// Replays [`HostEvent`]s from any buffered reader.
pub struct TraceReplay<R> {
    reader: R,
}

/// Errors produced while replaying a trace.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl<R: BufRead> TraceReplay<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl TraceReplay<BufReader<File>> {
    /// Open a trace file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let file = File::open(path.as_ref())?;
        info!("replaying {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead + Send> EventSource for TraceReplay<R> {
    type Error = ReplayError;

    /// Forward every well-formed line until the trace ends or the sink is
    /// dropped.
    fn run(&mut self, sink: mpsc::Sender<HostEvent>) -> Result<(), Self::Error> {
        let mut sent = 0usize;
        for (n, line) in (&mut self.reader).lines().enumerate() {
            let text = line?;
            if text.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HostEvent>(&text) {
                Ok(event) => {
                    debug!("line {}: {:?}", n + 1, event);
                    if sink.send(event).is_err() {
                        info!("sink closed, stopping replay");
                        return Ok(());
                    }
                    sent += 1;
                }
                Err(e) => error!("line {}: bad event {:?}: {}", n + 1, text, e),
            }
        }
        info!("replay finished, {} event(s)", sent);
        Ok(())
    }
}
