//! Buffered file sink
//!
//! Append-only JSON-lines sink that amortizes write syscalls. Serialized
//! records queue in memory and flush on one of two triggers: the queue
//! reaching a size threshold, or no record arriving for an idle interval.
//! The idle timer is a debounce: every non-flushing append restarts it.

use crate::core::{NormalizeMode, Normalizer, Record, Result, Sink};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const DEFAULT_FLUSH_SIZE: usize = 10;
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Queue and writer share one mutex: appends and flushes serialize, so a
/// flush only ever contains records accepted before it began.
struct BufferState {
    queue: Vec<String>,
    writer: BufWriter<File>,
}

pub struct BufferedFileSink {
    normalizer: Normalizer,
    state: Arc<Mutex<BufferState>>,
    flush_size: usize,
    rearm: Option<Sender<()>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl BufferedFileSink {
    pub fn new(path: impl Into<PathBuf>, normalizer: Normalizer) -> Result<Self> {
        Self::with_policy(path, normalizer, DEFAULT_FLUSH_SIZE, DEFAULT_FLUSH_TIMEOUT)
    }

    pub fn with_policy(
        path: impl Into<PathBuf>,
        normalizer: Normalizer,
        flush_size: usize,
        flush_timeout: Duration,
    ) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let state = Arc::new(Mutex::new(BufferState {
            queue: Vec::new(),
            writer: BufWriter::new(file),
        }));

        let (rearm, signals) = unbounded();
        let worker_state = Arc::clone(&state);
        let worker = thread::Builder::new()
            .name("service-logger-flush".to_string())
            .spawn(move || idle_flush_loop(&signals, &worker_state, flush_timeout))?;

        Ok(Self {
            normalizer,
            state,
            flush_size: flush_size.max(1),
            rearm: Some(rearm),
            worker: Some(worker),
        })
    }

    fn flush_locked(state: &mut BufferState) -> Result<()> {
        if state.queue.is_empty() {
            return Ok(());
        }
        let lines = std::mem::take(&mut state.queue);
        for line in &lines {
            state.writer.write_all(line.as_bytes())?;
            state.writer.write_all(b"\n")?;
        }
        state.writer.flush()?;
        Ok(())
    }
}

/// Each signal opens an idle window; further signals restart it and a
/// quiet expiry flushes whatever is buffered.
fn idle_flush_loop(signals: &Receiver<()>, state: &Arc<Mutex<BufferState>>, timeout: Duration) {
    while signals.recv().is_ok() {
        loop {
            match signals.recv_timeout(timeout) {
                Ok(()) => continue,
                Err(RecvTimeoutError::Timeout) => {
                    let mut state = state.lock();
                    if let Err(e) = BufferedFileSink::flush_locked(&mut state) {
                        eprintln!("[service_logger] file sink flush failed: {}", e);
                    }
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}

impl Sink for BufferedFileSink {
    fn write(&self, record: Record, mode: NormalizeMode) -> Result<()> {
        let record = match self.normalizer.apply(record, mode) {
            Ok(record) => record,
            Err(e) => {
                eprintln!("[service_logger] dropped record after normalization failure: {}", e);
                return Ok(());
            }
        };
        let line = serde_json::to_string(&record)?;

        let mut state = self.state.lock();
        state.queue.push(line);
        if state.queue.len() >= self.flush_size {
            // size trigger; a pending idle window finds an empty queue
            Self::flush_locked(&mut state)?;
        } else {
            drop(state);
            if let Some(rearm) = &self.rearm {
                let _ = rearm.send(());
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Self::flush_locked(&mut self.state.lock())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for BufferedFileSink {
    fn drop(&mut self) {
        // Best-effort drain: stop the idle worker, then write what's left.
        drop(self.rearm.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        let _ = self.flush();
    }
}
