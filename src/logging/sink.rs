//! Background log writer decoupled from its producers

use crate::errors::PricingError;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

#[derive(Debug, Default)]
struct SinkState {
    queue: VecDeque<String>,
    stopped: bool,
}

#[derive(Debug, Default)]
struct SinkShared {
    state: Mutex<SinkState>,
    ready: Condvar,
    written: AtomicU64,
    failed_writes: AtomicU64,
}

/// A single-consumer log writer.
///
/// Producers call [`AsyncLogSink::enqueue`], which only takes the queue lock; one background
/// thread pops messages in FIFO order and writes each as a line, flushing after every
/// message. The destination is owned by that thread and is dropped when it exits.
///
/// The consumer exits only once the sink is stopped *and* the queue is empty, and the stop
/// flag is flipped under the queue lock, so every message enqueued before [`stop`] is
/// written. Messages enqueued after `stop` may or may not reach the destination.
///
/// [`stop`]: AsyncLogSink::stop
#[derive(Debug)]
pub struct AsyncLogSink {
    shared: Arc<SinkShared>,
    consumer: Option<JoinHandle<()>>,
}

impl AsyncLogSink {
    /// Opens `path` in append mode (creating parent directories) and starts the consumer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PricingError> {
        let path = path.as_ref();
        let label = path.display().to_string();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PricingError::io(&label, e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PricingError::io(&label, e))?;

        Self::from_writer(file)
    }

    /// Starts a consumer writing into an arbitrary destination.
    pub fn from_writer<W>(writer: W) -> Result<Self, PricingError>
    where
        W: Write + Send + 'static,
    {
        let shared = Arc::new(SinkShared::default());
        let consumer_shared = Arc::clone(&shared);

        let consumer = thread::Builder::new()
            .name("log-sink".to_string())
            .spawn(move || consume(consumer_shared, LineWriter::new(writer)))
            .map_err(|e| PricingError::io("log-sink thread", e))?;

        Ok(Self {
            shared,
            consumer: Some(consumer),
        })
    }

    /// A sink that accepts every message and discards it
    pub fn discard() -> Result<Self, PricingError> {
        Self::from_writer(io::sink())
    }

    /// Queue a message for the background writer; never blocks on I/O
    pub fn enqueue(&self, message: impl Into<String>) {
        self.shared.state.lock().queue.push_back(message.into());
        self.shared.ready.notify_one();
    }

    /// Ask the consumer to exit once the queue has drained
    pub fn stop(&self) {
        self.shared.state.lock().stopped = true;
        self.shared.ready.notify_all();
    }

    /// Messages waiting to be written
    pub fn pending(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Messages successfully written so far
    pub fn written(&self) -> u64 {
        self.shared.written.load(Ordering::Acquire)
    }

    /// Messages the destination refused
    pub fn failed_writes(&self) -> u64 {
        self.shared.failed_writes.load(Ordering::Acquire)
    }

    /// Stops the sink, waits for the queue to drain and releases the destination.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop();
        if let Some(consumer) = self.consumer.take() {
            if consumer.join().is_err() {
                error!("log sink consumer panicked");
            }
        }
    }
}

impl Drop for AsyncLogSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn consume<W: Write>(shared: Arc<SinkShared>, mut writer: W) {
    loop {
        let message = {
            let mut state = shared.state.lock();
            while state.queue.is_empty() && !state.stopped {
                shared.ready.wait(&mut state);
            }
            match state.queue.pop_front() {
                Some(message) => message,
                // stopped and drained
                None => break,
            }
        };

        match writeln!(writer, "{message}").and_then(|_| writer.flush()) {
            Ok(()) => {
                shared.written.fetch_add(1, Ordering::AcqRel);
            }
            Err(e) => {
                shared.failed_writes.fetch_add(1, Ordering::AcqRel);
                warn!("log sink write failed: {}", e);
            }
        }
    }

    debug!(
        "log sink consumer exiting after {} messages",
        shared.written.load(Ordering::Acquire)
    );
}
