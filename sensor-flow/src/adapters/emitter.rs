use log::{debug, error};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::errors::SensorError;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Background thread that calls `tick` once per period until stopped.
///
/// The thread waits on a stop channel rather than sleeping, so stopping wakes it at once.
pub(crate) struct Emitter {
    name: String,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Emitter {
    pub(crate) fn spawn<F>(name: &str, period: Duration, mut tick: F) -> Result<Self, SensorError>
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => tick(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(SensorError::WorkerSpawn)?;
        debug!("Emitter {} started", name);

        Ok(Self {
            name: name.to_string(),
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Stops the thread and waits for the tick in progress, if any.
    pub(crate) fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                error!("Emitter {} panicked", self.name);
            } else {
                debug!("Emitter {} stopped", self.name);
            }
        }
    }
}

impl Drop for Emitter {
    fn drop(&mut self) {
        self.stop();
    }
}
