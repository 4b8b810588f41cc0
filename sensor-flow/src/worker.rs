use log::{debug, error};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{self, UnboundedSender, WeakUnboundedSender};

use crate::errors::SensorError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Dedicated background thread that runs posted jobs one after the other.
///
/// Every sensor owns one worker while it is listening, so hardware callbacks of a sensor
/// are always delivered in order and never on the caller's thread.
pub struct SensorWorker {
    name: String,
    sender: Option<UnboundedSender<Job>>,
    handle: Option<JoinHandle<()>>,
}

/// Cheap, cloneable way to post jobs to a [`SensorWorker`].
///
/// Handles do not keep the worker alive: once the worker quits, posting fails.
#[derive(Clone)]
pub struct WorkerHandle {
    sender: WeakUnboundedSender<Job>,
}

impl WorkerHandle {
    /// Enqueues `job`. Returns false when the worker has already quit.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.sender.upgrade() {
            Some(sender) => sender.send(Box::new(job)).is_ok(),
            None => false,
        }
    }
}

impl SensorWorker {
    /// Starts a new worker thread called `name`.
    pub fn spawn(name: &str) -> Result<Self, SensorError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    job();
                }
            })
            .map_err(SensorError::WorkerSpawn)?;
        debug!("Worker {} started", name);

        Ok(Self {
            name: name.to_string(),
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> WorkerHandle {
        WorkerHandle {
            sender: self
                .sender
                .as_ref()
                .map(UnboundedSender::downgrade)
                .unwrap_or_else(|| mpsc::unbounded_channel::<Job>().0.downgrade()),
        }
    }

    /// Enqueues `job`. Returns false when the worker has already quit.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .as_ref()
            .is_some_and(|sender| sender.send(Box::new(job)).is_ok())
    }

    /// Stops accepting jobs, runs the ones already queued and waits for the thread to end.
    pub fn quit_safely(mut self) {
        self.quit();
    }

    fn quit(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            // a job may drop the worker from its own thread; joining there would deadlock
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                error!("Worker {} panicked", self.name);
            } else {
                debug!("Worker {} stopped", self.name);
            }
        }
    }
}

impl Drop for SensorWorker {
    fn drop(&mut self) {
        self.quit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc as std_mpsc, Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_jobs_run_in_order_on_worker_thread() {
        let worker = SensorWorker::spawn("SensorThread-test").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen = seen.clone();
            assert!(worker.post(move || {
                let name = thread::current().name().map(str::to_string);
                seen.lock().unwrap().push((i, name));
            }));
        }
        worker.quit_safely();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        for (idx, (i, name)) in seen.iter().enumerate() {
            assert_eq!(*i, idx);
            assert_eq!(name.as_deref(), Some("SensorThread-test"));
        }
    }

    #[test]
    fn test_handle_does_not_keep_worker_alive() {
        let worker = SensorWorker::spawn("SensorThread-handle").unwrap();
        let handle = worker.handle();
        let (tx, rx) = std_mpsc::channel();

        assert!(handle.post(move || tx.send(1).unwrap()));
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), 1);

        worker.quit_safely();
        assert!(!handle.post(|| {}));
    }

    #[test]
    fn test_queued_jobs_run_before_quit() {
        let worker = SensorWorker::spawn("SensorThread-drain").unwrap();
        let counter = Arc::new(Mutex::new(0));
        for _ in 0..100 {
            let counter = counter.clone();
            worker.post(move || *counter.lock().unwrap() += 1);
        }
        drop(worker);
        assert_eq!(*counter.lock().unwrap(), 100);
    }
}
