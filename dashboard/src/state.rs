use futures::future;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use log::{debug, error, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use sensor_flow::SensorError;

/// Values a [`LiveState`] can hold.
pub trait StateValue: Clone + PartialEq + Send + Sync + 'static {}

impl<T> StateValue for T where T: Clone + PartialEq + Send + Sync + 'static {}

type Upstream<T> = Box<dyn Fn() -> Result<BoxStream<'static, T>, SensorError> + Send + Sync>;

#[derive(Default)]
struct Control {
    subscribers: usize,
    collector: Option<JoinHandle<()>>,
    // bumped on every (un)subscription; a stop timer only fires if it still matches
    generation: u64,
}

struct Shared<T: StateValue> {
    name: String,
    sender: watch::Sender<T>,
    upstream: Upstream<T>,
    stop_timeout: Duration,
    runtime: Handle,
    control: Mutex<Control>,
}

/// A current value fed by an upstream stream that is only collected while somebody
/// is subscribed.
///
/// * The first subscriber opens the upstream and starts a collector task.
/// * After the last subscriber leaves the collector keeps running for `stop_timeout`.
///   Subscribing again within that grace period keeps it alive; otherwise the collector
///   is cancelled and the upstream dropped.
/// * The current value survives stop/start cycles. Subscribers are only woken when the
///   value actually changes.
pub struct LiveState<T: StateValue> {
    shared: Arc<Shared<T>>,
}

impl<T: StateValue> Clone for LiveState<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: StateValue> LiveState<T> {
    /// Creates an idle state holding `initial`. `upstream` is called every time collection
    /// (re)starts.
    ///
    /// # Panics
    ///
    /// Outside the context of a tokio runtime.
    pub fn new<F>(name: &str, initial: T, stop_timeout: Duration, upstream: F) -> Self
    where
        F: Fn() -> Result<BoxStream<'static, T>, SensorError> + Send + Sync + 'static,
    {
        let (sender, _) = watch::channel(initial);
        Self {
            shared: Arc::new(Shared {
                name: name.to_string(),
                sender,
                upstream: Box::new(upstream),
                stop_timeout,
                runtime: Handle::current(),
                control: Mutex::new(Control::default()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn value(&self) -> T {
        self.shared.sender.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.lock_control().subscribers
    }

    /// True while the upstream is being collected, grace period included.
    pub fn is_collecting(&self) -> bool {
        self.shared
            .lock_control()
            .collector
            .as_ref()
            .is_some_and(|collector| !collector.is_finished())
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let receiver = self.shared.sender.subscribe();
        self.shared.acquire();
        Subscription {
            receiver,
            shared: self.shared.clone(),
        }
    }
}

impl<T: StateValue> Shared<T> {
    fn lock_control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(self: &Arc<Self>) {
        let mut control = self.lock_control();
        control.subscribers += 1;
        control.generation += 1;
        debug!("{}: {} subscriber(s)", self.name, control.subscribers);

        let running = control
            .collector
            .as_ref()
            .is_some_and(|collector| !collector.is_finished());
        if !running {
            control.collector = self.start_collector();
        }
    }

    fn start_collector(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut upstream = match (self.upstream)() {
            Ok(upstream) => upstream,
            Err(e) => {
                error!("{}: cannot open upstream: {}", self.name, e);
                return None;
            }
        };
        info!("{}: collector started", self.name);

        let shared = Arc::downgrade(self);
        Some(self.runtime.spawn(async move {
            while let Some(value) = upstream.next().await {
                let Some(state) = shared.upgrade() else {
                    break;
                };
                state.publish(value);
            }
        }))
    }

    fn publish(&self, value: T) {
        self.sender.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    fn release(self: &Arc<Self>) {
        let mut control = self.lock_control();
        control.subscribers = control.subscribers.saturating_sub(1);
        debug!("{}: {} subscriber(s)", self.name, control.subscribers);
        if control.subscribers > 0 {
            return;
        }
        control.generation += 1;
        let generation = control.generation;
        drop(control);

        let shared: Weak<Self> = Arc::downgrade(self);
        let stop_timeout = self.stop_timeout;
        self.runtime.spawn(async move {
            tokio::time::sleep(stop_timeout).await;
            if let Some(shared) = shared.upgrade() {
                shared.expire(generation).await;
            }
        });
    }

    async fn expire(&self, generation: u64) {
        let collector = {
            let mut control = self.lock_control();
            if control.generation != generation || control.subscribers > 0 {
                return;
            }
            control.collector.take()
        };
        if let Some(collector) = collector {
            info!(
                "{}: no subscribers for {:?}, collector stopped",
                self.name, self.stop_timeout
            );
            collector.abort();
            let _ = collector.await;
        }
    }
}

impl<T: StateValue> Drop for Shared<T> {
    fn drop(&mut self) {
        let control = self
            .control
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(collector) = control.collector.take() {
            collector.abort();
        }
    }
}

/// A subscriber of a [`LiveState`]. Dropping it unsubscribes.
pub struct Subscription<T: StateValue> {
    receiver: watch::Receiver<T>,
    shared: Arc<Shared<T>>,
}

impl<T: StateValue> Subscription<T> {
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Waits for the next change and returns the new value.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Stream starting with the current value, followed by every change.
    pub fn into_stream(mut self) -> BoxStream<'static, T> {
        let current = self.receiver.borrow_and_update().clone();
        stream::once(future::ready(current))
            .chain(stream::unfold(self, |mut subscription| async move {
                let value = subscription.changed().await?;
                Some((value, subscription))
            }))
            .boxed()
    }
}

impl<T: StateValue> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.shared.release();
    }
}
