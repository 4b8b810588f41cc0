use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use common::traits::Notifiable;
use common::types::Callback;

pub trait Publishable<T> {
    fn register_listener(&self, listener: &mut dyn Notifiable<T>) -> Uuid;
    fn unregister_listener(&self, listener_id: Uuid) -> bool;
    fn notify_listeners(&self, data: Arc<T>);
}

/// Record of registered listeners that will be notified of updates
pub struct Publisher<T> {
    listeners: Arc<DashMap<Uuid, Callback<T>>>,
}

// clones share the same listeners, whatever `T` is
impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Publisher<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
        }
    }

    /// Returns number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listeners registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Publishable<T> for Publisher<T>
where
    T: Send + Sync + 'static,
{
    fn register_listener(&self, listener: &mut dyn Notifiable<T>) -> Uuid {
        let callback = listener.get_callback();
        let listener_id = Uuid::new_v4();
        self.listeners.insert(listener_id, callback);
        listener_id
    }

    fn unregister_listener(&self, listener_id: Uuid) -> bool {
        self.listeners.remove(&listener_id).is_some()
    }

    /// Calls each registered listener with the provided data. Callbacks run outside
    /// the registry lock, so a listener may unregister itself while being notified.
    fn notify_listeners(&self, data: Arc<T>) {
        let listeners: Vec<(Uuid, Callback<T>)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        for (id, callback) in listeners {
            callback(id, data.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::Listener;
    use std::sync::Mutex;

    struct TestHandler {
        data: Arc<Mutex<i32>>,
    }

    impl TestHandler {
        fn new() -> Self {
            Self {
                data: Arc::new(Mutex::new(0)),
            }
        }

        fn handle(&self, _id: Uuid, value: Arc<i32>) {
            let mut data = self.data.lock().unwrap();
            *data = *value;
        }
    }

    #[test]
    fn test_publisher_initialization() {
        let publisher = Publisher::<i32>::new();
        assert!(publisher.is_empty());
        assert_eq!(publisher.len(), 0);
    }

    #[test]
    fn test_register_and_notify_listener() {
        let publisher = Publisher::new();
        let handler = Arc::new(TestHandler::new());

        let mut listener = Listener::new({
            let handler = handler.clone();
            move |id: Uuid, value| {
                handler.handle(id, value);
            }
        });

        publisher.register_listener(&mut listener);
        assert_eq!(publisher.len(), 1);
        publisher.notify_listeners(Arc::new(42));

        assert_eq!(*handler.data.lock().unwrap(), 42);
    }

    #[test]
    fn test_unregister_listener() {
        let publisher = Publisher::new();
        let handler = Arc::new(TestHandler::new());

        let mut listener = Listener::new({
            let handler = handler.clone();
            move |id: Uuid, value| handler.handle(id, value)
        });

        let listener_id = publisher.register_listener(&mut listener);
        assert!(publisher.unregister_listener(listener_id));
        assert!(!publisher.unregister_listener(listener_id));
        publisher.notify_listeners(Arc::new(100));

        // Should remain unchanged since listener was removed
        assert_eq!(*handler.data.lock().unwrap(), 0);
    }

    #[test]
    fn test_notify_all_listeners() {
        let publisher = Publisher::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..3 {
            let received = received.clone();
            let mut listener = Listener::new(move |_id: Uuid, value: Arc<i32>| {
                received.lock().unwrap().push(*value);
            });
            publisher.register_listener(&mut listener);
        }
        publisher.notify_listeners(Arc::new(7));

        assert_eq!(*received.lock().unwrap(), vec![7, 7, 7]);
    }

    #[test]
    fn test_listener_can_unregister_itself() {
        let publisher = Arc::new(Publisher::<i32>::new());
        let mut listener = Listener::new({
            let publisher = publisher.clone();
            move |id: Uuid, _value: Arc<i32>| {
                publisher.unregister_listener(id);
            }
        });
        publisher.register_listener(&mut listener);
        publisher.notify_listeners(Arc::new(1));
        assert!(publisher.is_empty());
    }

    #[test]
    fn test_clone_shares_listeners() {
        // payloads that are not `Clone` themselves
        struct Reading(f32);

        let publisher = Publisher::<Reading>::new();
        let copy = publisher.clone();
        let received = Arc::new(Mutex::new(Vec::new()));
        let mut listener = Listener::new({
            let received = received.clone();
            move |_id: Uuid, reading: Arc<Reading>| received.lock().unwrap().push(reading.0)
        });
        publisher.register_listener(&mut listener);

        copy.notify_listeners(Arc::new(Reading(2.5)));
        assert_eq!(copy.len(), 1);
        assert_eq!(*received.lock().unwrap(), vec![2.5]);
    }
}
