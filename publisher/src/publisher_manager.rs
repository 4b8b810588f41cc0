use dashmap::DashMap;
use std::cmp::Eq;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::publisher::{Publishable, Publisher};
use common::traits::publisher::Notifiable;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PublisherError {
    #[error("Publisher doesnt exist")]
    PublisherNotFound,
    #[error("Listener Id not found")]
    ListenerNotFound,
}

/// Manages one [`Publisher`] per publisher type `S` (for instance one per sensor kind)
/// and remembers which publisher every listener id belongs to, so listeners can be
/// removed by id alone.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use common::types::{SensorEvent, SensorKind};
/// use publisher::{Listener, PublisherManager};
///
/// let manager = PublisherManager::<SensorEvent, SensorKind>::new(&[SensorKind::Light]);
///
/// let mut listener = Listener::new(|_id: Uuid, event: Arc<SensorEvent>| {
///     println!("lux: {:?}", event.values);
/// });
/// let id = manager.add_listener(&mut listener, &SensorKind::Light).unwrap();
///
/// manager.notify_listeners(SensorKind::Light, Arc::new(SensorEvent::new(5, vec![120.0], 0)));
/// manager.remove_listener(id).unwrap();
/// ```
pub struct PublisherManager<T, S> {
    publishers: Arc<DashMap<S, Publisher<T>>>,
    control: Arc<DashMap<Uuid, S>>,
}

impl<T, S> Clone for PublisherManager<T, S> {
    fn clone(&self) -> Self {
        Self {
            publishers: self.publishers.clone(),
            control: self.control.clone(),
        }
    }
}

impl<T, S> PublisherManager<T, S>
where
    T: Send + Sync + 'static,
    S: Send + Sync + Hash + Eq + Clone + Into<usize>,
{
    pub fn new(publisher_types: &[S]) -> Self {
        let collection = DashMap::<S, Publisher<T>>::new();
        for publisher_type in publisher_types {
            collection.insert(publisher_type.clone(), Publisher::new());
        }

        Self {
            publishers: Arc::new(collection),
            control: Arc::new(DashMap::new()),
        }
    }

    /// Publisher types sorted by their index.
    pub fn get_available_publisher_types(&self) -> Vec<S> {
        let mut publisher_types: Vec<S> = self
            .publishers
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        publisher_types.sort_by_key(|publisher_type| Into::<usize>::into(publisher_type.clone()));
        publisher_types
    }

    pub fn add_listener(
        &self,
        listener: &mut dyn Notifiable<T>,
        publisher_type: &S,
    ) -> Result<Uuid, PublisherError> {
        let publisher = self
            .publishers
            .get(publisher_type)
            .ok_or(PublisherError::PublisherNotFound)?;
        let id = publisher.register_listener(listener);
        self.control.insert(id, publisher_type.clone());
        Ok(id)
    }

    /// Removes a listener and returns the publisher type it was attached to.
    pub fn remove_listener(&self, id: Uuid) -> Result<S, PublisherError> {
        let (_, publisher_type) = self
            .control
            .remove(&id)
            .ok_or(PublisherError::ListenerNotFound)?;
        let publisher = self
            .publishers
            .get(&publisher_type)
            .ok_or(PublisherError::PublisherNotFound)?;
        publisher.unregister_listener(id);
        Ok(publisher_type)
    }

    pub fn listener_count(&self, publisher_type: &S) -> usize {
        self.publishers
            .get(publisher_type)
            .map_or(0, |publisher| publisher.len())
    }

    pub fn notify_listeners(&self, publisher_type: S, data: Arc<T>) {
        // clone the publisher out of the map so callbacks never run under a shard lock
        let publisher = self
            .publishers
            .get(&publisher_type)
            .map(|entry| entry.value().clone());
        if let Some(publisher) = publisher {
            publisher.notify_listeners(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Listener;
    use common::types::{SensorEvent, SensorKind};
    use std::sync::Mutex;

    fn counting_listener(counter: Arc<Mutex<usize>>) -> Listener<SensorEvent> {
        Listener::new(move |_id: Uuid, _event: Arc<SensorEvent>| {
            *counter.lock().unwrap() += 1;
        })
    }

    #[test]
    fn test_available_publisher_types_are_sorted() {
        let manager = PublisherManager::<SensorEvent, SensorKind>::new(&[
            SensorKind::Humidity,
            SensorKind::Gyroscope,
            SensorKind::Light,
        ]);
        assert_eq!(
            manager.get_available_publisher_types(),
            vec![SensorKind::Light, SensorKind::Gyroscope, SensorKind::Humidity]
        );
    }

    #[test]
    fn test_add_listener_to_nonexistent_publisher() {
        let manager = PublisherManager::<SensorEvent, SensorKind>::new(&[]);
        let mut listener = counting_listener(Arc::new(Mutex::new(0)));
        assert_eq!(
            manager.add_listener(&mut listener, &SensorKind::Accelerometer),
            Err(PublisherError::PublisherNotFound)
        );
    }

    #[test]
    fn test_notify_routes_by_type() {
        let manager = PublisherManager::<SensorEvent, SensorKind>::new(&[
            SensorKind::Light,
            SensorKind::Proximity,
        ]);
        let light_count = Arc::new(Mutex::new(0));
        let proximity_count = Arc::new(Mutex::new(0));
        manager
            .add_listener(&mut counting_listener(light_count.clone()), &SensorKind::Light)
            .unwrap();
        manager
            .add_listener(
                &mut counting_listener(proximity_count.clone()),
                &SensorKind::Proximity,
            )
            .unwrap();

        let event = Arc::new(SensorEvent::new(5, vec![1.0], 0));
        manager.notify_listeners(SensorKind::Light, event.clone());
        manager.notify_listeners(SensorKind::Light, event.clone());
        manager.notify_listeners(SensorKind::Humidity, event);

        assert_eq!(*light_count.lock().unwrap(), 2);
        assert_eq!(*proximity_count.lock().unwrap(), 0);
    }

    #[test]
    fn test_remove_listener() {
        let manager = PublisherManager::<SensorEvent, SensorKind>::new(&[SensorKind::Light]);
        let mut listener = counting_listener(Arc::new(Mutex::new(0)));
        let id = manager.add_listener(&mut listener, &SensorKind::Light).unwrap();
        assert_eq!(manager.listener_count(&SensorKind::Light), 1);

        assert_eq!(manager.remove_listener(id), Ok(SensorKind::Light));
        assert_eq!(manager.listener_count(&SensorKind::Light), 0);
        assert_eq!(
            manager.remove_listener(id),
            Err(PublisherError::ListenerNotFound)
        );
    }
}
