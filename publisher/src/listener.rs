use std::sync::Arc;
use uuid::Uuid;

use common::traits::Notifiable;
use common::types::Callback;

/// Callback wrapper that can be registered in a [`Publisher`](crate::Publisher).
pub struct Listener<T> {
    callback: Callback<T>,
}

impl<T> Listener<T>
where
    T: Send + Sync + 'static,
{
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Uuid, Arc<T>) + Send + Sync + 'static,
    {
        Listener {
            callback: Arc::new(callback),
        }
    }
}

impl<T> Notifiable<T> for Listener<T> {
    fn get_callback(&self) -> Callback<T> {
        self.callback.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_new_listener() {
        let listener = Listener::new(|_id: Uuid, value: Arc<i32>| {
            assert_eq!(*value, 42);
        });

        let callback = listener.get_callback();
        callback(Uuid::new_v4(), Arc::new(42));
    }

    #[test]
    fn test_callbacks_share_state() {
        let data = Arc::new(Mutex::new(Vec::new()));
        let listener = Listener::new({
            let data = data.clone();
            move |_id: Uuid, value: Arc<Vec<i32>>| *data.lock().unwrap() = (*value).clone()
        });

        let first = listener.get_callback();
        let second = listener.get_callback();
        first(Uuid::new_v4(), Arc::new(vec![400]));
        assert_eq!(*data.lock().unwrap(), vec![400]);
        second(Uuid::new_v4(), Arc::new(vec![1, 2]));
        assert_eq!(*data.lock().unwrap(), vec![1, 2]);
    }
}
