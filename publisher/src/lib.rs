//! # Crate publisher
//!
//! ## publisher
//!
//! The `publisher` crate provides a mechanism for registering and notifying listeners
//! of new events of type `T`.
//!
//! Listeners wrap a callback (`Fn(Uuid, Arc<T>)`). Every registered listener receives
//! each notified event, on the thread that calls `notify_listeners`.
//!
//! ### Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use publisher::{Listener, Publishable, Publisher};
//! use uuid::Uuid;
//!
//! let publisher = Publisher::<String>::new();
//! let received = Arc::new(Mutex::new(Vec::new()));
//!
//! // Register a listener
//! let mut listener = Listener::new({
//!     let received = received.clone();
//!     move |_id: Uuid, data: Arc<String>| received.lock().unwrap().push((*data).clone())
//! });
//! let listener_id = publisher.register_listener(&mut listener);
//!
//! // Notify all listeners
//! publisher.notify_listeners(Arc::new("Hello, World!".to_string()));
//!
//! // Unregister the listener
//! publisher.unregister_listener(listener_id);
//!
//! assert!(publisher.is_empty());
//! assert_eq!(*received.lock().unwrap(), vec!["Hello, World!".to_string()]);
//! ```

pub mod listener;
mod publisher;
mod publisher_manager;

pub use listener::Listener;
pub use publisher::{Publishable, Publisher};
pub use publisher_manager::{PublisherError, PublisherManager};
