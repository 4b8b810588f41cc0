use std::sync::Arc;
use uuid::Uuid;

/// Listener callback: receives the id it was registered under and the shared payload.
pub type Callback<T> = Arc<dyn Fn(Uuid, Arc<T>) + Send + Sync>;
