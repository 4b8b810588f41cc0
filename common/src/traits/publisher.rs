use crate::types::Callback;

pub trait Notifiable<T>: Sync + Send {
    fn get_callback(&self) -> Callback<T>;
}
