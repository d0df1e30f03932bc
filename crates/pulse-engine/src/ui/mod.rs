pub mod notify;

pub use notify::{ModalRequest, Notification, Notifier, NotifyLevel};
