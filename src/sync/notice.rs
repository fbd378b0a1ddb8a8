//! Transient notifications for the view layer.
//!
//! Stores publish a notice when a request fails or a write succeeds. Views
//! subscribe and show them as toasts; nobody has to be listening.

use tokio::sync::broadcast;

const NOTICE_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Entity kind of the store that published the notice.
    pub domain: &'static str,
    pub level: NoticeLevel,
    pub message: String,
}

/// Fan-out channel for notices, shared by every store of a context.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTICE_BUFFER);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub fn info(&self, domain: &'static str, message: impl Into<String>) {
        self.publish(domain, NoticeLevel::Info, message.into());
    }

    pub fn error(&self, domain: &'static str, message: impl Into<String>) {
        self.publish(domain, NoticeLevel::Error, message.into());
    }

    fn publish(&self, domain: &'static str, level: NoticeLevel, message: String) {
        // No subscribers is fine: notices are transient.
        let _ = self.sender.send(Notice {
            domain,
            level,
            message,
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
