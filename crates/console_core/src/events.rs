//! Non-blocking notifications surfaced to whatever front end is attached.

use tokio::sync::broadcast;

use crate::error::{ConsoleError, ErrorCategory};

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    Error {
        category: ErrorCategory,
        message: String,
    },
    ListRefreshed {
        resource: &'static str,
        count: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Notifier {
    events: broadcast::Sender<ConsoleEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        let (events, _) = broadcast::channel(256);
        Self { events }
    }
}

impl Notifier {
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.events.subscribe()
    }

    pub fn error(&self, err: &ConsoleError) {
        let _ = self.events.send(ConsoleEvent::Error {
            category: err.category(),
            message: err.user_message(),
        });
    }

    pub fn list_refreshed(&self, resource: &'static str, count: usize) {
        let _ = self
            .events
            .send(ConsoleEvent::ListRefreshed { resource, count });
    }
}
