use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::core::message::Message;
use crate::error::{Result, SessionError};

type SubscriberFn = dyn Fn(&Message) + Send + Sync + 'static;

/// Tag-keyed subscriber registry.
///
/// Replaces engine-style signal fan-out with an explicit observer list: any
/// number of subscribers may register per tag, and every decoded message is
/// delivered to all subscribers of its tag. Unknown tags dispatch to nobody,
/// which is not an error.
pub struct Dispatcher {
    subscribers: Arc<RwLock<HashMap<Cow<'static, str>, Vec<Box<SubscriberFn>>>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a subscriber for all messages carrying `tag`.
    pub fn subscribe<F>(&self, tag: &str, subscriber: F) -> Result<()>
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        let mut subscribers = self.subscribers.write().map_err(|_| {
            SessionError::Transport("Failed to acquire write lock on dispatcher".to_string())
        })?;

        subscribers
            .entry(Cow::Owned(tag.to_string()))
            .or_default()
            .push(Box::new(subscriber));
        Ok(())
    }

    /// Deliver a message to every subscriber of its tag.
    ///
    /// Returns how many subscribers ran.
    pub fn dispatch(&self, msg: &Message) -> Result<usize> {
        let subscribers = self.subscribers.read().map_err(|_| {
            SessionError::Transport("Failed to acquire read lock on dispatcher".to_string())
        })?;

        match subscribers.get(msg.tag.as_str()) {
            Some(list) => {
                for subscriber in list {
                    subscriber(msg);
                }
                Ok(list.len())
            }
            None => {
                debug!(target: "peer_session::dispatch", tag = %msg.tag, "no subscribers for tag");
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fan_out_reaches_all_subscribers() {
        let dispatcher = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = hits.clone();
            dispatcher
                .subscribe("message", move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        let delivered = dispatcher.dispatch(&Message::new("message")).unwrap();
        assert_eq!(delivered, 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unknown_tag_dispatches_to_nobody() {
        let dispatcher = Dispatcher::new();
        let delivered = dispatcher.dispatch(&Message::new("unheard-of")).unwrap();
        assert_eq!(delivered, 0);
    }

    #[test]
    fn tags_are_isolated() {
        let dispatcher = Dispatcher::new();
        let chat_hits = Arc::new(AtomicUsize::new(0));

        let hits = chat_hits.clone();
        dispatcher
            .subscribe("message", move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        dispatcher.dispatch(&Message::new("handshake")).unwrap();
        assert_eq!(chat_hits.load(Ordering::SeqCst), 0);
    }
}
