use super::TrackerError;
use crate::platform::{NotificationSink, SubscriptionId, SubscriptionScope, WindowSystem};
use std::sync::{Arc, Weak};

/// OS change subscriptions held for one session. All or nothing: a set only
/// exists when every requested subscription was installed. Dropping the set
/// unsubscribes everything.
pub struct SubscriptionSet<P: WindowSystem> {
    platform: Arc<P>,
    ids: Vec<SubscriptionId>,
}

impl<P: WindowSystem> SubscriptionSet<P> {
    pub fn install(
        platform: Arc<P>,
        scopes: &[SubscriptionScope],
        sink: Weak<dyn NotificationSink>,
    ) -> Result<Self, TrackerError> {
        let mut set = Self {
            platform,
            ids: Vec::with_capacity(scopes.len()),
        };
        for scope in scopes {
            match set.platform.subscribe(*scope, sink.clone()) {
                Some(id) => set.ids.push(id),
                None => {
                    tracing::warn!(?scope, installed = set.ids.len(), "subscription failed, rolling back");
                    // `set` drops here and releases what was installed.
                    return Err(TrackerError::SubscriptionFailed(*scope));
                }
            }
        }
        Ok(set)
    }

    pub fn ids(&self) -> &[SubscriptionId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<P: WindowSystem> Drop for SubscriptionSet<P> {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            self.platform.unsubscribe(id);
        }
    }
}
