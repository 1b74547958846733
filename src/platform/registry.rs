use super::{NotificationSink, SubscriptionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Maps OS subscription handles to the sink that owns them.
///
/// Needed because the OS notification callback carries no user data: the
/// trampoline only learns which hook fired and has to find its owner here.
#[derive(Default)]
pub struct HookRegistry {
    sinks: Mutex<HashMap<SubscriptionId, Weak<dyn NotificationSink>>>,
}

impl HookRegistry {
    pub fn insert(&self, id: SubscriptionId, sink: Weak<dyn NotificationSink>) {
        if let Ok(mut sinks) = self.sinks.lock() {
            sinks.insert(id, sink);
        }
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        self.sinks
            .lock()
            .map(|mut sinks| sinks.remove(&id).is_some())
            .unwrap_or(false)
    }

    /// Live sink for `id`. The registry lock is released before returning so
    /// the caller can notify without holding it.
    pub fn lookup(&self, id: SubscriptionId) -> Option<Arc<dyn NotificationSink>> {
        let weak = self.sinks.lock().ok()?.get(&id).cloned()?;
        weak.upgrade()
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::WinEvent;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink(AtomicUsize);

    impl NotificationSink for CountingSink {
        fn notify(&self, _event: WinEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn lookup_finds_the_registered_owner() {
        let registry = HookRegistry::default();
        let a = Arc::new(CountingSink::default());
        let b = Arc::new(CountingSink::default());
        let a_dyn: Arc<dyn NotificationSink> = a.clone();
        let b_dyn: Arc<dyn NotificationSink> = b.clone();
        registry.insert(SubscriptionId(1), Arc::downgrade(&a_dyn));
        registry.insert(SubscriptionId(2), Arc::downgrade(&b_dyn));

        registry
            .lookup(SubscriptionId(2))
            .expect("sink registered")
            .notify(WinEvent::foreground(crate::platform::WindowId(7)));

        assert_eq!(a.0.load(Ordering::SeqCst), 0);
        assert_eq!(b.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_or_dropped_sinks_are_not_found() {
        let registry = HookRegistry::default();
        let sink: Arc<dyn NotificationSink> = Arc::new(CountingSink::default());
        registry.insert(SubscriptionId(1), Arc::downgrade(&sink));
        registry.insert(SubscriptionId(2), Arc::downgrade(&sink));

        assert!(registry.remove(SubscriptionId(1)));
        assert!(!registry.remove(SubscriptionId(1)));
        assert!(registry.lookup(SubscriptionId(1)).is_none());

        drop(sink);
        assert!(registry.lookup(SubscriptionId(2)).is_none());
        assert_eq!(registry.len(), 1);
    }
}
