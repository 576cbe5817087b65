//! Button notification dispatch.
//!
//! [`ObserverSlot`] is the single piece of shared mutable state in the
//! façade: a guarded, swappable weak reference to the current observer.
//! [`Dispatcher`] is what the transport's notification handler calls; it
//! reads the slot at delivery time, so the most recent registration wins.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use openmote_domain::button::ButtonState;

use crate::ports::{ButtonObserver, Notification, ObserveErrorPolicy, TransportError};

type ObserverRef = Weak<dyn ButtonObserver>;

/// Swappable reference to the currently registered observer.
#[derive(Clone, Default)]
pub struct ObserverSlot {
    inner: Arc<RwLock<Option<ObserverRef>>>,
}

impl ObserverSlot {
    /// Replace the registered observer. The previous one is forgotten.
    pub fn replace(&self, observer: ObserverRef) {
        let mut slot = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(observer);
    }

    /// The registered observer, if any is registered and still alive.
    #[must_use]
    pub fn current(&self) -> Option<Arc<dyn ButtonObserver>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }
}

/// Routes notifications to whatever observer is registered at delivery time.
#[derive(Clone)]
pub struct Dispatcher {
    slot: ObserverSlot,
    policy: ObserveErrorPolicy,
}

impl Dispatcher {
    #[must_use]
    pub fn new(slot: ObserverSlot, policy: ObserveErrorPolicy) -> Self {
        Self { slot, policy }
    }

    /// Deliver one notification.
    pub fn dispatch(&self, notification: Notification) {
        match notification {
            Ok(body) => self.dispatch_state(ButtonState::from_payload(&body)),
            Err(err) => self.dispatch_error(&err),
        }
    }

    /// Deliver a decoded button transition.
    pub fn dispatch_state(&self, state: ButtonState) {
        let Some(observer) = self.slot.current() else {
            tracing::debug!(%state, "button notification dropped, no live observer");
            return;
        };

        tracing::debug!(%state, "button notification");
        match state {
            ButtonState::Pressed => observer.on_pressed(),
            ButtonState::Released => observer.on_released(),
        }
    }

    /// Deliver an observation error according to the configured policy.
    pub fn dispatch_error(&self, err: &TransportError) {
        if self.policy == ObserveErrorPolicy::Ignore {
            tracing::debug!(%err, "button observation error ignored");
            return;
        }

        match self.slot.current() {
            Some(observer) => observer.on_error(err),
            None => tracing::warn!(%err, "button observation error, no live observer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingObserver {
        pressed: AtomicUsize,
        released: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ButtonObserver for CountingObserver {
        fn on_pressed(&self) {
            self.pressed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_released(&self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }

        fn on_error(&self, _error: &TransportError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn register(slot: &ObserverSlot, observer: &Arc<CountingObserver>) {
        let weak: Weak<CountingObserver> = Arc::downgrade(observer);
        slot.replace(weak);
    }

    #[test]
    fn should_start_without_observer() {
        let slot = ObserverSlot::default();
        assert!(slot.current().is_none());
    }

    #[test]
    fn should_call_on_released_for_zero_body() {
        let slot = ObserverSlot::default();
        let observer = Arc::new(CountingObserver::default());
        register(&slot, &observer);

        Dispatcher::new(slot, ObserveErrorPolicy::Notify).dispatch(Ok(b"0".to_vec()));

        assert_eq!(observer.released.load(Ordering::SeqCst), 1);
        assert_eq!(observer.pressed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn should_call_on_pressed_for_other_bodies() {
        let slot = ObserverSlot::default();
        let observer = Arc::new(CountingObserver::default());
        register(&slot, &observer);
        let dispatcher = Dispatcher::new(slot, ObserveErrorPolicy::Notify);

        dispatcher.dispatch(Ok(b"1".to_vec()));
        dispatcher.dispatch(Ok(b"42".to_vec()));

        assert_eq!(observer.pressed.load(Ordering::SeqCst), 2);
        assert_eq!(observer.released.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn should_dispatch_to_latest_registration_only() {
        let slot = ObserverSlot::default();
        let first = Arc::new(CountingObserver::default());
        let second = Arc::new(CountingObserver::default());
        let dispatcher = Dispatcher::new(slot.clone(), ObserveErrorPolicy::Notify);

        register(&slot, &first);
        register(&slot, &second);
        dispatcher.dispatch(Ok(b"1".to_vec()));

        assert_eq!(first.pressed.load(Ordering::SeqCst), 0);
        assert_eq!(second.pressed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_drop_notification_when_observer_is_gone() {
        let slot = ObserverSlot::default();
        let observer = Arc::new(CountingObserver::default());
        register(&slot, &observer);
        drop(observer);

        assert!(slot.current().is_none());
        Dispatcher::new(slot, ObserveErrorPolicy::Notify).dispatch(Ok(b"1".to_vec()));
    }

    #[test]
    fn should_forward_errors_under_notify_policy() {
        let slot = ObserverSlot::default();
        let observer = Arc::new(CountingObserver::default());
        register(&slot, &observer);

        Dispatcher::new(slot, ObserveErrorPolicy::Notify)
            .dispatch(Err(TransportError::Status("4.04".to_string())));

        assert_eq!(observer.errors.load(Ordering::SeqCst), 1);
        assert_eq!(observer.pressed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn should_swallow_errors_under_ignore_policy() {
        let slot = ObserverSlot::default();
        let observer = Arc::new(CountingObserver::default());
        register(&slot, &observer);

        Dispatcher::new(slot, ObserveErrorPolicy::Ignore)
            .dispatch(Err(TransportError::Status("4.04".to_string())));

        assert_eq!(observer.errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn should_use_default_on_error_when_not_overridden() {
        struct Minimal(AtomicUsize);

        impl ButtonObserver for Minimal {
            fn on_pressed(&self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
            fn on_released(&self) {}
        }

        let slot = ObserverSlot::default();
        let observer = Arc::new(Minimal(AtomicUsize::new(0)));
        let weak: Weak<Minimal> = Arc::downgrade(&observer);
        slot.replace(weak);

        let dispatcher = Dispatcher::new(slot, ObserveErrorPolicy::Notify);
        dispatcher.dispatch(Err(TransportError::Timeout(std::time::Duration::from_secs(1))));
        dispatcher.dispatch(Ok(b"1".to_vec()));

        assert_eq!(observer.0.load(Ordering::SeqCst), 1);
    }
}
