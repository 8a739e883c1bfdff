//! Event kinds and the ordered subscriber registry.

use std::sync::Arc;

/// Events observable on an [`ActivityMonitor`](crate::ActivityMonitor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorEvent {
    /// Monitoring started.
    Started,
    /// Monitoring stopped.
    Stopped,
    /// The user transitioned to active.
    Active,
    /// The user transitioned to inactive.
    Inactive,
}

/// A registered subscriber callback.
pub(crate) type Callback = Arc<dyn Fn() + Send + Sync>;

/// Per-event subscriber lists; insertion order is invocation order.
#[derive(Default)]
pub(crate) struct Subscribers {
    started: Vec<Callback>,
    stopped: Vec<Callback>,
    active: Vec<Callback>,
    inactive: Vec<Callback>,
}

impl Subscribers {
    pub fn push(&mut self, event: MonitorEvent, callback: Callback) {
        self.slot(event).push(callback);
    }

    /// Clone the list for an event so it can be invoked outside any lock.
    pub fn snapshot(&self, event: MonitorEvent) -> Vec<Callback> {
        match event {
            MonitorEvent::Started => self.started.clone(),
            MonitorEvent::Stopped => self.stopped.clone(),
            MonitorEvent::Active => self.active.clone(),
            MonitorEvent::Inactive => self.inactive.clone(),
        }
    }

    fn slot(&mut self, event: MonitorEvent) -> &mut Vec<Callback> {
        match event {
            MonitorEvent::Started => &mut self.started,
            MonitorEvent::Stopped => &mut self.stopped,
            MonitorEvent::Active => &mut self.active,
            MonitorEvent::Inactive => &mut self.inactive,
        }
    }
}

/// Invoke a snapshot of callbacks in registration order.
pub(crate) fn notify(callbacks: &[Callback]) {
    for callback in callbacks {
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn callbacks_run_in_registration_order() {
        let mut subscribers = Subscribers::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in 1..=3u32 {
            let order = order.clone();
            subscribers.push(
                MonitorEvent::Active,
                Arc::new(move || order.lock().push(id)),
            );
        }

        notify(&subscribers.snapshot(MonitorEvent::Active));
        assert_eq!(*order.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn snapshot_is_isolated_from_later_registrations() {
        let mut subscribers = Subscribers::default();
        let hits = Arc::new(Mutex::new(0u32));

        let count = hits.clone();
        subscribers.push(MonitorEvent::Inactive, Arc::new(move || *count.lock() += 1));
        let snapshot = subscribers.snapshot(MonitorEvent::Inactive);

        let count = hits.clone();
        subscribers.push(MonitorEvent::Inactive, Arc::new(move || *count.lock() += 1));

        notify(&snapshot);
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn events_are_independent() {
        let mut subscribers = Subscribers::default();
        subscribers.push(MonitorEvent::Started, Arc::new(|| {}));

        assert_eq!(subscribers.snapshot(MonitorEvent::Started).len(), 1);
        assert!(subscribers.snapshot(MonitorEvent::Stopped).is_empty());
        assert!(subscribers.snapshot(MonitorEvent::Active).is_empty());
        assert!(subscribers.snapshot(MonitorEvent::Inactive).is_empty());
    }
}
