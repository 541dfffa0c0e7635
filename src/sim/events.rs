//! Collision event delivery
//!
//! The driver publishes each frame's events once, after physics, to an
//! explicit subscriber list. Listeners only see `&CollisionEvent`, so they
//! cannot reach back into the driver mid-frame.

use std::sync::mpsc::{self, Receiver, Sender};

use super::collision::CollisionEvent;

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&CollisionEvent)>;

enum Sink {
    Callback(Callback),
    Channel(Sender<CollisionEvent>),
}

struct Listener {
    id: ListenerId,
    sink: Sink,
}

/// Ordered list of collision event subscribers
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a callback invoked for every published event
    pub fn subscribe(&mut self, callback: impl FnMut(&CollisionEvent) + 'static) -> ListenerId {
        let id = self.allocate_id();
        self.listeners.push(Listener {
            id,
            sink: Sink::Callback(Box::new(callback)),
        });
        id
    }

    /// Register a channel; dropping the receiver detaches it at the next publish
    pub fn subscribe_channel(&mut self) -> Receiver<CollisionEvent> {
        let (tx, rx) = mpsc::channel();
        let id = self.allocate_id();
        self.listeners.push(Listener {
            id,
            sink: Sink::Channel(tx),
        });
        rx
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Deliver a frame's events to every listener in registration order.
    ///
    /// A channel whose receiver went away is dropped from the list and the
    /// remaining listeners still receive the full frame.
    pub fn publish(&mut self, events: &[CollisionEvent]) {
        if events.is_empty() || self.listeners.is_empty() {
            return;
        }
        self.listeners.retain_mut(|listener| match &mut listener.sink {
            Sink::Callback(callback) => {
                for event in events {
                    callback(event);
                }
                true
            }
            Sink::Channel(tx) => {
                for event in events {
                    if tx.send(event.clone()).is_err() {
                        log::warn!("Collision listener {:?} detached during dispatch", listener.id);
                        return false;
                    }
                }
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(id: u64) -> CollisionEvent {
        CollisionEvent {
            id,
            a: 0,
            b: 1,
            point: DVec2::ZERO,
            timestamp: 0.0,
            conversion: None,
        }
    }

    #[test]
    fn test_callbacks_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |e| log.borrow_mut().push((tag, e.id)));
        }
        bus.publish(&[event(1), event(2)]);
        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("first", 2), ("second", 1), ("second", 2)]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);
        bus.publish(&[event(0)]);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&[event(1)]);
        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_dropped_channel_does_not_stop_dispatch() {
        let mut bus = EventBus::new();
        let dropped = bus.subscribe_channel();
        let kept = bus.subscribe_channel();
        let seen = Rc::new(RefCell::new(0));
        let s = Rc::clone(&seen);
        bus.subscribe(move |_| *s.borrow_mut() += 1);
        drop(dropped);

        bus.publish(&[event(0), event(1)]);
        assert_eq!(bus.len(), 2);
        assert_eq!(kept.try_iter().map(|e| e.id).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn test_empty_frame_is_not_delivered() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe_channel();
        bus.publish(&[]);
        assert!(rx.try_recv().is_err());
    }
}
