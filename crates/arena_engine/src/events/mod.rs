//! Event bus drained between frames
//!
//! Key principles:
//! - Entities never call each other; they publish events into the bus
//! - Subscriptions are added and removed by token
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Queuing support (next-dispatch + deferred delivery)
//!
//! Dispatch works on a queue taken out of the bus, so a handler can never
//! observe or disturb the subscriber list mid-iteration.

use std::collections::VecDeque;

/// Token returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler<E> {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &E) -> bool;
}

impl<E, F> EventHandler<E> for F
where
    F: FnMut(&E) -> bool,
{
    fn on_event(&mut self, event: &E) -> bool {
        self(event)
    }
}

/// Event bus with a subscription registry and queuing
pub struct EventBus<E> {
    immediate_queue: VecDeque<E>,
    deferred_queue: Vec<(f64, E)>,
    handlers: Vec<(SubscriptionId, Box<dyn EventHandler<E>>)>,
    next_subscription: u64,
    current_time: f64,
}

impl<E> EventBus<E> {
    /// Create a new empty event bus
    pub fn new() -> Self {
        Self {
            immediate_queue: VecDeque::new(),
            deferred_queue: Vec::new(),
            handlers: Vec::new(),
            next_subscription: 0,
            current_time: 0.0,
        }
    }

    /// Update current time (seconds, same origin as the game clock)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Register a handler; handlers run in subscription order
    pub fn subscribe(&mut self, handler: Box<dyn EventHandler<E>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Remove a handler; returns false if the token was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Queue an event for the next dispatch
    pub fn publish(&mut self, event: E) {
        self.immediate_queue.push_back(event);
    }

    /// Queue an event for the first dispatch at or after `delivery_time`
    pub fn post(&mut self, delivery_time: f64, event: E) {
        self.deferred_queue.push((delivery_time, event));
    }

    /// Number of events waiting for dispatch (including deferred ones)
    pub fn pending(&self) -> usize {
        self.immediate_queue.len() + self.deferred_queue.len()
    }

    /// Deliver every queued event and every due deferred event
    ///
    /// Returns the delivered events in delivery order so the bus owner can
    /// react to them as well.
    pub fn dispatch(&mut self) -> Vec<E> {
        let mut due: Vec<E> = std::mem::take(&mut self.immediate_queue).into_iter().collect();

        let deferred = std::mem::take(&mut self.deferred_queue);
        for (delivery_time, event) in deferred {
            if delivery_time <= self.current_time {
                due.push(event);
            } else {
                self.deferred_queue.push((delivery_time, event));
            }
        }

        for event in &due {
            self.dispatch_event(event);
        }
        due
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            if handler.on_event(event) {
                break;
            }
        }
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
        self.deferred_queue.clear();
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Died(u32),
        Opened(u32),
    }

    fn recorder(log: &Rc<RefCell<Vec<TestEvent>>>, consume: bool) -> Box<dyn EventHandler<TestEvent>> {
        let log = Rc::clone(log);
        Box::new(move |event: &TestEvent| {
            log.borrow_mut().push(event.clone());
            consume
        })
    }

    #[test]
    fn test_publish_is_delivered_on_dispatch_only() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe(recorder(&log, false));

        bus.publish(TestEvent::Died(3));
        assert!(log.borrow().is_empty());

        let delivered = bus.dispatch();
        assert_eq!(delivered, vec![TestEvent::Died(3)]);
        assert_eq!(*log.borrow(), vec![TestEvent::Died(3)]);

        // Nothing is delivered twice
        assert!(bus.dispatch().is_empty());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_unsubscribe_by_token() {
        let mut bus = EventBus::new();
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let first_id = bus.subscribe(recorder(&first, false));
        bus.subscribe(recorder(&second, false));

        assert!(bus.unsubscribe(first_id));
        assert!(!bus.unsubscribe(first_id));
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(TestEvent::Opened(1));
        bus.dispatch();
        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
    }

    #[test]
    fn test_deferred_dispatch() {
        let mut bus: EventBus<TestEvent> = EventBus::new();
        bus.update_time(0.0);
        bus.post(1.0, TestEvent::Opened(2));

        // Event should not dispatch at t=0.5
        bus.update_time(0.5);
        assert!(bus.dispatch().is_empty());
        assert_eq!(bus.pending(), 1);

        // Event should dispatch at t=1.0
        bus.update_time(1.0);
        assert_eq!(bus.dispatch(), vec![TestEvent::Opened(2)]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_event_consumption() {
        let mut bus = EventBus::new();
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));

        // First handler consumes, second should not receive
        bus.subscribe(recorder(&first, true));
        bus.subscribe(recorder(&second, false));

        bus.publish(TestEvent::Died(1));
        bus.dispatch();

        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }
}
