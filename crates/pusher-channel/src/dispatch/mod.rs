//! Fan-out of channel events to bound listeners.
//!
//! Every function here submits one task per listener to an `EventQueue`
//! and returns immediately. Listener code never runs on the caller's thread.

mod queue;

use std::sync::Arc;

use tracing::debug;

use crate::listener::Listener;
use crate::member::Member;

pub use queue::{EventQueue, Task, TokioEventQueue};

/// A membership change, as delivered to presence listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenceEvent {
    FullMembershipReceived(Vec<Member>),
    MemberAdded(Member),
    MemberRemoved(String),
}

/// Notifications computed while the channel lock is held and submitted after it is released.
#[derive(Debug)]
pub(crate) enum Pending {
    SubscriptionSucceeded {
        listeners: Vec<Listener>,
    },
    Event {
        listeners: Vec<Listener>,
        event: String,
        data: String,
    },
    Presence {
        listeners: Vec<Listener>,
        event: PresenceEvent,
    },
}

pub(crate) fn submit(queue: &dyn EventQueue, channel: &str, pending: Vec<Pending>) {
    for item in pending {
        match item {
            Pending::SubscriptionSucceeded { listeners } => {
                notify_subscription_succeeded(queue, channel, &listeners);
            }
            Pending::Event {
                listeners,
                event,
                data,
            } => {
                notify_event(queue, channel, &listeners, &event, &data);
            }
            Pending::Presence { listeners, event } => {
                notify_all(queue, channel, &listeners, event);
            }
        }
    }
}

/// Submit one presence notification per listener, in the given order.
///
/// Listeners without the presence capability are skipped. Returns the number
/// of tasks submitted.
pub fn notify_all(
    queue: &dyn EventQueue,
    channel: &str,
    listeners: &[Listener],
    event: PresenceEvent,
) -> usize {
    let channel: Arc<str> = Arc::from(channel);
    let event = Arc::new(event);
    let mut submitted = 0;

    for listener in listeners {
        let Some(listener) = listener.as_presence() else {
            debug!(channel = %channel, "Skipping listener without presence capability");
            continue;
        };
        let listener = Arc::clone(listener);
        let channel = Arc::clone(&channel);
        let event = Arc::clone(&event);
        queue.execute(Box::new(move || match &*event {
            PresenceEvent::FullMembershipReceived(members) => {
                listener.on_users_information_received(&channel, members)
            }
            PresenceEvent::MemberAdded(member) => listener.on_user_added(&channel, member),
            PresenceEvent::MemberRemoved(user_id) => listener.on_user_removed(&channel, user_id),
        }));
        submitted += 1;
    }
    submitted
}

pub fn notify_event(
    queue: &dyn EventQueue,
    channel: &str,
    listeners: &[Listener],
    event: &str,
    data: &str,
) -> usize {
    let channel: Arc<str> = Arc::from(channel);
    let event: Arc<str> = Arc::from(event);
    let data: Arc<str> = Arc::from(data);

    for listener in listeners {
        let listener = listener.clone();
        let channel = Arc::clone(&channel);
        let event = Arc::clone(&event);
        let data = Arc::clone(&data);
        queue.execute(Box::new(move || listener.on_event(&channel, &event, &data)));
    }
    listeners.len()
}

pub fn notify_subscription_succeeded(
    queue: &dyn EventQueue,
    channel: &str,
    listeners: &[Listener],
) -> usize {
    let channel: Arc<str> = Arc::from(channel);

    for listener in listeners {
        let listener = listener.clone();
        let channel = Arc::clone(&channel);
        queue.execute(Box::new(move || listener.on_subscription_succeeded(&channel)));
    }
    listeners.len()
}
