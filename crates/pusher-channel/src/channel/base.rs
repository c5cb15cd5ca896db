//! Routing shared by every channel kind.

use pusher_common::DecodeError;
use tracing::debug;

use super::types::{ChannelInner, ChannelState};
use crate::codec::decode_envelope;
use crate::dispatch::Pending;
use crate::protocol::events;

pub(crate) fn route(
    inner: &mut ChannelInner,
    channel: &str,
    event: &str,
    raw: &str,
) -> Result<Vec<Pending>, DecodeError> {
    if event == events::SUBSCRIPTION_SUCCEEDED {
        return Ok(vec![subscription_succeeded(inner, channel)]);
    }

    let envelope = decode_envelope(raw)?;
    let listeners = inner.listeners.listeners_for(event);
    debug!(channel = %channel, event = %event, listeners = listeners.len(), "Channel event");
    if listeners.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![Pending::Event {
        listeners,
        event: event.to_string(),
        data: envelope.data.unwrap_or_default(),
    }])
}

/// Mark the channel subscribed and queue the notification for every listener.
pub(crate) fn subscription_succeeded(inner: &mut ChannelInner, channel: &str) -> Pending {
    if !inner.state.is_subscribed() {
        debug!(channel = %channel, from = ?inner.state, "Channel subscribed");
    }
    inner.state = ChannelState::Subscribed;
    Pending::SubscriptionSucceeded {
        listeners: inner.listeners.all_listeners(),
    }
}
