//! Routing for presence channels: snapshot and member deltas.
//!
//! Each message is fully decoded before any state is touched, so a bad
//! frame leaves the membership exactly as it was.

use pusher_common::DecodeError;
use tracing::debug;

use super::base;
use super::types::ChannelInner;
use crate::codec::{decode_member_added, decode_member_removed, decode_presence_snapshot};
use crate::dispatch::{Pending, PresenceEvent};
use crate::protocol::events;

pub(crate) fn route(
    inner: &mut ChannelInner,
    channel: &str,
    event: &str,
    raw: &str,
) -> Result<Vec<Pending>, DecodeError> {
    match event {
        events::SUBSCRIPTION_SUCCEEDED => {
            let snapshot = decode_presence_snapshot(raw)?;
            inner
                .membership
                .apply_snapshot(snapshot.ids, &snapshot.hash);
            debug!(channel = %channel, members = inner.membership.len(), "Presence snapshot applied");

            let subscribed = base::subscription_succeeded(inner, channel);
            let members = inner.membership.members().to_vec();
            Ok(vec![
                subscribed,
                Pending::Presence {
                    listeners: inner.listeners.all_listeners(),
                    event: PresenceEvent::FullMembershipReceived(members),
                },
            ])
        }
        events::MEMBER_ADDED => {
            let member = decode_member_added(raw)?;
            debug!(channel = %channel, user_id = %member.id(), "Member added");
            inner.membership.apply_member_added(member.clone());
            Ok(vec![Pending::Presence {
                listeners: inner.listeners.all_listeners(),
                event: PresenceEvent::MemberAdded(member),
            }])
        }
        events::MEMBER_REMOVED => {
            let user_id = decode_member_removed(raw)?;
            if inner.membership.apply_member_removed(&user_id).is_none() {
                debug!(channel = %channel, user_id = %user_id, "Removal of unknown member");
            } else {
                debug!(channel = %channel, user_id = %user_id, "Member removed");
            }
            Ok(vec![Pending::Presence {
                listeners: inner.listeners.all_listeners(),
                event: PresenceEvent::MemberRemoved(user_id),
            }])
        }
        _ => base::route(inner, channel, event, raw),
    }
}
