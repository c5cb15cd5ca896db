//! Feeding a recorded frame log through a channel.

use pusher_channel::codec::decode_envelope;
use pusher_channel::{Channel, ChannelEventListener, Member, PresenceChannelEventListener};
use tracing::{info, warn};

/// Outcome of one replay run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub applied: usize,
    pub dropped: usize,
}

/// Replay every non-blank line of `frames` (one envelope per line) through `channel`.
pub fn replay_frames(channel: &Channel, frames: &str) -> ReplayStats {
    let mut stats = ReplayStats::default();

    for (lineno, line) in frames.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let envelope = match decode_envelope(line) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(line = lineno + 1, error = %e, "Skipping unreadable frame");
                stats.dropped += 1;
                continue;
            }
        };
        if let Some(target) = envelope.channel.as_deref() {
            if target != channel.name() {
                info!(line = lineno + 1, channel = %target, "Skipping frame for another channel");
                continue;
            }
        }
        match channel.on_message(&envelope.event, line) {
            Ok(()) => stats.applied += 1,
            Err(_) => stats.dropped += 1,
        }
    }
    stats
}

/// Logs every callback it receives.
pub struct LoggingListener;

impl ChannelEventListener for LoggingListener {
    fn on_event(&self, channel: &str, event: &str, data: &str) {
        info!(channel = %channel, event = %event, data = %data, "Event");
    }

    fn on_subscription_succeeded(&self, channel: &str) {
        info!(channel = %channel, "Subscribed");
    }
}

impl PresenceChannelEventListener for LoggingListener {
    fn on_users_information_received(&self, channel: &str, members: &[Member]) {
        info!(channel = %channel, members = members.len(), "Membership received");
    }

    fn on_user_added(&self, channel: &str, member: &Member) {
        info!(channel = %channel, member = %member, "User added");
    }

    fn on_user_removed(&self, channel: &str, user_id: &str) {
        info!(channel = %channel, user_id = %user_id, "User removed");
    }
}
