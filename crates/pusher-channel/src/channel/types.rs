use crate::listener::ListenerRegistry;
use crate::membership::MembershipSet;

/// Subscription lifecycle of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelState {
    #[default]
    Initial,
    SubscribeSent,
    /// The server confirmed the subscription; membership is authoritative.
    Subscribed,
    Unsubscribed,
}

impl ChannelState {
    pub fn is_subscribed(self) -> bool {
        self == ChannelState::Subscribed
    }
}

/// Everything guarded by the channel's mutation lock.
#[derive(Debug, Default)]
pub(crate) struct ChannelInner {
    pub(crate) state: ChannelState,
    pub(crate) listeners: ListenerRegistry,
    pub(crate) membership: MembershipSet,
    /// Local user id, taken from the auth response's `channel_data`.
    pub(crate) me: Option<String>,
}
