//! Presence-tracking channel core for Pusher-protocol clients.
//!
//! Decodes inbound channel frames, keeps the deduplicated membership of a
//! presence channel, and fans membership changes out to listeners through
//! an `EventQueue`. The transport and the authorizer are supplied by the host.

pub mod channel;
pub mod codec;
pub mod dispatch;
pub mod listener;
pub mod member;
pub mod membership;
pub mod protocol;
pub mod subscribe;

#[cfg(test)]
pub(crate) mod test_support;

pub use channel::{Channel, ChannelKind, ChannelState};
pub use codec::PresenceSnapshot;
pub use dispatch::{EventQueue, PresenceEvent, Task, TokioEventQueue};
pub use listener::{ChannelEventListener, Listener, ListenerRegistry, PresenceChannelEventListener};
pub use member::Member;
pub use membership::MembershipSet;
pub use pusher_common::{ChannelError, DecodeError};
