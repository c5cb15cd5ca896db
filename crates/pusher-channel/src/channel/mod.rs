//! A subscribed channel: name, lifecycle, listeners and (for presence) membership.
//!
//! One `Channel` type serves every kind. The kind picks the name rule, the
//! listener rule, the subscribe message shape, and the message router.

mod base;
mod kind;
mod presence;
mod types;

use std::sync::{Arc, Mutex, MutexGuard};

use pusher_common::{ChannelError, DecodeError};
use tracing::{debug, warn};

use crate::dispatch::{self, EventQueue};
use crate::listener::Listener;
use crate::member::Member;
use crate::subscribe;

pub use kind::ChannelKind;
pub use types::ChannelState;

use types::ChannelInner;

pub struct Channel {
    name: String,
    kind: ChannelKind,
    queue: Arc<dyn EventQueue>,
    inner: Mutex<ChannelInner>,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("state", &self.state())
            .finish()
    }
}

impl Channel {
    /// Fails with `InvalidArgument` if `name` is not valid for `kind`.
    pub fn new(
        kind: ChannelKind,
        name: impl Into<String>,
        queue: Arc<dyn EventQueue>,
    ) -> Result<Self, ChannelError> {
        let name = name.into();
        kind.validate_name(&name)?;
        Ok(Self {
            name,
            kind,
            queue,
            inner: Mutex::new(ChannelInner::default()),
        })
    }

    pub fn presence(name: impl Into<String>, queue: Arc<dyn EventQueue>) -> Result<Self, ChannelError> {
        Self::new(ChannelKind::Presence, name, queue)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn state(&self) -> ChannelState {
        self.lock().state
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Bind a listener to an event name. Presence channels only accept
    /// presence listeners.
    pub fn bind(&self, event: &str, listener: impl Into<Listener>) -> Result<(), ChannelError> {
        let listener = listener.into();
        self.kind.validate_listener(&listener)?;
        if !self.lock().listeners.bind(event, listener) {
            debug!(channel = %self.name, event = %event, "Listener already bound");
        }
        Ok(())
    }

    pub fn unbind(&self, event: &str, listener: &Listener) -> bool {
        self.lock().listeners.unbind(event, listener)
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    /// Route one inbound frame.
    ///
    /// A frame that fails to decode is dropped: state is untouched and no
    /// listener is notified. The error is returned for the caller's logs.
    pub fn on_message(&self, event: &str, raw: &str) -> Result<(), DecodeError> {
        let routed = {
            let mut inner = self.lock();
            match self.kind {
                ChannelKind::Presence => presence::route(&mut inner, &self.name, event, raw),
                ChannelKind::Public | ChannelKind::Private => {
                    base::route(&mut inner, &self.name, event, raw)
                }
            }
        };

        match routed {
            Ok(pending) => {
                dispatch::submit(self.queue.as_ref(), &self.name, pending);
                Ok(())
            }
            Err(e) => {
                warn!(channel = %self.name, event = %event, error = %e, "Dropping undecodable message");
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Outbound
    // -----------------------------------------------------------------------

    /// Build the subscribe request for this channel.
    ///
    /// Private and presence channels need the authorizer's response. For
    /// presence channels the local user id is taken from its `channel_data`.
    pub fn subscribe_message(&self, auth_response: Option<&str>) -> Result<String, ChannelError> {
        let message = match self.kind {
            ChannelKind::Public => subscribe::build_public_subscribe(&self.name)?,
            ChannelKind::Private => subscribe::build_private_subscribe(auth_response, &self.name)?,
            ChannelKind::Presence => subscribe::build_presence_subscribe(auth_response, &self.name)?,
        };

        let mut inner = self.lock();
        if self.kind == ChannelKind::Presence {
            inner.me = auth_response
                .and_then(|raw| subscribe::decode_auth_response(raw).ok())
                .and_then(|auth| subscribe::user_id_from_channel_data(&auth.channel_data));
        }
        if matches!(inner.state, ChannelState::Initial | ChannelState::Unsubscribed) {
            inner.state = ChannelState::SubscribeSent;
        }
        Ok(message)
    }

    /// Build the unsubscribe request. The membership and local user are
    /// forgotten; a later subscription starts from its own snapshot.
    pub fn unsubscribe_message(&self) -> Result<String, ChannelError> {
        let message = subscribe::build_unsubscribe(&self.name)?;
        let mut inner = self.lock();
        inner.state = ChannelState::Unsubscribed;
        inner.membership.clear();
        inner.me = None;
        Ok(message)
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Current members in insertion order. Empty for non-presence channels.
    pub fn members(&self) -> Vec<Member> {
        self.lock().membership.members().to_vec()
    }

    pub fn member(&self, id: &str) -> Option<Member> {
        self.lock().membership.get(id).cloned()
    }

    pub fn member_count(&self) -> usize {
        self.lock().membership.len()
    }

    /// The local user, once it appears in the membership.
    pub fn me(&self) -> Option<Member> {
        let inner = self.lock();
        let id = inner.me.as_deref()?;
        inner.membership.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, ChannelInner> {
        // Listener code never runs under this lock, so a poisoned guard still holds consistent state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
