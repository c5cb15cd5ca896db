//! Per-kind rules: which names are allowed and which listeners may bind.

use pusher_common::ChannelError;

use crate::listener::Listener;
use crate::protocol::prefixes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Public,
    Private,
    Presence,
}

impl ChannelKind {
    /// The kind a server would assign to `name`, judged by its prefix.
    pub fn for_name(name: &str) -> Self {
        if name.starts_with(prefixes::PRESENCE) {
            ChannelKind::Presence
        } else if name.starts_with(prefixes::PRIVATE) {
            ChannelKind::Private
        } else {
            ChannelKind::Public
        }
    }

    pub fn is_valid_name(self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        match self {
            ChannelKind::Public => {
                !name.starts_with(prefixes::PRIVATE) && !name.starts_with(prefixes::PRESENCE)
            }
            ChannelKind::Private => name.starts_with(prefixes::PRIVATE),
            ChannelKind::Presence => name.starts_with(prefixes::PRESENCE),
        }
    }

    pub fn validate_name(self, name: &str) -> Result<(), ChannelError> {
        if self.is_valid_name(name) {
            Ok(())
        } else {
            Err(ChannelError::InvalidArgument(format!(
                "{name:?} is not a valid {} channel name",
                self.label()
            )))
        }
    }

    pub fn validate_listener(self, listener: &Listener) -> Result<(), ChannelError> {
        if self == ChannelKind::Presence && !listener.is_presence() {
            return Err(ChannelError::InvalidArgument(
                "only presence channel listeners can be bound to a presence channel".into(),
            ));
        }
        Ok(())
    }

    pub fn label(self) -> &'static str {
        match self {
            ChannelKind::Public => "public",
            ChannelKind::Private => "private",
            ChannelKind::Presence => "presence",
        }
    }
}
