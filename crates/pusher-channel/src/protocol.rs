//! Wire types for the Pusher channel protocol.
//!
//! Inbound frames are an envelope whose `data` field is itself a JSON
//! document encoded as a string. Decoding of that nested payload lives in
//! `codec.rs`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

/// Reserved event names. These are fixed by the server-side protocol.
pub mod events {
    pub const SUBSCRIBE: &str = "pusher:subscribe";
    pub const UNSUBSCRIBE: &str = "pusher:unsubscribe";
    pub const SUBSCRIPTION_SUCCEEDED: &str = "pusher_internal:subscription_succeeded";
    pub const MEMBER_ADDED: &str = "pusher_internal:member_added";
    pub const MEMBER_REMOVED: &str = "pusher_internal:member_removed";
}

/// Channel name prefixes that select the channel kind.
pub mod prefixes {
    pub const PRIVATE: &str = "private-";
    pub const PRESENCE: &str = "presence-";
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Outer envelope of every inbound frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// String-encoded nested payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Response produced by the external authorizer for private and presence channels.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub auth: Option<String>,
    /// Passed through to the server untouched; `null` when absent.
    #[serde(default)]
    pub channel_data: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Outbound subscribe / unsubscribe request.
#[derive(Debug, Serialize)]
pub struct SubscribeRequest<'a> {
    pub event: &'static str,
    pub data: SubscribeData<'a>,
}

/// Field order here is the serialized order.
#[derive(Debug, Serialize)]
pub struct SubscribeData<'a> {
    pub channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<&'a serde_json::Value>,
}
