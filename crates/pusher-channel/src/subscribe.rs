//! Outbound subscribe / unsubscribe messages.
//!
//! Pure transformations: no channel state is touched here.

use pusher_common::{ChannelError, DecodeError};
use serde_json::Value;

use crate::member::id_from_value;
use crate::protocol::{events, AuthResponse, SubscribeData, SubscribeRequest};

pub fn build_public_subscribe(channel: &str) -> Result<String, ChannelError> {
    encode(events::SUBSCRIBE, channel, None, None)
}

pub fn build_private_subscribe(
    auth_response: Option<&str>,
    channel: &str,
) -> Result<String, ChannelError> {
    let auth = decode_auth_response(require_auth(auth_response, "private")?)?;
    let key = auth.auth.ok_or(DecodeError::MissingField("auth"))?;
    encode(events::SUBSCRIBE, channel, Some(&key), None)
}

/// Build the presence subscribe request. `channel_data` is forwarded as-is.
pub fn build_presence_subscribe(
    auth_response: Option<&str>,
    channel: &str,
) -> Result<String, ChannelError> {
    let auth = decode_auth_response(require_auth(auth_response, "presence")?)?;
    let key = auth.auth.ok_or(DecodeError::MissingField("auth"))?;
    encode(
        events::SUBSCRIBE,
        channel,
        Some(&key),
        Some(&auth.channel_data),
    )
}

pub fn build_unsubscribe(channel: &str) -> Result<String, ChannelError> {
    encode(events::UNSUBSCRIBE, channel, None, None)
}

pub fn decode_auth_response(raw: &str) -> Result<AuthResponse, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

/// The `user_id` inside `channel_data`, which may be an object or a JSON string.
pub fn user_id_from_channel_data(channel_data: &Value) -> Option<String> {
    let parsed;
    let object = match channel_data {
        Value::String(s) => {
            parsed = serde_json::from_str::<Value>(s).ok()?;
            &parsed
        }
        other => other,
    };
    id_from_value(object.get("user_id")?)
}

fn require_auth<'a>(auth_response: Option<&'a str>, kind: &str) -> Result<&'a str, ChannelError> {
    auth_response.ok_or_else(|| {
        ChannelError::InvalidArgument(format!(
            "the auth response must be provided to build a {kind} channel subscription message"
        ))
    })
}

fn encode(
    event: &'static str,
    channel: &str,
    auth: Option<&str>,
    channel_data: Option<&Value>,
) -> Result<String, ChannelError> {
    let request = SubscribeRequest {
        event,
        data: SubscribeData {
            channel,
            auth,
            channel_data,
        },
    };
    serde_json::to_string(&request).map_err(|e| DecodeError::Malformed(e).into())
}
