//! Two-pass decoding of inbound frames.
//!
//! The envelope is decoded first, then its string-encoded `data` is decoded
//! into an object. Presence handlers pull either the `presence` sub-object
//! or the flat `user_id` / `user_info` fields out of that object.

use std::collections::HashMap;

use pusher_common::DecodeError;
use serde_json::{Map, Value};

use crate::member::{id_from_value, info_from_value, Member};
use crate::protocol::Envelope;

/// Membership snapshot carried by the subscription-succeeded event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceSnapshot {
    /// Member ids in server order. May contain duplicates.
    pub ids: Vec<String>,
    /// Per-id info, already normalised.
    pub hash: HashMap<String, Option<String>>,
}

pub fn decode_envelope(raw: &str) -> Result<Envelope, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

/// Decode the nested `data` payload of a frame into an object.
pub fn decode_data(raw: &str) -> Result<Map<String, Value>, DecodeError> {
    let envelope = decode_envelope(raw)?;
    let data = envelope.data.ok_or(DecodeError::MissingField("data"))?;
    match serde_json::from_str::<Value>(&data)? {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnObject("data")),
    }
}

pub fn decode_presence_snapshot(raw: &str) -> Result<PresenceSnapshot, DecodeError> {
    let mut data = decode_data(raw)?;
    let mut presence = match data.remove("presence") {
        Some(Value::Object(presence)) => presence,
        Some(_) => return Err(DecodeError::NotAnObject("presence")),
        None => return Err(DecodeError::MissingField("presence")),
    };

    let ids = presence
        .remove("ids")
        .ok_or(DecodeError::MissingField("ids"))?;
    let ids = match ids {
        Value::Array(ids) => ids
            .iter()
            .map(id_from_value)
            .collect::<Option<Vec<String>>>()
            .ok_or(DecodeError::InvalidField("ids"))?,
        _ => return Err(DecodeError::InvalidField("ids")),
    };

    let hash = match presence.remove("hash") {
        Some(Value::Object(hash)) => hash,
        Some(_) => return Err(DecodeError::NotAnObject("hash")),
        None => return Err(DecodeError::MissingField("hash")),
    };
    let hash = hash
        .into_iter()
        .map(|(id, info)| (id, info_from_value(info)))
        .collect();

    Ok(PresenceSnapshot { ids, hash })
}

pub fn decode_member_added(raw: &str) -> Result<Member, DecodeError> {
    let mut data = decode_data(raw)?;
    let id = user_id(&data)?;
    let info = data.remove("user_info").and_then(info_from_value);
    Ok(Member::new(id, info))
}

pub fn decode_member_removed(raw: &str) -> Result<String, DecodeError> {
    let data = decode_data(raw)?;
    user_id(&data)
}

fn user_id(data: &Map<String, Value>) -> Result<String, DecodeError> {
    match data.get("user_id") {
        Some(id) => id_from_value(id).ok_or(DecodeError::InvalidField("user_id")),
        None => Err(DecodeError::MissingField("user_id")),
    }
}
