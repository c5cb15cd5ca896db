use std::fmt;
use std::hash::{Hash, Hasher};

use pusher_common::DecodeError;
use serde::de::DeserializeOwned;

/// One identified user present on a presence channel.
///
/// Identity is the `id` alone: two members with the same id are equal
/// regardless of their `info`.
#[derive(Debug, Clone)]
pub struct Member {
    id: String,
    /// Opaque per-user info, usually JSON text.
    info: Option<String>,
}

impl Member {
    pub fn new(id: impl Into<String>, info: Option<String>) -> Self {
        Self {
            id: id.into(),
            info,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// Decode the info blob as JSON into `T`. Returns `Ok(None)` when there is no info.
    pub fn info_as<T: DeserializeOwned>(&self) -> Result<Option<T>, DecodeError> {
        match &self.info {
            Some(info) => Ok(Some(serde_json::from_str(info)?)),
            None => Ok(None),
        }
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.info {
            Some(info) => write!(f, "Member(id={}, info={})", self.id, info),
            None => write!(f, "Member(id={})", self.id),
        }
    }
}

/// Member ids arrive as strings, though some servers send numbers; those
/// are kept in their decimal form.
pub(crate) fn id_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(id) => Some(id.clone()),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Normalise a wire info value: `null` is no info, a string is kept verbatim,
/// anything else is re-encoded as compact JSON.
pub(crate) fn info_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        name: String,
    }

    #[test]
    fn equality_ignores_info() {
        let a = Member::new("1", Some("a".into()));
        let b = Member::new("1", None);
        assert_eq!(a, b);
        assert_ne!(a, Member::new("2", Some("a".into())));

        let set: HashSet<Member> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn info_as_decodes_json() {
        let member = Member::new("1", Some(r#"{"name":"Phil"}"#.into()));
        let profile: Option<Profile> = member.info_as().unwrap();
        assert_eq!(
            profile,
            Some(Profile {
                name: "Phil".into()
            })
        );

        assert!(Member::new("2", None).info_as::<Profile>().unwrap().is_none());
        assert!(Member::new("3", Some("not json".into()))
            .info_as::<Profile>()
            .is_err());
    }

    #[test]
    fn info_normalisation() {
        assert_eq!(info_from_value(json!(null)), None);
        assert_eq!(info_from_value(json!("plain")), Some("plain".to_string()));
        assert_eq!(
            info_from_value(json!({"name": "Phil"})),
            Some(r#"{"name":"Phil"}"#.to_string())
        );
        assert_eq!(info_from_value(json!(7)), Some("7".to_string()));
    }

    #[test]
    fn ids_from_strings_and_numbers() {
        assert_eq!(id_from_value(&json!("7")), Some("7".to_string()));
        assert_eq!(id_from_value(&json!(42)), Some("42".to_string()));
        assert_eq!(id_from_value(&json!(null)), None);
        assert_eq!(id_from_value(&json!({"id": 1})), None);
    }

    #[test]
    fn display() {
        assert_eq!(
            Member::new("1", Some("a".into())).to_string(),
            "Member(id=1, info=a)"
        );
        assert_eq!(Member::new("2", None).to_string(), "Member(id=2)");
    }
}
