//! The authoritative member set of one presence channel.

use std::collections::HashMap;

use crate::member::Member;

/// Members in insertion order, unique by id.
#[derive(Debug, Clone, Default)]
pub struct MembershipSet {
    members: Vec<Member>,
    /// id -> position in `members`.
    index: HashMap<String, usize>,
}

impl MembershipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set. Order follows `ids`; repeated ids keep their first position.
    pub fn apply_snapshot(&mut self, ids: Vec<String>, hash: &HashMap<String, Option<String>>) {
        self.members.clear();
        self.index.clear();
        for id in ids {
            if self.index.contains_key(&id) {
                continue;
            }
            let info = hash.get(&id).cloned().flatten();
            self.index.insert(id.clone(), self.members.len());
            self.members.push(Member::new(id, info));
        }
    }

    /// Insert, or replace the info of an existing member in place.
    pub fn apply_member_added(&mut self, member: Member) {
        match self.index.get(member.id()) {
            Some(&pos) => self.members[pos] = member,
            None => {
                self.index.insert(member.id().to_string(), self.members.len());
                self.members.push(member);
            }
        }
    }

    /// Remove by id. Absent ids are ignored.
    pub fn apply_member_removed(&mut self, id: &str) -> Option<Member> {
        let pos = self.index.remove(id)?;
        let removed = self.members.remove(pos);
        for member in &self.members[pos..] {
            if let Some(slot) = self.index.get_mut(member.id()) {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.index.clear();
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.index.get(id).map(|&pos| &self.members[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn hash(entries: &[(&str, Option<&str>)]) -> HashMap<String, Option<String>> {
        entries
            .iter()
            .map(|(id, info)| (id.to_string(), info.map(str::to_string)))
            .collect()
    }

    fn member_ids(set: &MembershipSet) -> Vec<&str> {
        set.members().iter().map(Member::id).collect()
    }

    #[test]
    fn snapshot_preserves_order_and_info() {
        let mut set = MembershipSet::new();
        set.apply_snapshot(ids(&["1", "2"]), &hash(&[("1", Some("a")), ("2", None)]));

        assert_eq!(member_ids(&set), vec!["1", "2"]);
        assert_eq!(set.get("1").unwrap().info(), Some("a"));
        assert_eq!(set.get("2").unwrap().info(), None);
    }

    #[test]
    fn snapshot_collapses_duplicate_ids() {
        let mut set = MembershipSet::new();
        set.apply_snapshot(ids(&["1", "2", "1", "3", "2"]), &HashMap::new());
        assert_eq!(set.len(), 3);
        assert_eq!(member_ids(&set), vec!["1", "2", "3"]);
    }

    #[test]
    fn snapshot_replaces_previous_state() {
        let mut set = MembershipSet::new();
        set.apply_member_added(Member::new("early", None));
        set.apply_snapshot(ids(&["1"]), &HashMap::new());
        assert_eq!(member_ids(&set), vec!["1"]);
        assert!(!set.contains("early"));
    }

    #[test]
    fn snapshot_id_missing_from_hash_has_no_info() {
        let mut set = MembershipSet::new();
        set.apply_snapshot(ids(&["1"]), &HashMap::new());
        assert_eq!(set.get("1").unwrap().info(), None);
    }

    #[test]
    fn repeated_add_overwrites_info() {
        let mut set = MembershipSet::new();
        set.apply_member_added(Member::new("1", Some("first".into())));
        set.apply_member_added(Member::new("2", None));
        set.apply_member_added(Member::new("1", Some("second".into())));

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("1").unwrap().info(), Some("second"));
        assert_eq!(member_ids(&set), vec!["1", "2"]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set = MembershipSet::new();
        set.apply_snapshot(ids(&["1", "2"]), &HashMap::new());

        assert!(set.apply_member_removed("9").is_none());
        assert_eq!(member_ids(&set), vec!["1", "2"]);
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut set = MembershipSet::new();
        set.apply_snapshot(ids(&["1", "2", "3", "4"]), &HashMap::new());

        let removed = set.apply_member_removed("2").unwrap();
        assert_eq!(removed.id(), "2");
        assert_eq!(member_ids(&set), vec!["1", "3", "4"]);
        assert_eq!(set.get("4").unwrap().id(), "4");

        set.apply_member_added(Member::new("3", Some("x".into())));
        assert_eq!(set.get("3").unwrap().info(), Some("x"));
        assert_eq!(member_ids(&set), vec!["1", "3", "4"]);
    }

    #[test]
    fn deltas_before_snapshot_are_tolerated() {
        let mut set = MembershipSet::new();
        set.apply_member_removed("1");
        set.apply_member_added(Member::new("1", None));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clear_forgets_every_member() {
        let mut set = MembershipSet::new();
        set.apply_snapshot(ids(&["1", "2"]), &HashMap::new());
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains("1"));

        set.apply_member_added(Member::new("2", None));
        assert_eq!(member_ids(&set), vec!["2"]);
    }
}
