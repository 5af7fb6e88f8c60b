// src/members.rs
//! Process-wide member roster.
//!
//! A member's identity is the exact `(name, party, state)` triple. Ids are
//! assigned from 0 in order of first sighting and double as the row index of
//! the `senators_<year>` table. The index is an `IndexSet`, so lookup and
//! insertion are O(1) expected and the set position *is* the id.

use indexmap::IndexSet;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    pub name: String,
    pub party: String,
    pub state: String,
}

impl Member {
    pub fn new(name: impl Into<String>, party: impl Into<String>, state: impl Into<String>) -> Self {
        Self { name: name.into(), party: party.into(), state: state.into() }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemberRegistry {
    members: IndexSet<Member>,
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the member with exactly this triple, registering it on first sighting.
    pub fn resolve_or_insert(&mut self, name: &str, party: &str, state: &str) -> u32 {
        let key = Member::new(name, party, state);
        if let Some(id) = self.members.get_index_of(&key) {
            return id as u32;
        }
        let (id, _) = self.members.insert_full(key);
        tracing::debug!("member #{id}: {name} ({party}-{state})");
        id as u32
    }

    pub fn get(&self, id: u32) -> Option<&Member> {
        self.members.get_index(id as usize)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `(member_id, member)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Member)> {
        self.members.iter().enumerate().map(|(i, m)| (i as u32, m))
    }
}
