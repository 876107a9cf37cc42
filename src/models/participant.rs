use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key under which a participant is unique within an event: surrounding
/// whitespace trimmed, case folded.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    /// Empty means no password was set.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default)]
    pub availability: Vec<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, password: impl Into<String>, availability: Vec<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            availability,
        }
    }

    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

/// The participants of one event, in first-submission order, indexed by
/// normalized name.
///
/// Serialized as a plain list. When a stored list carries two entries with
/// the same normalized name, lookups resolve to the earlier one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Participant>", into = "Vec<Participant>")]
pub struct Participants {
    entries: Vec<Participant>,
    index: HashMap<String, usize>,
}

impl Participants {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Participant] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&Participant> {
        self.index
            .get(&normalize_name(name))
            .map(|&position| &self.entries[position])
    }

    /// Replaces the slots of the participant called `name`. Names and
    /// passwords are never changed after insertion. Returns whether a
    /// participant matched.
    pub fn set_availability(&mut self, name: &str, availability: Vec<String>) -> bool {
        match self.index.get(&normalize_name(name)) {
            Some(&position) => {
                self.entries[position].availability = availability;
                true
            }
            None => false,
        }
    }

    /// Appends `participant` unless its name is already taken. Returns whether
    /// it was added.
    pub fn insert(&mut self, participant: Participant) -> bool {
        let key = participant.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(participant);
        true
    }

    /// Drops stored passwords, for responses that leave the server.
    pub fn clear_passwords(&mut self) {
        for participant in &mut self.entries {
            participant.password.clear();
        }
    }
}

impl From<Vec<Participant>> for Participants {
    fn from(entries: Vec<Participant>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, participant) in entries.iter().enumerate() {
            index.entry(participant.key()).or_insert(position);
        }
        Self { entries, index }
    }
}

impl From<Participants> for Vec<Participant> {
    fn from(participants: Participants) -> Self {
        participants.entries
    }
}

impl PartialEq for Participants {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a Participants {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
