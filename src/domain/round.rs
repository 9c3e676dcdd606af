use serde::{Deserialize, Serialize};

use crate::domain::player::PlayerId;

/// An unordered pair of player ids, normalized at construction so
/// `{a, b} == {b, a}` and hashes identically regardless of insertion
/// order (REDESIGN FLAGS, §9) — replaces the original's reliance on an
/// unordered two-element collection with ad hoc equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnorderedPair(PlayerId, PlayerId);

impl UnorderedPair {
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            UnorderedPair(a, b)
        } else {
            UnorderedPair(b, a)
        }
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        &self.0 == id || &self.1 == id
    }

    pub fn ids(&self) -> (&PlayerId, &PlayerId) {
        (&self.0, &self.1)
    }
}

impl Serialize for UnorderedPair {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (&self.0, &self.1).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UnorderedPair {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (a, b) = <(PlayerId, PlayerId)>::deserialize(deserializer)?;
        Ok(UnorderedPair::new(a, b))
    }
}

/// A single (white, black) pairing for a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub white: PlayerId,
    pub black: PlayerId,
}

impl Pairing {
    pub fn new(white: PlayerId, black: PlayerId) -> Self {
        Pairing { white, black }
    }

    pub fn as_unordered_pair(&self) -> UnorderedPair {
        UnorderedPair::new(self.white.clone(), self.black.clone())
    }
}

/// A round history entry: the pairings plus at most one bye (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub pairings: Vec<Pairing>,
    pub bye: Option<PlayerId>,
}
