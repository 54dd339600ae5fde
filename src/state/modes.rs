//! Mode flag sets shared by users, channels, and clients.

use serde::Serialize;
use std::collections::BTreeSet;

/// A set of active mode letters.
///
/// Serializes as a JSON array of one-character strings in ascending
/// character order, e.g. `["S", "i", "w"]`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModeSet(BTreeSet<char>);

impl ModeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a mode string like `"+iw"`.
    ///
    /// Equivalent to applying the string to an empty set, so `"+iw-w"`
    /// yields `{i}`.
    pub fn parse(modes: &str) -> Self {
        let mut set = Self::new();
        set.apply(modes);
        set
    }

    /// Apply a mode change string like `"+nt-s"`.
    ///
    /// Letters before any sign are treated as additions. Non-alphabetic
    /// characters other than the signs are ignored.
    pub fn apply(&mut self, changes: &str) {
        let mut adding = true;
        for c in changes.chars() {
            match c {
                '+' => adding = true,
                '-' => adding = false,
                c if c.is_ascii_alphabetic() => {
                    if adding {
                        self.0.insert(c);
                    } else {
                        self.0.remove(&c);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn contains(&self, mode: char) -> bool {
        self.0.contains(&mode)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Convert modes to a string like `"+iw"`.
    pub fn as_mode_string(&self) -> String {
        let mut s = String::with_capacity(self.0.len() + 1);
        s.push('+');
        s.extend(self.0.iter());
        s
    }
}

impl FromIterator<char> for ModeSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().filter(char::is_ascii_alphabetic).collect())
    }
}
