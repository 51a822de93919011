//! Position keys for sentence slots
//!
//! Real tokens are addressed by positive integers (the virtual root is 0).
//! Markup fragments stripped before parsing live between two real tokens and
//! get rational keys in the open interval `(boundary, boundary + 1)`, so one
//! ordered key space covers both.

use std::cmp::Ordering;
use std::fmt;

/// Integer key of a real token
pub type TokenId = usize;

/// The virtual root every dependency chain ends at
pub const ROOT: TokenId = 0;

/// Fractional key of a markup fragment: `boundary + (ordinal + 1) / (count + 1)`
#[derive(Debug, Clone, Copy)]
pub struct MarkupKey {
    boundary: TokenId,
    ordinal: u32,
    count: u32,
}

impl MarkupKey {
    /// Key of fragment `ordinal` (0-based) out of `count` fragments at `boundary`
    pub fn new(boundary: TokenId, ordinal: u32, count: u32) -> Self {
        debug_assert!(ordinal < count, "fragment {ordinal} out of {count}");
        Self {
            boundary,
            ordinal,
            count,
        }
    }

    /// The real-token key this fragment follows (0 = before the first token)
    pub fn boundary(&self) -> TokenId {
        self.boundary
    }

    pub fn numerator(&self) -> u64 {
        self.ordinal as u64 + 1
    }

    pub fn denominator(&self) -> u64 {
        self.count as u64 + 1
    }

    /// Lossy view for display and debugging only; never use for ordering
    pub fn as_f64(&self) -> f64 {
        self.boundary as f64 + self.numerator() as f64 / self.denominator() as f64
    }
}

impl PartialEq for MarkupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MarkupKey {}

impl PartialOrd for MarkupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MarkupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.boundary.cmp(&other.boundary).then_with(|| {
            (self.numerator() * other.denominator()).cmp(&(other.numerator() * self.denominator()))
        })
    }
}

impl fmt::Display for MarkupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}+{}/{}",
            self.boundary,
            self.numerator(),
            self.denominator()
        )
    }
}

/// Generate the keys for `count` fragments sharing one boundary, in fragment order
pub fn fractional_keys(boundary: TokenId, count: usize) -> impl Iterator<Item = MarkupKey> {
    let count = count as u32;
    (0..count).map(move |ordinal| MarkupKey::new(boundary, ordinal, count))
}

/// Any addressable slot: a real token or a markup fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKey {
    Token(TokenId),
    Markup(MarkupKey),
}

impl SlotKey {
    /// Integer part of the key
    pub fn floor(&self) -> TokenId {
        match self {
            SlotKey::Token(id) => *id,
            SlotKey::Markup(key) => key.boundary(),
        }
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, SlotKey::Markup(_))
    }
}

impl PartialOrd for SlotKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SlotKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SlotKey::Token(a), SlotKey::Token(b)) => a.cmp(b),
            (SlotKey::Markup(a), SlotKey::Markup(b)) => a.cmp(b),
            // A markup key is strictly greater than its own floor
            (SlotKey::Token(a), SlotKey::Markup(b)) => {
                a.cmp(&b.boundary()).then(Ordering::Less)
            }
            (SlotKey::Markup(a), SlotKey::Token(b)) => {
                a.boundary().cmp(b).then(Ordering::Greater)
            }
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Token(id) => write!(f, "{}", id),
            SlotKey::Markup(key) => write!(f, "{}", key),
        }
    }
}

impl From<TokenId> for SlotKey {
    fn from(id: TokenId) -> Self {
        SlotKey::Token(id)
    }
}

impl From<MarkupKey> for SlotKey {
    fn from(key: MarkupKey) -> Self {
        SlotKey::Markup(key)
    }
}
