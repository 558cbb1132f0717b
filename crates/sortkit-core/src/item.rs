#![forbid(unsafe_code)]

//! Item identifiers, ordered lists, and drag kinds.
//!
//! # Invariants
//!
//! 1. An [`OrderedList`] never contains the same [`ItemId`] twice.
//! 2. Order is meaningful: it is the display and processing order.
//! 3. A list is only grown by [`OrderedList::try_push`] and otherwise replaced
//!    wholesale (reorders produce a new list).

use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Opaque identifier of a list item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(Arc<str>);

impl ItemId {
    /// Create a new identifier.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// DragKind
// ---------------------------------------------------------------------------

/// MIME-like type of a drag source, used to match sources against targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DragKind(Arc<str>);

impl DragKind {
    /// Kind used when a list does not declare its own.
    pub const DEFAULT: &'static str = "sortkit/item";

    /// Create a new drag kind.
    #[must_use]
    pub fn new(kind: impl Into<Arc<str>>) -> Self {
        Self(kind.into())
    }

    /// The kind as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether an accept `pattern` matches this kind.
    ///
    /// Patterns are an exact kind, `*`, `*/*`, or `prefix/*`.
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        let kind = self.as_str();
        if pattern == "*" || pattern == "*/*" {
            true
        } else if let Some(prefix) = pattern.strip_suffix("/*") {
            kind.starts_with(prefix) && kind.as_bytes().get(prefix.len()) == Some(&b'/')
        } else {
            pattern == kind
        }
    }
}

impl Default for DragKind {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for DragKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DragKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

// ---------------------------------------------------------------------------
// ListError
// ---------------------------------------------------------------------------

/// Errors raised while building or growing an [`OrderedList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The identifier is already present.
    DuplicateId { id: ItemId },
    /// The list is at its capacity.
    CapacityExceeded { capacity: usize },
    /// Identifiers must be non-empty.
    EmptyId,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "duplicate item id {:?}", id.as_str()),
            Self::CapacityExceeded { capacity } => {
                write!(f, "list is full ({capacity} items)")
            }
            Self::EmptyId => write!(f, "item id must not be empty"),
        }
    }
}

impl std::error::Error for ListError {}

// ---------------------------------------------------------------------------
// OrderedList
// ---------------------------------------------------------------------------

/// An ordered sequence of unique item identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OrderedList {
    ids: Vec<ItemId>,
}

impl OrderedList {
    /// Build a list, rejecting empty or duplicate identifiers.
    pub fn new<I, T>(ids: I) -> Result<Self, ListError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        let mut list = Self::default();
        for id in ids {
            list.push_unbounded(id.into())?;
        }
        Ok(list)
    }

    /// Build a list from identifiers already known to be unique.
    ///
    /// Used by the reorder engine, whose output is a permutation of a valid
    /// list.
    pub(crate) fn from_permutation(ids: Vec<ItemId>) -> Self {
        debug_assert!(
            ids.iter()
                .enumerate()
                .all(|(i, id)| !ids[..i].contains(id)),
            "permutation must not introduce duplicates"
        );
        Self { ids }
    }

    /// Append an identifier, enforcing uniqueness and an optional capacity.
    pub fn try_push(&mut self, id: ItemId, capacity: Option<usize>) -> Result<(), ListError> {
        if let Some(capacity) = capacity
            && self.ids.len() >= capacity
        {
            return Err(ListError::CapacityExceeded { capacity });
        }
        self.push_unbounded(id)
    }

    fn push_unbounded(&mut self, id: ItemId) -> Result<(), ListError> {
        if id.as_str().is_empty() {
            return Err(ListError::EmptyId);
        }
        if self.contains(&id) {
            return Err(ListError::DuplicateId { id });
        }
        self.ids.push(id);
        Ok(())
    }

    /// Remove an identifier, returning whether it was present.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Position of `id`, if present.
    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Whether `id` is present.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The identifiers in order.
    #[must_use]
    pub fn as_slice(&self) -> &[ItemId] {
        &self.ids
    }

    /// Iterate identifiers in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemId> {
        self.ids.iter()
    }
}

impl<'a> IntoIterator for &'a OrderedList {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl fmt::Display for OrderedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(id.as_str())?;
        }
        f.write_str("]")
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for OrderedList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<ItemId>::deserialize(deserializer)?;
        Self::new(ids).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> OrderedList {
        OrderedList::new(ids.iter().copied()).expect("valid list")
    }

    #[test]
    fn new_rejects_duplicates() {
        let err = OrderedList::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, ListError::DuplicateId { id: ItemId::from("a") });
        assert_eq!(err.to_string(), "duplicate item id \"a\"");
    }

    #[test]
    fn new_rejects_empty_id() {
        assert_eq!(OrderedList::new(["a", ""]), Err(ListError::EmptyId));
    }

    #[test]
    fn try_push_respects_capacity() {
        let mut l = list(&["a", "b"]);
        assert!(l.try_push("c".into(), Some(3)).is_ok());
        assert_eq!(
            l.try_push("d".into(), Some(3)),
            Err(ListError::CapacityExceeded { capacity: 3 })
        );
        assert!(l.try_push("d".into(), None).is_ok());
        assert_eq!(l.len(), 4);
    }

    #[test]
    fn try_push_rejects_duplicate_even_with_room() {
        let mut l = list(&["a"]);
        assert!(matches!(
            l.try_push("a".into(), Some(10)),
            Err(ListError::DuplicateId { .. })
        ));
    }

    #[test]
    fn index_and_remove() {
        let mut l = list(&["x", "y", "z"]);
        assert_eq!(l.index_of(&"y".into()), Some(1));
        assert!(l.remove(&"y".into()));
        assert!(!l.remove(&"y".into()));
        assert_eq!(l.to_string(), "[x, z]");
    }

    #[test]
    fn drag_kind_patterns() {
        let kind = DragKind::new("sortkit/ref-image");
        assert!(kind.matches("sortkit/ref-image"));
        assert!(kind.matches("sortkit/*"));
        assert!(kind.matches("*"));
        assert!(kind.matches("*/*"));
        assert!(!kind.matches("sort/*"));
        assert!(!kind.matches("sortkit/layer"));
    }

    #[test]
    fn default_kind() {
        assert_eq!(DragKind::default().as_str(), DragKind::DEFAULT);
    }
}
