use std::fmt;

use serde::Serialize;

/// Index of a class member in the loader's arena. Ids are dense and assigned
/// in discovery order, the seed being `MemberId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MemberId(pub(crate) usize);

impl MemberId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where mutating a member at one vertex leads: the neighbouring member and
/// the vertex of that neighbour which mutates back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub target: MemberId,
    pub vertex: usize,
}

/// One pull from the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem<Q> {
    Member(Q),
    /// An infinite-type quiver was reached; nothing further is produced.
    Infinite,
}

impl<Q> ClassItem<Q> {
    pub fn member(self) -> Option<Q> {
        match self {
            ClassItem::Member(quiver) => Some(quiver),
            ClassItem::Infinite => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, ClassItem::Infinite)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassState {
    Active,
    Finite,
    Infinite,
}

/// Size of a mutation class, with infinite classes kept distinct from any
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassSize {
    Finite(usize),
    Infinite,
}

impl ClassSize {
    pub fn is_finite(self) -> bool {
        matches!(self, ClassSize::Finite(_))
    }

    pub fn count(self) -> Option<usize> {
        match self {
            ClassSize::Finite(count) => Some(count),
            ClassSize::Infinite => None,
        }
    }

    /// Integer form used at numeric boundaries: `-1` for infinite classes.
    pub fn as_i64(self) -> i64 {
        match self {
            ClassSize::Finite(count) => i64::try_from(count).unwrap_or(i64::MAX),
            ClassSize::Infinite => -1,
        }
    }
}

impl fmt::Display for ClassSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassSize::Finite(count) => write!(f, "{count}"),
            ClassSize::Infinite => f.write_str("infinite"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_size_boundaries() {
        assert_eq!(ClassSize::Finite(19).as_i64(), 19);
        assert_eq!(ClassSize::Infinite.as_i64(), -1);
        assert_eq!(ClassSize::Finite(0).to_string(), "0");
        assert_eq!(ClassSize::Infinite.to_string(), "infinite");
        assert_eq!(ClassSize::Infinite.count(), None);
        assert!(!ClassSize::Infinite.is_finite());
    }

    #[test]
    fn class_item_accessors() {
        assert_eq!(ClassItem::Member(3).member(), Some(3));
        assert!(ClassItem::<u8>::Infinite.is_infinite());
        assert_eq!(MemberId(4).to_string(), "#4");
    }
}
