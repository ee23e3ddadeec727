//! Capacity-bounded strings for the fixed-schema environment record.
//!
//! A value fits when its byte length is strictly below the capacity; the last
//! slot stays reserved the same way a terminated buffer reserves it.

use crate::error::CapacityError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Maximum length of a short name (user, zone, host, hash scheme).
pub const NAME_LEN: usize = 64;
/// Maximum length of a long name (policies, authentication file).
pub const LONG_NAME_LEN: usize = 256;
/// Maximum length of a header-type value (encryption algorithm).
pub const HEADER_TYPE_LEN: usize = 128;
/// Maximum length of a path (home, cwd, certificates, plugin directory).
pub const MAX_NAME_LEN: usize = 1024 + 64;

/// An owned string whose assignment is checked against a fixed capacity.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedString<const N: usize>(String);

impl<const N: usize> BoundedString<N> {
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Replace the contents with `value`, or leave them untouched if `value`
    /// does not fit.
    pub fn assign(&mut self, value: &str) -> Result<(), CapacityError> {
        if value.len() >= N {
            return Err(CapacityError {
                len: value.len(),
                capacity: N,
            });
        }
        self.0.clear();
        self.0.push_str(value);
        Ok(())
    }

    /// Replace the contents with as much of `value` as fits.
    ///
    /// Returns `true` if the value had to be cut.
    pub fn assign_truncating(&mut self, value: &str) -> bool {
        if N == 0 {
            self.0.clear();
            return !value.is_empty();
        }
        let mut end = value.len().min(N - 1);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        self.0.clear();
        self.0.push_str(&value[..end]);
        end < value.len()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `None` when empty, which the record uses for "not configured".
    pub fn non_empty(&self) -> Option<&str> {
        if self.0.is_empty() { None } else { Some(&self.0) }
    }
}

impl<const N: usize> Deref for BoundedString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> TryFrom<&str> for BoundedString<N> {
    type Error = CapacityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut s = Self::new();
        s.assign(value)?;
        Ok(s)
    }
}

impl<const N: usize> PartialEq<&str> for BoundedString<N> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<const N: usize> fmt::Display for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> fmt::Debug for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<const N: usize> Serialize for BoundedString<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Object-safe view of a bounded string, so record fields of different
/// capacities can be addressed through one table.
pub trait TextField {
    fn capacity(&self) -> usize;
    fn assign_text(&mut self, value: &str) -> Result<(), CapacityError>;
}

impl<const N: usize> TextField for BoundedString<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn assign_text(&mut self, value: &str) -> Result<(), CapacityError> {
        self.assign(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_fits() {
        let mut s = BoundedString::<8>::new();
        s.assign("tempZon").unwrap();
        assert_eq!(s, "tempZon");
    }

    #[test]
    fn test_assign_at_capacity_is_rejected_without_writing() {
        let mut s = BoundedString::<8>::try_from("keep").unwrap();
        let err = s.assign("12345678").unwrap_err();
        assert_eq!(err.len, 8);
        assert_eq!(err.capacity, 8);
        assert_eq!(s, "keep");
    }

    #[test]
    fn test_assign_truncating_respects_char_boundaries() {
        let mut s = BoundedString::<4>::new();
        // 'é' is two bytes; only three bytes are available.
        assert!(s.assign_truncating("aéé"));
        assert_eq!(s, "aé");

        assert!(!s.assign_truncating("ab"));
        assert_eq!(s, "ab");
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut s = BoundedString::<0>::new();
        assert!(s.assign("").is_err());
        assert_eq!(s.capacity(), 0);
    }

    #[test]
    fn test_non_empty() {
        let mut s = BoundedString::<NAME_LEN>::new();
        assert_eq!(s.non_empty(), None);
        s.assign("x").unwrap();
        assert_eq!(s.non_empty(), Some("x"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let s = BoundedString::<NAME_LEN>::try_from("alice").unwrap();
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"alice\"");
    }
}
