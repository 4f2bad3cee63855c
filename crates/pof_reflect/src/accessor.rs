//! Accessor naming rules.
//!
//! An accessor is a method whose name starts with `get`, `is` or `set`
//! followed by a non-empty remainder. The remainder, with its leading letter
//! lower-cased, is the canonical property name: `getFirstName` and
//! `setFirstName` both describe `firstName`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// AccessorKind

/// Whether a method reads or writes a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// `getX` or `isX`.
    Getter,
    /// `setX`.
    Setter,
}

impl AccessorKind {
    /// The accessor kind needed to complete a pair with this one.
    #[inline]
    pub const fn complement(self) -> Self {
        match self {
            Self::Getter => Self::Setter,
            Self::Setter => Self::Getter,
        }
    }
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Getter => f.write_str("getter"),
            Self::Setter => f.write_str("setter"),
        }
    }
}

const PREFIXES: [(&str, AccessorKind); 3] = [
    ("get", AccessorKind::Getter),
    ("is", AccessorKind::Getter),
    ("set", AccessorKind::Setter),
];

// -----------------------------------------------------------------------------
// Naming helpers

/// Splits an accessor name into its prefix, kind and remainder.
///
/// Returns `None` for names that are not accessors.
///
/// # Examples
///
/// ```
/// use pof_reflect::{AccessorKind, accessor_prefix};
///
/// assert_eq!(accessor_prefix("isAdult"), Some(("is", AccessorKind::Getter, "Adult")));
/// assert_eq!(accessor_prefix("setAge"), Some(("set", AccessorKind::Setter, "Age")));
/// assert_eq!(accessor_prefix("compute"), None);
/// assert_eq!(accessor_prefix("get"), None);
/// ```
pub fn accessor_prefix(name: &str) -> Option<(&'static str, AccessorKind, &str)> {
    PREFIXES.iter().find_map(|&(prefix, kind)| {
        name.strip_prefix(prefix)
            .filter(|rest| !rest.is_empty())
            .map(|rest| (prefix, kind, rest))
    })
}

/// Derives the canonical property name of an accessor.
///
/// # Examples
///
/// ```
/// use pof_reflect::property_name;
///
/// assert_eq!(property_name("getFirstName").as_deref(), Some("firstName"));
/// assert_eq!(property_name("isAdult").as_deref(), Some("adult"));
/// assert_eq!(property_name("toString"), None);
/// ```
pub fn property_name(method: &str) -> Option<String> {
    let (_, _, rest) = accessor_prefix(method)?;
    let mut chars = rest.chars();
    let first = chars.next()?;

    let mut name = String::with_capacity(rest.len());
    name.extend(first.to_lowercase());
    name.push_str(chars.as_str());
    Some(name)
}

/// Returns the candidate names of the accessor complementing `method`,
/// in lookup order.
///
/// A getter (`getX` or `isX`) is complemented by `setX`; a setter `setX` by
/// `getX` and then `isX`. The remainder keeps its case.
///
/// # Examples
///
/// ```
/// use pof_reflect::complement_names;
///
/// assert_eq!(complement_names("isMale"), ["setMale"]);
/// assert_eq!(complement_names("setMale"), ["getMale", "isMale"]);
/// assert!(complement_names("male").is_empty());
/// ```
pub fn complement_names(method: &str) -> Vec<String> {
    let Some((_, kind, rest)) = accessor_prefix(method) else {
        return Vec::new();
    };

    let target = kind.complement();
    PREFIXES
        .iter()
        .filter(|(_, k)| *k == target)
        .map(|(prefix, _)| {
            let mut name = String::with_capacity(prefix.len() + rest.len());
            name.push_str(prefix);
            name.push_str(rest);
            name
        })
        .collect()
}
