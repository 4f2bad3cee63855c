use core::fmt;

// -----------------------------------------------------------------------------
// TypeKey

/// Identifies one [`ClassMetadata`](crate::ClassMetadata): its user type id,
/// its version id and a structural hash.
///
/// Two metadata with equal keys are interchangeable.
///
/// # Examples
///
/// ```
/// use pof_meta::TypeKey;
///
/// let key = TypeKey::new(1001, 0, 0);
/// assert_eq!(key, TypeKey::new(1001, 0, 0));
/// assert_ne!(key, TypeKey::new(1001, 1, 0));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    type_id: i32,
    version_id: i32,
    hash: i32,
}

impl TypeKey {
    #[inline]
    pub const fn new(type_id: i32, version_id: i32, hash: i32) -> Self {
        Self {
            type_id,
            version_id,
            hash,
        }
    }

    #[inline]
    pub const fn type_id(&self) -> i32 {
        self.type_id
    }

    #[inline]
    pub const fn version_id(&self) -> i32 {
        self.version_id
    }

    /// The externally supplied structural hash.
    #[inline]
    pub const fn hash(&self) -> i32 {
        self.hash
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypeKey(type_id={}, version_id={}, hash={})",
            self.type_id, self.version_id, self.hash
        )
    }
}
