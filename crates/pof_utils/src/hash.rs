//! Hash states and containers, re-exporting *hashbrown* and *foldhash*.
//!
//! [`FixedHashState`] seeds `foldhash` with a constant, so the hash codes of
//! metadata and keys only depend on their content and are comparable across
//! runs. [`NoOpHashState`] passes a written `u64` through unchanged and is
//! meant for `TypeId` keys.

use core::hash::{BuildHasher, Hash, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const SEED: u64 = 0x5f0f_2c3d_a1b7_9e41;

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A `foldhash` state with a constant seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use pof_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("lastName"), FixedHashState.hash_one("lastName"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        const STATE: FixedState = FixedState::with_seed(SEED);
        STATE.build_hasher()
    }
}

/// Hashes `value` with [`FixedHashState`].
#[inline]
pub fn fixed_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    FixedHashState.hash_one(value)
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// Keeps the last `u64` written as the hash.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher(u64);

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = (self.0 << 8) ^ u64::from(byte);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
}

/// Builds [`NoOpHasher`]s.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use pof_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// 1001_u64.hash(&mut hasher);
/// assert_eq!(hasher.finish(), 1001);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher(0)
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// Creates an empty [`HashMap`] with the fixed hash state.
#[inline]
pub const fn new_map<K, V>() -> HashMap<K, V> {
    hashbrown::HashMap::with_hasher(FixedHashState)
}

pub use foldhash;
pub use hashbrown;
