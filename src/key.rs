//! Key derivation.
//!
//! A key is built from the fields an object family designates *intrinsic*:
//! the shared, reusable part of its construction parameters. Two requests
//! with equal keys receive the same shared object, so extrinsic fields
//! (positions, per-use context) must never take part in a key.

use std::fmt::Debug;
use std::hash::Hash;

/// Bounds every registry key satisfies.
///
/// Implemented automatically for any type that is comparable, hashable,
/// cloneable, printable and shareable across threads.
pub trait RegistryKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> RegistryKey for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// The intrinsic fields of an object family.
///
/// `key` must be a pure function of `self`: the same field values always
/// produce equal keys, independent of call order or any other state.
///
/// # Examples
///
/// ```rust
/// use intern_registry::Intrinsic;
///
/// struct Glyph {
///     font: String,
///     codepoint: char,
/// }
///
/// impl Intrinsic for Glyph {
///     type Key = (String, char);
///
///     fn key(&self) -> Self::Key {
///         (self.font.to_lowercase(), self.codepoint)
///     }
/// }
///
/// let a = Glyph { font: "Mono".into(), codepoint: 'a' };
/// let b = Glyph { font: "mono".into(), codepoint: 'a' };
/// assert_eq!(a.key(), b.key());
/// ```
pub trait Intrinsic {
    /// Canonical key type shared by equal intrinsic tuples.
    type Key: RegistryKey;

    /// Derives the canonical key for these intrinsic fields.
    fn key(&self) -> Self::Key;
}

macro_rules! intrinsic_identity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Intrinsic for $ty {
                type Key = $ty;

                fn key(&self) -> Self::Key {
                    self.clone()
                }
            }
        )*
    };
}

intrinsic_identity!(
    String,
    &'static str,
    char,
    bool,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
);

impl<A: Intrinsic, B: Intrinsic> Intrinsic for (A, B) {
    type Key = (A::Key, B::Key);

    fn key(&self) -> Self::Key {
        (self.0.key(), self.1.key())
    }
}

impl<A: Intrinsic, B: Intrinsic, C: Intrinsic> Intrinsic for (A, B, C) {
    type Key = (A::Key, B::Key, C::Key);

    fn key(&self) -> Self::Key {
        (self.0.key(), self.1.key(), self.2.key())
    }
}
