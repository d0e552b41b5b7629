//! Positional argument matching
//!
//! Stored argument sequences are compared against a call's arguments one
//! position at a time. Nothing is hashed or canonicalized: values compare by
//! value, shared handles compare by identity.

use std::rc::Rc;
use std::sync::Arc;

/// Strict, non-structural equality for memoized arguments.
///
/// Scalars and strings compare by value. `Rc` and `Arc` compare by pointer
/// identity, so an object mutated in place still matches the handle it was
/// cached under while an equal but distinct object does not.
pub trait StrictEq {
    /// Returns `true` if `self` and `other` are strictly equal.
    fn strict_eq(&self, other: &Self) -> bool;
}

macro_rules! strict_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StrictEq for $ty {
                #[inline]
                fn strict_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

// Floats use IEEE comparison: NaN never matches, 0.0 matches -0.0.
strict_eq_by_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, (),
    String,
);

impl StrictEq for &str {
    #[inline]
    fn strict_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: ?Sized> StrictEq for Rc<T> {
    #[inline]
    fn strict_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> StrictEq for Arc<T> {
    #[inline]
    fn strict_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: StrictEq> StrictEq for Option<T> {
    fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.strict_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Check whether a stored argument sequence matches a call.
///
/// Sequences of different length never match, even when every overlapping
/// position is equal.
pub fn args_match<A: StrictEq>(stored: &[A], call: &[A]) -> bool {
    stored.len() == call.len() && stored.iter().zip(call).all(|(a, b)| a.strict_eq(b))
}
