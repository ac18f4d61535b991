//! State identity for beam deduplication.

use std::hash::Hash;

/// Maps a state to the key two candidates must share to count as the same
/// beam slot.
///
/// Floats compare by bit pattern, so `0.1 + 0.2` and `0.3` are distinct
/// states while two children carrying the same value collapse to one.
pub trait StateKey {
    /// Hashable identity.
    type Key: Eq + Hash;

    /// Compute the identity of this state.
    fn state_key(&self) -> Self::Key;
}

macro_rules! impl_state_key_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StateKey for $ty {
                type Key = $ty;

                fn state_key(&self) -> Self::Key {
                    self.clone()
                }
            }
        )*
    };
}

impl_state_key_by_value!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, String,
);

impl StateKey for f64 {
    type Key = u64;

    fn state_key(&self) -> Self::Key {
        // Fold -0.0 into 0.0 so they share a slot.
        (*self + 0.0).to_bits()
    }
}

impl StateKey for f32 {
    type Key = u32;

    fn state_key(&self) -> Self::Key {
        (*self + 0.0).to_bits()
    }
}

impl StateKey for &str {
    type Key = String;

    fn state_key(&self) -> Self::Key {
        (*self).to_string()
    }
}

impl<T: StateKey> StateKey for Vec<T> {
    type Key = Vec<T::Key>;

    fn state_key(&self) -> Self::Key {
        self.iter().map(StateKey::state_key).collect()
    }
}

impl<T: StateKey> StateKey for Option<T> {
    type Key = Option<T::Key>;

    fn state_key(&self) -> Self::Key {
        self.as_ref().map(StateKey::state_key)
    }
}

impl<A: StateKey, B: StateKey> StateKey for (A, B) {
    type Key = (A::Key, B::Key);

    fn state_key(&self) -> Self::Key {
        (self.0.state_key(), self.1.state_key())
    }
}

impl<A: StateKey, B: StateKey, C: StateKey> StateKey for (A, B, C) {
    type Key = (A::Key, B::Key, C::Key);

    fn state_key(&self) -> Self::Key {
        (self.0.state_key(), self.1.state_key(), self.2.state_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_key_by_bits() {
        assert_eq!(0.5f64.state_key(), 0.5f64.state_key());
        assert_ne!((0.1f64 + 0.2).state_key(), 0.3f64.state_key());
        assert_eq!((-0.0f64).state_key(), 0.0f64.state_key());
        assert_eq!((-0.0f32).state_key(), 0.0f32.state_key());
    }

    #[test]
    fn strings_key_by_value() {
        assert_eq!("step".state_key(), String::from("step").state_key());
    }

    #[test]
    fn composites_key_elementwise() {
        let a = vec![(1u32, 0.5f64), (2, 1.0)];
        let b = vec![(1u32, 0.5f64), (2, 1.0)];
        let c = vec![(1u32, 0.5f64)];
        assert_eq!(a.state_key(), b.state_key());
        assert_ne!(a.state_key(), c.state_key());
        assert_ne!(Some(1u8).state_key(), None::<u8>.state_key());
    }
}
