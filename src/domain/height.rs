//! Fixed-width height arithmetic for the balance check.
//!
//! Heights only ever grow by one per level. The increment is checked so that a type that
//! runs out of range reports it instead of wrapping around to a small (and wrongly
//! "balanced") value.

use std::fmt;

pub trait Height: Copy + Ord + fmt::Debug + fmt::Display {
    /// Height of the empty subtree.
    const ZERO: Self;
    /// Largest representable height.
    const MAX: Self;

    /// `self + 1`, or `None` when that is not representable.
    fn checked_succ(self) -> Option<Self>;

    /// `|self - other| > 1` without signed arithmetic.
    fn differs_by_more_than_one(self, other: Self) -> bool {
        let (low, high) = if self <= other { (self, other) } else { (other, self) };
        match low.checked_succ() {
            Some(next) => high > next,
            None => false,
        }
    }
}

macro_rules! impl_height {
    ($($t:ty),*) => {
        $(
            impl Height for $t {
                const ZERO: Self = 0;
                const MAX: Self = <$t>::MAX;

                fn checked_succ(self) -> Option<Self> {
                    self.checked_add(1)
                }

                fn differs_by_more_than_one(self, other: Self) -> bool {
                    self.abs_diff(other) > 1
                }
            }
        )*
    };
}

impl_height!(u8, u16, u32, u64, u128, usize);
