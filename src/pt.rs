use std::fmt::Display;
use std::hash::Hash;
use std::hash::Hasher;

use crate::cast::{CastFrom, strict_cast};
use crate::contract::contract;
use crate::round::{ceil_cast, floor_cast, round_cast};
use crate::sign::Integral;

/// A geometric quantity: position, length or offset on the page.
///
/// Always finite: `From<f32>` treats NaN and infinities as a contract
/// violation and [`Pt::finite`] reports them as `None`. Conversions to
/// pixel counts go through the checked rounding casts and never clamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pt(pub(crate) f32);

impl Display for Pt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for Pt {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Pt {}

impl Hash for Pt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

impl PartialOrd for Pt {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pt {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    pub fn as_f32(self) -> f32 {
        self.0
    }

    /// `None` for NaN and infinities. Use this for values read from outside.
    pub fn finite(value: f32) -> Option<Pt> {
        value.is_finite().then_some(Pt(value))
    }

    /// Nearest whole pixel, ties away from zero.
    #[track_caller]
    pub fn round_px<I: Integral + CastFrom<f32>>(self) -> I {
        round_cast(self.0)
    }

    #[track_caller]
    pub fn ceil_px<I: Integral + CastFrom<f32>>(self) -> I {
        ceil_cast(self.0)
    }

    #[track_caller]
    pub fn floor_px<I: Integral + CastFrom<f32>>(self) -> I {
        floor_cast(self.0)
    }
}

// Integer sources must land on an exact f32; anything past 2^24 that
// would round is a contract violation rather than a shifted coordinate.
macro_rules! impl_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Pt {
            #[track_caller]
            fn from(value: $t) -> Self {
                Pt(strict_cast::<f32, $t>(value))
            }
        }
    )*};
}

impl_from_int!(u8, u16, u32, usize, i32, i64);

impl From<f32> for Pt {
    #[track_caller]
    fn from(value: f32) -> Self {
        contract!(value.is_finite(), "{} is not a finite coordinate", value);
        Pt(value)
    }
}
