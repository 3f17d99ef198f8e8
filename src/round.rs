//! Float to integer conversions with an explicit rounding policy.
//!
//! Each conversion rounds first, then requires the integer result to equal
//! the rounded float exactly. The rounded intermediate is what gets checked,
//! so `ceil_cast::<i64, _>(3.0001)` is `4`. A value that is too large, too
//! small, NaN or infinite is a contract violation.

use crate::cast::{CastFrom, Primitive};
use crate::contract::contract;
use crate::sign::Integral;

pub trait Float: Primitive {
    /// Nearest integer, ties away from zero.
    fn round(self) -> Self;
    fn ceil(self) -> Self;
    fn floor(self) -> Self;
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Float for $t {
            #[inline]
            fn round(self) -> Self {
                <$t>::round(self)
            }

            #[inline]
            fn ceil(self) -> Self {
                <$t>::ceil(self)
            }

            #[inline]
            fn floor(self) -> Self {
                <$t>::floor(self)
            }
        }
    )*};
}

impl_float!(f32, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    Round,
    Ceil,
    Floor,
}

#[track_caller]
fn rounded_cast<I, F>(f: F, policy: Policy) -> I
where
    F: Float,
    I: Integral + CastFrom<F>,
{
    let rv0 = match policy {
        Policy::Round => f.round(),
        Policy::Ceil => f.ceil(),
        Policy::Floor => f.floor(),
    };
    let rv1 = I::cast_from(rv0);
    contract!(
        rv1.widen() == rv0.widen(),
        "{:?} ({:?}) of {:?}{} is not representable as {}",
        policy,
        rv0,
        f,
        F::NAME,
        I::NAME
    );
    rv1
}

/// Rounds to the nearest integer, ties away from zero.
///
/// ```
/// use spottedcat_cast::round_cast;
///
/// assert_eq!(round_cast::<i32, _>(2.5), 3);
/// assert_eq!(round_cast::<i32, _>(-2.5), -3);
/// ```
#[must_use]
#[track_caller]
pub fn round_cast<I, F>(f: F) -> I
where
    F: Float,
    I: Integral + CastFrom<F>,
{
    rounded_cast(f, Policy::Round)
}

/// Rounds toward positive infinity.
#[must_use]
#[track_caller]
pub fn ceil_cast<I, F>(f: F) -> I
where
    F: Float,
    I: Integral + CastFrom<F>,
{
    rounded_cast(f, Policy::Ceil)
}

/// Rounds toward negative infinity.
#[must_use]
#[track_caller]
pub fn floor_cast<I, F>(f: F) -> I
where
    F: Float,
    I: Integral + CastFrom<F>,
{
    rounded_cast(f, Policy::Floor)
}

/// Method form of the rounding conversions.
pub trait RoundCast: Float {
    #[must_use]
    #[track_caller]
    fn round_cast<I: Integral + CastFrom<Self>>(self) -> I {
        round_cast(self)
    }

    #[must_use]
    #[track_caller]
    fn ceil_cast<I: Integral + CastFrom<Self>>(self) -> I {
        ceil_cast(self)
    }

    #[must_use]
    #[track_caller]
    fn floor_cast<I: Integral + CastFrom<Self>>(self) -> I {
        floor_cast(self)
    }
}

impl<T: Float> RoundCast for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(round_cast::<i32, _>(2.5f64), 3);
        assert_eq!(round_cast::<i32, _>(-2.5f64), -3);
        assert_eq!(round_cast::<i64, _>(0.5f32), 1);
        assert_eq!(round_cast::<i64, _>(-0.5f32), -1);
        assert_eq!(round_cast::<u8, _>(254.4f64), 254);
    }

    #[test]
    fn test_rounded_intermediate_is_checked_not_the_input() {
        assert_eq!(ceil_cast::<i64, _>(3.0001f64), 4);
        assert_eq!(floor_cast::<i64, _>(3.9999f64), 3);
        assert_eq!(floor_cast::<i64, _>(-3.0001f64), -4);
        assert_eq!(ceil_cast::<i64, _>(-3.9999f64), -3);
    }

    #[test]
    fn test_exact_bounds() {
        assert_eq!(floor_cast::<i32, _>(f64::from(i32::MAX)), i32::MAX);
        assert_eq!(ceil_cast::<i32, _>(f64::from(i32::MIN)), i32::MIN);
        assert_eq!(round_cast::<u8, _>(255.4f32), 255);
        assert_eq!(ceil_cast::<u32, _>(-0.5f64), 0);
    }

    #[test]
    fn test_method_form() {
        assert_eq!(7.5f32.round_cast::<i16>(), 8);
        assert_eq!(7.5f32.floor_cast::<i16>(), 7);
        assert_eq!(7.5f32.ceil_cast::<usize>(), 8);
    }

    #[test]
    #[should_panic(expected = "not representable as i32")]
    fn test_round_overflow() {
        let _ = round_cast::<i32, _>(1e30f64);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_round_nan() {
        let _ = round_cast::<i64, _>(f64::NAN);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_floor_negative_into_unsigned() {
        let _ = floor_cast::<u32, _>(-0.5f64);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_ceil_infinity() {
        let _ = ceil_cast::<u64, _>(f32::INFINITY);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_round_just_past_the_edge() {
        let _ = round_cast::<u8, _>(255.5f32);
    }
}
