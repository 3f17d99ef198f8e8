//! Lossless conversions between primitive numeric types.
//!
//! A conversion is safe when casting the value to the target type and
//! comparing both in a widened domain gives the same number, and the sign
//! class (negative or non-negative) is unchanged. Everything else is either
//! a query returning `false` ([`is_safely_castable`]) or a contract violation
//! ([`strict_cast`]).

use std::fmt::Debug;

use crate::contract::contract;

mod sealed {
    pub trait Sealed {}
}

/// A primitive numeric type taking part in checked conversions.
///
/// Implemented for `i8..=i64`, `isize`, `u8..=u64`, `usize`, `f32` and `f64`.
pub trait Primitive: Copy + PartialOrd + Debug + sealed::Sealed {
    const NAME: &'static str;

    /// The value in the widened comparison domain.
    fn widen(self) -> Widened;
}

/// Language-level `as` conversion from `F`.
///
/// Wraps, truncates or saturates exactly like `as`. Only the checked
/// entry points of this crate should reach for it.
pub trait CastFrom<F: Primitive>: Primitive {
    fn cast_from(from: F) -> Self;
}

/// A numeric value in a domain wide enough to compare any two primitives
/// without the comparison itself overflowing or rounding.
#[derive(Debug, Clone, Copy)]
pub enum Widened {
    Int(i128),
    Float(f64),
}

impl Widened {
    pub fn is_negative(self) -> bool {
        match self {
            Widened::Int(i) => i < 0,
            Widened::Float(f) => f < 0.0,
        }
    }

    pub fn is_non_negative(self) -> bool {
        match self {
            Widened::Int(i) => i >= 0,
            Widened::Float(f) => f >= 0.0,
        }
    }

    /// Both negative, or both non-negative. NaN belongs to neither class.
    pub fn same_sign_class(self, other: Widened) -> bool {
        (self.is_negative() && other.is_negative())
            || (self.is_non_negative() && other.is_non_negative())
    }
}

impl PartialEq for Widened {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Widened::Int(a), Widened::Int(b)) => a == b,
            (Widened::Float(a), Widened::Float(b)) => a == b,
            (Widened::Int(i), Widened::Float(f)) | (Widened::Float(f), Widened::Int(i)) => {
                float_equals_int(f, i)
            }
        }
    }
}

// Every integer reaching this is at most 64 bits wide, so a saturated
// `f as i128` can never compare equal by accident.
#[allow(clippy::cast_possible_truncation)]
fn float_equals_int(f: f64, i: i128) -> bool {
    f.is_finite() && f.fract() == 0.0 && f as i128 == i
}

macro_rules! impl_primitive {
    (int: $($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Primitive for $t {
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn widen(self) -> Widened {
                Widened::Int(self as i128)
            }
        }
    )*};
    (float: $($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Primitive for $t {
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn widen(self) -> Widened {
                Widened::Float(f64::from(self))
            }
        }
    )*};
}

impl_primitive!(int: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_primitive!(float: f32, f64);

macro_rules! impl_cast_from {
    (@to $to:ty; $($from:ty),*) => {$(
        impl CastFrom<$from> for $to {
            #[inline]
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap, clippy::cast_precision_loss, clippy::cast_lossless)]
            fn cast_from(from: $from) -> Self {
                from as $to
            }
        }
    )*};
    ($($to:ty),*) => {$(
        impl_cast_from!(@to $to; i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
    )*};
}

impl_cast_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Returns true when `from` survives the conversion to `To` unchanged in value
/// and sign class.
///
/// This is the non-failing query form; it never panics.
///
/// The comparison is exact, so int to float casts that round are rejected
/// (`16_777_217u32` is not an `f32`) even where C's usual arithmetic
/// conversions would compare equal.
///
/// # Example
/// ```
/// use spottedcat_cast::is_safely_castable;
///
/// assert!(is_safely_castable::<i32, _>(2_147_483_647u32));
/// assert!(!is_safely_castable::<i32, _>(4_294_967_295u64));
/// assert!(!is_safely_castable::<u8, _>(-1i32));
/// assert!(!is_safely_castable::<i32, _>(0.5f64));
/// assert!(!is_safely_castable::<f32, _>(16_777_217u32));
/// ```
#[must_use]
pub fn is_safely_castable<To, From>(from: From) -> bool
where
    From: Primitive,
    To: CastFrom<From>,
{
    let to = To::cast_from(from).widen();
    let from = from.widen();
    to == from && to.same_sign_class(from)
}

/// Converts `from` to `To`, treating a lossy conversion as a contract
/// violation.
///
/// Use [`is_safely_castable`] first when the value comes from outside the
/// program and failure has to be handled.
#[must_use]
#[track_caller]
pub fn strict_cast<To, From>(from: From) -> To
where
    From: Primitive,
    To: CastFrom<From>,
{
    contract!(
        is_safely_castable::<To, From>(from),
        "{:?}{} is not representable as {}",
        from,
        From::NAME,
        To::NAME
    );
    To::cast_from(from)
}

/// Method form of the checked conversions.
pub trait SafeCast: Primitive {
    #[must_use]
    fn is_safely_castable<To: CastFrom<Self>>(self) -> bool {
        is_safely_castable::<To, Self>(self)
    }

    #[must_use]
    #[track_caller]
    fn strict_cast<To: CastFrom<Self>>(self) -> To {
        strict_cast::<To, Self>(self)
    }
}

impl<T: Primitive> SafeCast for T {}
