//! Same-width reinterpretation between signed and unsigned integers.

use crate::cast::Primitive;
use crate::contract::contract;

/// An integer with a same-width counterpart of the opposite signedness.
pub trait Integral: Primitive + Ord {
    type Signed: Integral;
    type Unsigned: Integral;

    const ZERO: Self;

    /// Two's-complement reinterpretation as the signed type of equal width.
    fn as_signed(self) -> Self::Signed;

    /// Two's-complement reinterpretation as the unsigned type of equal width.
    fn as_unsigned(self) -> Self::Unsigned;
}

macro_rules! impl_integral {
    ($($s:ty => $u:ty),*) => {$(
        impl Integral for $s {
            type Signed = $s;
            type Unsigned = $u;

            const ZERO: Self = 0;

            #[inline]
            fn as_signed(self) -> $s {
                self
            }

            #[inline]
            #[allow(clippy::cast_sign_loss)]
            fn as_unsigned(self) -> $u {
                self as $u
            }
        }

        impl Integral for $u {
            type Signed = $s;
            type Unsigned = $u;

            const ZERO: Self = 0;

            #[inline]
            #[allow(clippy::cast_possible_wrap)]
            fn as_signed(self) -> $s {
                self as $s
            }

            #[inline]
            fn as_unsigned(self) -> $u {
                self
            }
        }
    )*};
}

impl_integral!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, isize => usize);

/// Reinterprets `i` as signed, wrapping like `as`.
#[must_use]
pub fn as_signed<I: Integral>(i: I) -> I::Signed {
    i.as_signed()
}

/// Reinterprets `i` as unsigned, wrapping like `as`.
#[must_use]
pub fn as_unsigned<I: Integral>(i: I) -> I::Unsigned {
    i.as_unsigned()
}

/// Reinterprets `i` as signed; a flipped sign is a contract violation.
///
/// ```
/// use spottedcat_cast::as_signed_strict;
///
/// assert_eq!(as_signed_strict(7u16), 7i16);
/// assert_eq!(as_signed_strict(-7i16), -7i16);
/// ```
#[must_use]
#[track_caller]
pub fn as_signed_strict<I: Integral>(i: I) -> I::Signed {
    let rv = i.as_signed();
    contract!(
        (i < I::ZERO && rv < <I::Signed as Integral>::ZERO)
            || (i >= I::ZERO && rv >= <I::Signed as Integral>::ZERO),
        "{:?}{} changes sign as {}",
        i,
        I::NAME,
        <I::Signed as Primitive>::NAME
    );
    rv
}

/// Reinterprets `i` as unsigned; the source must be strictly positive.
///
/// Zero is rejected as well. Use [`as_unsigned`] or
/// [`strict_cast`](crate::strict_cast) where zero is a legal input.
#[must_use]
#[track_caller]
pub fn as_unsigned_strict<I: Integral>(i: I) -> I::Unsigned {
    contract!(
        i > I::ZERO,
        "{:?}{} is not strictly positive",
        i,
        I::NAME
    );
    i.as_unsigned()
}

/// Method form of the reinterpretations.
pub trait Reinterpret: Integral {
    #[must_use]
    #[track_caller]
    fn as_signed_strict(self) -> Self::Signed {
        as_signed_strict(self)
    }

    #[must_use]
    #[track_caller]
    fn as_unsigned_strict(self) -> Self::Unsigned {
        as_unsigned_strict(self)
    }
}

impl<T: Integral> Reinterpret for T {}
