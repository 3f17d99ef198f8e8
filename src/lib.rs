//! Checked numeric casts for SpottedCat, and the image element built on them.
//!
//! Geometry lives in floating point, pixel and byte counts in unsigned
//! integers, indices in signed ones. Every conversion between them goes
//! through one of two forms:
//!
//! - a query ([`is_safely_castable`]) that reports whether the value
//!   survives the conversion, for input that may legitimately be wrong;
//! - a strict form ([`strict_cast`], [`as_signed_strict`],
//!   [`as_unsigned_strict`], [`round_cast`], [`ceil_cast`], [`floor_cast`])
//!   that treats a lossy conversion as a bug and panics.
//!
//! Nothing is ever clamped or saturated.
//!
//! # Example
//! ```
//! use spottedcat_cast::{ImageElement, Pt, ceil_cast, is_safely_castable, strict_cast};
//!
//! let len: i64 = 4096;
//! if is_safely_castable::<usize, _>(len) {
//!     let len: usize = strict_cast(len);
//!     assert_eq!(len, 4096);
//! }
//!
//! assert_eq!(ceil_cast::<i64, _>(3.0001), 4);
//!
//! let img = ImageElement::new(Pt::from(0.5f32), Pt::from(0.5f32), Pt::from(10u32), Pt::from(10u32));
//! let rect = img.pixel_bounds().unwrap();
//! assert_eq!((rect.x, rect.width), (0, 11));
//! ```
//!
//! # Features
//! - `checked` (default): checks stay on in release builds. Without it they
//!   only run with `debug_assertions`.
//! - `abort-on-violation`: abort the process instead of panicking.
//! - `utils`: decode payload dimensions with the `image` crate.

pub mod cast;
pub mod contract;
mod image;
mod pt;
pub mod round;
pub mod sign;
pub mod stream;

pub use cast::{CastFrom, Primitive, SafeCast, Widened, is_safely_castable, strict_cast};
pub use self::image::{Bounds, ImageElement, PixelRect};
pub use pt::Pt;
pub use round::{Float, RoundCast, ceil_cast, floor_cast, round_cast};
pub use sign::{
    Integral, Reinterpret, as_signed, as_signed_strict, as_unsigned, as_unsigned_strict,
};
pub use stream::{ObjectReader, ObjectWriter, StreamError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_cases() {
        assert!(!is_safely_castable::<i32, _>(4_294_967_295u64));
        assert!(is_safely_castable::<i32, _>(2_147_483_647u32));
        assert_eq!(as_unsigned_strict(5i32), 5u32);
        assert_eq!(floor_cast::<i64, _>(3.9999), 3);
        assert_eq!(ceil_cast::<i64, _>(3.0001), 4);
        assert_eq!(round_cast::<i32, _>(2.5), 3);
        assert_eq!(round_cast::<i32, _>(-2.5), -3);
    }

    #[test]
    fn test_checks_are_on_in_tests() {
        assert!(contract::ENFORCED);
    }

    #[test]
    fn test_threads_share_nothing() {
        let handles: Vec<_> = (0..4i64)
            .map(|t| {
                std::thread::spawn(move || {
                    (t * 1000..(t + 1) * 1000)
                        .filter(|v| is_safely_castable::<u8, _>(*v))
                        .count()
                })
            })
            .collect();
        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 256);
    }
}
