use std::fmt;
use std::panic::Location;

/// Whether contract checks are compiled in.
///
/// Always on with the `checked` feature (the default). Without it the checks
/// behave like `debug_assert!` and vanish from release builds, which turns a
/// violation into a silently wrapped or saturated value.
pub const ENFORCED: bool = cfg!(any(debug_assertions, feature = "checked"));

/// Fails loudly when `$cond` does not hold.
///
/// The condition is not evaluated at all when [`ENFORCED`] is false.
macro_rules! contract {
    ($cond:expr, $($arg:tt)+) => {
        if $crate::contract::ENFORCED && !$cond {
            $crate::contract::violated(format_args!($($arg)+));
        }
    };
}

pub(crate) use contract;

#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn violated(args: fmt::Arguments<'_>) -> ! {
    let location = Location::caller();
    tracing::error!(%location, "contract violation: {}", args);

    if cfg!(feature = "abort-on-violation") {
        std::process::abort();
    }
    panic!("contract violation at {location}: {args}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn require_even(v: u32) -> u32 {
        contract!(v % 2 == 0, "{} is odd", v);
        v
    }

    #[test]
    fn test_holding_contract_passes_value_through() {
        assert_eq!(require_even(4), 4);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_broken_contract_panics() {
        let _ = require_even(3);
    }

    #[test]
    fn test_panic_message_names_the_caller() {
        let err = std::panic::catch_unwind(|| require_even(7)).unwrap_err();
        let msg = err.downcast_ref::<String>().cloned().unwrap_or_default();
        assert!(msg.contains("7 is odd"), "{msg}");
        assert!(msg.contains(file!()), "{msg}");
    }
}
