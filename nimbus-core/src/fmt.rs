//! Logging macros
//!
//! Forwards to `log` or `defmt` depending on the enabled feature, and
//! compiles to nothing when neither is enabled.

#![allow(unused_macros, unused_imports)]

cfg_if::cfg_if! {
    if #[cfg(feature = "log")] {
        pub(crate) use log::{debug, error, info, trace, warn};
    } else if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{debug, error, info, trace, warn};
    }
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
mod noop {
    macro_rules! trace {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! debug {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! info {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! warn {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! error {
        ($($arg:tt)*) => {{}};
    }

    pub(crate) use {debug, error, info, trace, warn};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
pub(crate) use noop::{debug, error, info, trace, warn};
