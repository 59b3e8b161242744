// Variadic front ends for the global logger.
//
// Plain macros take display values, formatted macros take `format_args!`
// input, structured macros take a message followed by alternating keys and
// serializable values.

/// Build structured key/value arguments from serializable values
///
/// # Examples
/// ```
/// use sazabi::Log;
///
/// let logger = sazabi::default_logger();
/// logger.infow("login", &sazabi::fields!["user", "alice", "attempt", 3]);
/// ```
#[macro_export]
macro_rules! fields {
    ($($kv:expr),* $(,)?) => {
        [$($crate::value(&$kv)),*]
    };
}

/// Plain debug entry: `debug!("cache", "miss", key)`
#[macro_export]
macro_rules! debug {
    ($($arg:expr),+ $(,)?) => {
        $crate::debug(&[$(&$arg as &dyn ::core::fmt::Display),+])
    };
}

/// Formatted debug entry: `debugf!("retry {} of {}", n, max)`
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::debugf(::core::format_args!($($arg)+))
    };
}

/// Structured debug entry: `debugw!("cache miss", "key", key)`
#[macro_export]
macro_rules! debugw {
    ($msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::debugw($msg, &$crate::fields![$($kv),*])
    };
}

/// Plain info entry
#[macro_export]
macro_rules! info {
    ($($arg:expr),+ $(,)?) => {
        $crate::info(&[$(&$arg as &dyn ::core::fmt::Display),+])
    };
}

/// Formatted info entry
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::infof(::core::format_args!($($arg)+))
    };
}

/// Structured info entry: `infow!("login", "user", "alice")`
#[macro_export]
macro_rules! infow {
    ($msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::infow($msg, &$crate::fields![$($kv),*])
    };
}

/// Plain warn entry
#[macro_export]
macro_rules! warn {
    ($($arg:expr),+ $(,)?) => {
        $crate::warn(&[$(&$arg as &dyn ::core::fmt::Display),+])
    };
}

/// Formatted warn entry
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::warnf(::core::format_args!($($arg)+))
    };
}

/// Structured warn entry
#[macro_export]
macro_rules! warnw {
    ($msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::warnw($msg, &$crate::fields![$($kv),*])
    };
}

/// Plain error entry: `error!("disk full")`
#[macro_export]
macro_rules! error {
    ($($arg:expr),+ $(,)?) => {
        $crate::error(&[$(&$arg as &dyn ::core::fmt::Display),+])
    };
}

/// Formatted error entry
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::errorf(::core::format_args!($($arg)+))
    };
}

/// Structured error entry
#[macro_export]
macro_rules! errorw {
    ($msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::errorw($msg, &$crate::fields![$($kv),*])
    };
}

/// Plain fatal entry, then the global logger's fatal hook (exit by default)
#[macro_export]
macro_rules! fatal {
    ($($arg:expr),+ $(,)?) => {
        $crate::fatal(&[$(&$arg as &dyn ::core::fmt::Display),+])
    };
}

/// Formatted fatal entry, then the fatal hook
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::fatalf(::core::format_args!($($arg)+))
    };
}

/// Structured fatal entry, then the fatal hook
#[macro_export]
macro_rules! fatalw {
    ($msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::fatalw($msg, &$crate::fields![$($kv),*])
    };
}

/// Plain panic entry, then unwind with the message
#[macro_export]
macro_rules! panic {
    ($($arg:expr),+ $(,)?) => {
        $crate::panic(&[$(&$arg as &dyn ::core::fmt::Display),+])
    };
}

/// Formatted panic entry, then unwind with the message
#[macro_export]
macro_rules! panicf {
    ($($arg:tt)+) => {
        $crate::panicf(::core::format_args!($($arg)+))
    };
}

/// Structured panic entry, then unwind with the message
#[macro_export]
macro_rules! panicw {
    ($msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::panicw($msg, &$crate::fields![$($kv),*])
    };
}
