//! Helper macros used across the crate.

/// Lazily compile a [`Regex`] into a `LazyLock`.
///
/// The single-argument form uses a generic panic message; pass a second
/// argument to name the pattern in the message.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
///
/// use regex::Regex;
/// static RE: LazyLock<Regex> = mdpost::lazy_regex!(r"^#{1,6}", "atx marker");
/// assert!(RE.is_match("## Title"));
/// ```
#[macro_export]
macro_rules! lazy_regex {
    ($pattern:expr $(,)?) => {
        $crate::lazy_regex!($pattern, "pattern should compile")
    };
    ($pattern:expr, $msg:expr $(,)?) => {
        ::std::sync::LazyLock::new(|| ::regex::Regex::new($pattern).expect($msg))
    };
}
