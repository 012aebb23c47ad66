//! Configuration options for decoding and projection.
//!
//! - [`DecodeOptions`]: nesting limit and trailing-data policy for the decoder
//! - [`Trailing`]: what to do with bytes after the first complete value
//! - [`Utf8Policy`]: how the JSON projector treats non-UTF-8 byte strings
//!
//! ## Examples
//!
//! ```rust
//! use benspan::{decode_with_options, DecodeOptions, Trailing};
//!
//! let options = DecodeOptions::new().with_trailing(Trailing::Allow);
//! let value = decode_with_options(b"4:spams", options).unwrap();
//! assert_eq!(value.as_str(), Some("spam"));
//! ```

/// Default limit on list/map nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Policy for bytes left over after the first complete top-level value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Trailing {
    /// Fail with [`ErrorKind::TrailingData`](crate::ErrorKind::TrailingData).
    #[default]
    Reject,
    /// Ignore anything after the first value.
    Allow,
}

/// How byte strings that are not valid UTF-8 are rendered as JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Utf8Policy {
    /// Fail with [`ErrorKind::InvalidUtf8`](crate::ErrorKind::InvalidUtf8).
    #[default]
    Strict,
    /// Replace invalid sequences with U+FFFD.
    Lossy,
}

/// Configuration options for the decoder.
///
/// # Examples
///
/// ```rust
/// use benspan::{DecodeOptions, Trailing};
///
/// let options = DecodeOptions::new();
/// assert_eq!(options.max_depth, 256);
/// assert_eq!(options.trailing, Trailing::Reject);
///
/// let options = DecodeOptions::new().with_max_depth(8).with_trailing(Trailing::Allow);
/// assert_eq!(options.max_depth, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    pub max_depth: usize,
    pub trailing: Trailing,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            trailing: Trailing::default(),
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many levels of lists and maps may be nested.
    ///
    /// A bare string or integer has depth 0; `le` has depth 1.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_trailing(mut self, trailing: Trailing) -> Self {
        self.trailing = trailing;
        self
    }
}
