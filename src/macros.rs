/// Builds a [`Value`](crate::Value) tree from a JSON-like literal.
///
/// Strings become byte strings, integer literals become integers, `[...]`
/// becomes a list and `{ "key": value }` a map. Built values have empty spans,
/// and compare equal to decoded values with the same content.
///
/// # Examples
///
/// ```rust
/// use benspan::{bencode, decode};
///
/// let expected = bencode!({
///     "num": 3,
///     "spam": ["a", "b"]
/// });
/// assert_eq!(decode(b"d4:spaml1:a1:be3:numi3ee").unwrap(), expected);
/// ```
#[macro_export]
macro_rules! bencode {
    // Accumulate list elements, one at a time
    (@list [$($done:expr,)*]) => {
        $crate::Value::list(vec![$($done,)*])
    };
    (@list [$($done:expr,)*] - $lit:literal $(, $($rest:tt)*)?) => {
        $crate::bencode!(@list [$($done,)* $crate::bencode!(- $lit),] $($($rest)*)?)
    };
    (@list [$($done:expr,)*] $elem:tt $(, $($rest:tt)*)?) => {
        $crate::bencode!(@list [$($done,)* $crate::bencode!($elem),] $($($rest)*)?)
    };

    // Insert map entries, one at a time
    (@map $map:ident) => {};
    (@map $map:ident $key:literal : - $lit:literal $(, $($rest:tt)*)?) => {
        $map.insert($crate::bencode!(@key $key), $crate::bencode!(- $lit));
        $crate::bencode!(@map $map $($($rest)*)?);
    };
    (@map $map:ident $key:literal : $value:tt $(, $($rest:tt)*)?) => {
        $map.insert($crate::bencode!(@key $key), $crate::bencode!($value));
        $crate::bencode!(@map $map $($($rest)*)?);
    };
    (@key $key:literal) => {
        <[u8]>::to_vec(::core::convert::AsRef::<[u8]>::as_ref($key))
    };

    ([ $($tt:tt)* ]) => {
        $crate::bencode!(@list [] $($tt)*)
    };

    ({ $($tt:tt)* }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::BenMap::new();
        $crate::bencode!(@map map $($tt)*);
        $crate::Value::map(map)
    }};

    (- $lit:literal) => {
        $crate::Value::from(- $lit)
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
