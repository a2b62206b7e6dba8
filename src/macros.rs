/// Builds a [`Rope`](crate::Rope) with an explicit tree shape.
///
/// A string literal is a leaf, `[left, right]` is a nested branch and `_` is an absent
/// child. Two items at the top level make the root branch.
///
/// ```
/// use text_rope::rope;
///
/// let rope = rope!["hello", [_, " world"]];
/// assert_eq!(rope.to_string(), "hello world");
/// assert_eq!(rope.height(), 3);
/// ```
#[macro_export]
macro_rules! rope {
    () => {
        $crate::Rope::new()
    };

    (@child _) => {
        None
    };

    (@child [$($inner:tt)*]) => {
        Some($crate::rope!($($inner)*))
    };

    (@child $text:literal) => {
        Some($crate::Rope::from($text))
    };

    ($left:tt, $right:tt $(,)?) => {
        $crate::Rope::branch($crate::rope!(@child $left), $crate::rope!(@child $right))
    };

    ($text:literal) => {
        $crate::Rope::from($text)
    };
}
