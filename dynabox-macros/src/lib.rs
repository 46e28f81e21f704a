//! Procedural macros for dynabox.
//!
//! - `#[derive(Dynamic)]` - Return boxing for user types

use proc_macro::TokenStream;

mod dynamic;

/// Derive macro making a type returnable through dynamic dispatch.
///
/// By default the type is boxed as a non-trivial value: moved into a new
/// slot and shared. Options go in a `#[dynamic(..)]` attribute:
///
/// - `trivial` - box as an owned copy (requires `Copy`) and implement
///   `FromDynamic`
/// - `clone` - implement `FromDynamic` for a `Clone` type
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Dynamic)]
/// #[dynamic(trivial)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// ```
#[proc_macro_derive(Dynamic, attributes(dynamic))]
pub fn derive_dynamic(input: TokenStream) -> TokenStream {
    dynamic::derive_dynamic_impl(input)
}
