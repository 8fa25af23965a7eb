use proc_macro::TokenStream;

mod comparison;

/// Generates the comparison constructors on `Condition`, the `where_*` filters
/// on every type listed in `#[comparison(filters(...))]` and `as_sql` for the
/// operator enum itself.
#[proc_macro_derive(Comparison, attributes(comparison))]
pub fn comparison_methods(input: TokenStream) -> TokenStream {
    comparison::comparison_methods_impl(input)
}
