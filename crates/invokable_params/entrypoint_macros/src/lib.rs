//! Procedural macros for invokable entrypoints.
//!
//! Provides `#[entrypoint]`, which turns an impl block with a single
//! `#[invoke]` method into an `Invokable` with a generated descriptor table.

mod common;
mod crate_path;
mod entrypoint;

use proc_macro::TokenStream;

/// Implements `Invokable` for a type from its `#[invoke]` method.
///
/// The impl block must contain exactly one method marked `#[invoke]`. That
/// method must take `&self` and owned parameters. Its parameter list becomes
/// the entrypoint's `Signature`: names, type hints derived through
/// `ParamType`, and defaults from `#[default(expr)]`.
///
/// The return value is converted with `Value::from`. A `Result` return maps
/// `Err` to `InvokeError::Execution`.
///
/// # Parameter Attributes
///
/// - `#[default(expr)]` — declared default; `expr` must have the parameter's type
///
/// # Example
///
/// ```
/// use invokable_params::{entrypoint, Invokable, ResolvedArguments, Value};
///
/// struct ShowProduct;
///
/// #[entrypoint]
/// impl ShowProduct {
///     #[invoke]
///     fn show(&self, product_id: i64, #[default(None)] title: Option<String>) -> String {
///         format!("{product_id}: {}", title.unwrap_or_default())
///     }
/// }
///
/// let signature = ShowProduct.signature().unwrap();
/// assert_eq!(signature.len(), 2);
///
/// let out = ShowProduct
///     .invoke(ResolvedArguments::new(vec![Value::Int(7), Value::Null]))
///     .unwrap();
/// assert_eq!(out, Value::from("7: "));
/// ```
#[proc_macro_attribute]
pub fn entrypoint(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = proc_macro2::TokenStream::from(attr);
    if !attr.is_empty() {
        return syn::Error::new_spanned(attr, "#[entrypoint] takes no arguments")
            .to_compile_error()
            .into();
    }

    let input = syn::parse_macro_input!(item as syn::ItemImpl);
    entrypoint::generate_entrypoint(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
