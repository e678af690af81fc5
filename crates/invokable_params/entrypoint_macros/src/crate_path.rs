//! Crate path detection for generated code.
//!
//! Generated code names `invokable_params` directly when the consuming crate
//! depends on it, and goes through `invokable::invokable_params` when only
//! the umbrella crate is a dependency.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

const PARAMS_CRATE: &str = "invokable_params";
const UMBRELLA_CRATE: &str = "invokable";

/// Returns the token path to `invokable_params`.
pub(crate) fn invokable_params() -> TokenStream {
    match crate_name(PARAMS_CRATE) {
        Ok(FoundCrate::Itself) => {
            let ident = format_ident!("{}", PARAMS_CRATE);
            quote!(#ident)
        }
        Ok(FoundCrate::Name(found)) => {
            let ident = format_ident!("{}", found);
            quote!(#ident)
        }
        Err(_) => match crate_name(UMBRELLA_CRATE) {
            Ok(FoundCrate::Name(found)) => {
                let umbrella = format_ident!("{}", found);
                let ident = format_ident!("{}", PARAMS_CRATE);
                quote!(#umbrella::#ident)
            }
            _ => {
                let ident = format_ident!("{}", PARAMS_CRATE);
                quote!(#ident)
            }
        },
    }
}
