//! Code generation for `#[entrypoint]` on impl blocks.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl};

use crate::common::{ParamInfo, ReturnKind, parse_param, return_kind, validate_invoke_signature};
use crate::crate_path;

const INVOKE_ATTR: &str = "invoke";

/// Generates an `Invokable` impl for an impl block with one `#[invoke]` method.
pub(crate) fn generate_entrypoint(input: &ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[entrypoint] must be applied to an inherent impl block",
        ));
    }

    let method = find_invoke_method(input)?;
    validate_invoke_signature(&method.sig)?;

    let params = method
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(parse_param(pat_type)),
            FnArg::Receiver(_) => None,
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let ip = crate_path::invokable_params();
    let self_ty = &input.self_ty;
    let (impl_generics, _ty_generics, where_clause) = input.generics.split_for_impl();

    let signature_code = generate_signature(&params, &ip);
    let invoke_code = generate_invoke(method, &params, &ip);
    let cleaned_items = strip_helper_attrs(input);
    let attrs = &input.attrs;

    Ok(quote! {
        #(#attrs)*
        impl #impl_generics #self_ty #where_clause {
            #(#cleaned_items)*
        }

        impl #impl_generics #ip::introspect::Invokable for #self_ty #where_clause {
            fn signature(&self) -> ::core::option::Option<#ip::introspect::Signature> {
                #signature_code
            }

            fn invoke(
                &self,
                __args: #ip::argument::ResolvedArguments,
            ) -> ::core::result::Result<#ip::value::Value, #ip::error::InvokeError> {
                #invoke_code
            }
        }
    })
}

fn find_invoke_method(input: &ItemImpl) -> syn::Result<&ImplItemFn> {
    let mut marked = input.items.iter().filter_map(|item| match item {
        ImplItem::Fn(method)
            if method
                .attrs
                .iter()
                .any(|attr| attr.path().is_ident(INVOKE_ATTR)) =>
        {
            Some(method)
        }
        _ => None,
    });

    let Some(method) = marked.next() else {
        return Err(syn::Error::new_spanned(
            &input.self_ty,
            "#[entrypoint] requires exactly one method marked #[invoke]",
        ));
    };
    if let Some(extra) = marked.next() {
        return Err(syn::Error::new_spanned(
            &extra.sig,
            "#[entrypoint] allows only one #[invoke] method",
        ));
    }
    Ok(method)
}

fn generate_signature(params: &[ParamInfo], ip: &TokenStream) -> TokenStream {
    let declared: Vec<_> = params
        .iter()
        .map(|param| {
            let name = &param.name;
            let ty = &param.ty;
            let declare = quote! { #ip::introspect::DeclaredParam::of::<#ty>(#name) };
            match &param.default_expr {
                Some(default_expr) => quote! {
                    #declare.with_default({
                        let __default: #ty = #default_expr;
                        #ip::value::Value::from(__default)
                    })
                },
                None => declare,
            }
        })
        .collect();

    quote! {
        ::core::option::Option::Some(
            #ip::introspect::Signature::new()
                #( .param(#declared) )*
        )
    }
}

fn generate_invoke(method: &ImplItemFn, params: &[ParamInfo], ip: &TokenStream) -> TokenStream {
    let method_name = &method.sig.ident;
    let arity = params.len();

    let extractions: Vec<_> = params
        .iter()
        .map(|param| {
            let ident = &param.ident;
            let name = &param.name;
            let ty = &param.ty;
            quote! {
                let #ident: #ty = __reader.next::<#ty>(#name)?;
            }
        })
        .collect();
    let call_args: Vec<_> = params.iter().map(|param| &param.ident).collect();
    let call = quote! { self.#method_name(#(#call_args),*) };

    let result_handling = match return_kind(&method.sig.output) {
        ReturnKind::Unit => quote! {
            #call;
            ::core::result::Result::Ok(#ip::value::Value::Null)
        },
        ReturnKind::Result => quote! {
            match #call {
                ::core::result::Result::Ok(__value) => {
                    ::core::result::Result::Ok(#ip::value::Value::from(__value))
                }
                ::core::result::Result::Err(__err) => ::core::result::Result::Err(
                    #ip::error::InvokeError::execution(__err.to_string()),
                ),
            }
        },
        ReturnKind::Plain => quote! {
            ::core::result::Result::Ok(#ip::value::Value::from(#call))
        },
    };

    let reader = if params.is_empty() {
        quote! { __args.reader(0)?; }
    } else {
        quote! { let mut __reader = __args.reader(#arity)?; }
    };

    quote! {
        #reader
        #(#extractions)*
        #result_handling
    }
}

/// Removes `#[invoke]` and `#[default(..)]` so the emitted impl compiles.
fn strip_helper_attrs(input: &ItemImpl) -> Vec<ImplItem> {
    input
        .items
        .iter()
        .map(|item| {
            let ImplItem::Fn(method) = item else {
                return item.clone();
            };
            let mut cleaned = method.clone();
            cleaned
                .attrs
                .retain(|attr| !attr.path().is_ident(INVOKE_ATTR));
            for arg in &mut cleaned.sig.inputs {
                if let FnArg::Typed(pat_type) = arg {
                    pat_type
                        .attrs
                        .retain(|attr| !attr.path().is_ident("default"));
                }
            }
            ImplItem::Fn(cleaned)
        })
        .collect()
}
