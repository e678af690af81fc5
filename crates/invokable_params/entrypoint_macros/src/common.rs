//! Signature validation and parameter parsing.

use proc_macro2::TokenStream;
use syn::ext::IdentExt;
use syn::{Attribute, FnArg, Pat, PatType, ReturnType, Signature, Type};

/// Rejects async, unsafe, extern, generic and receiver-less methods.
pub(crate) fn validate_invoke_signature(sig: &Signature) -> syn::Result<()> {
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[invoke] methods are called synchronously and cannot be async",
        ));
    }

    if let Some(unsafety) = &sig.unsafety {
        return Err(syn::Error::new_spanned(
            unsafety,
            "#[invoke] cannot be applied to unsafe methods",
        ));
    }

    if let Some(abi) = &sig.abi {
        return Err(syn::Error::new_spanned(
            abi,
            "#[invoke] cannot be applied to extern methods",
        ));
    }

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[invoke] does not support generic parameters",
        ));
    }

    if let Some(variadic) = &sig.variadic {
        return Err(syn::Error::new_spanned(
            variadic,
            "#[invoke] does not support variadic parameters",
        ));
    }

    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) => {
            if receiver.reference.is_none() {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "#[invoke] methods must take `&self`, not `self` by value",
                ));
            }
            if receiver.mutability.is_some() {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "#[invoke] methods must take `&self`, not `&mut self`",
                ));
            }
            Ok(())
        }
        _ => Err(syn::Error::new_spanned(
            sig.fn_token,
            "#[invoke] methods must take `&self` as the first parameter",
        )),
    }
}

/// Parsed information about one entrypoint parameter.
#[derive(Debug, Clone)]
pub(crate) struct ParamInfo {
    /// The binding identifier.
    pub ident: syn::Ident,
    /// Declared name, without any `r#` prefix.
    pub name: String,
    /// Parameter type.
    pub ty: Type,
    /// Default value expression from `#[default(expr)]`.
    pub default_expr: Option<TokenStream>,
}

/// Parses a typed method parameter.
pub(crate) fn parse_param(pat_type: &PatType) -> syn::Result<ParamInfo> {
    let ident = match &*pat_type.pat {
        Pat::Ident(pat_ident) if pat_ident.by_ref.is_none() && pat_ident.subpat.is_none() => {
            pat_ident.ident.clone()
        }
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "entrypoint parameters must be plain identifiers",
            ));
        }
    };

    validate_param_type(&pat_type.ty)?;

    Ok(ParamInfo {
        name: ident.unraw().to_string(),
        ident,
        ty: (*pat_type.ty).clone(),
        default_expr: extract_default_expr(&pat_type.attrs)?,
    })
}

fn validate_param_type(ty: &Type) -> syn::Result<()> {
    match ty {
        Type::ImplTrait(_) => Err(syn::Error::new_spanned(
            ty,
            "`impl Trait` is not supported in entrypoint parameters",
        )),
        Type::Reference(_) => Err(syn::Error::new_spanned(
            ty,
            "entrypoint parameters must be owned types; use `String` or `Arc<T>`",
        )),
        _ => Ok(()),
    }
}

/// Extracts the default value from `#[default(expr)]`.
fn extract_default_expr(attrs: &[Attribute]) -> syn::Result<Option<TokenStream>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("default")) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "duplicate #[default(...)] attribute",
            ));
        }
        found = Some(attr.parse_args::<syn::Expr>()?);
    }
    Ok(found.map(|expr| quote::quote!(#expr)))
}

/// How the method's return value becomes a `Value`.
pub(crate) enum ReturnKind {
    /// No return type.
    Unit,
    /// `Result<T, E>`: `Ok` converts, `Err` becomes an execution error.
    Result,
    /// Any other type, converted with `Value::from`.
    Plain,
}

/// Classifies a return type.
pub(crate) fn return_kind(return_type: &ReturnType) -> ReturnKind {
    let ReturnType::Type(_, ty) = return_type else {
        return ReturnKind::Unit;
    };
    match ty.as_ref() {
        Type::Tuple(tuple) if tuple.elems.is_empty() => ReturnKind::Unit,
        Type::Path(type_path)
            if type_path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Result") =>
        {
            ReturnKind::Result
        }
        _ => ReturnKind::Plain,
    }
}
