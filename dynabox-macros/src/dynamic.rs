//! The `#[derive(Dynamic)]` macro.
//!
//! Generates `IntoDynamic` and `Boxable` so a user type can be returned
//! through dynamic dispatch, and optionally `FromDynamic` so it can be taken
//! as a parameter.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, DeriveInput, Ident, Token,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
};

/// Arguments of the `#[dynamic(..)]` helper attribute.
#[derive(Default)]
pub(crate) struct DynamicArgs {
    pub trivial: bool,
    pub clone: bool,
}

impl Parse for DynamicArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = DynamicArgs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "trivial" => args.trivial = true,
                "clone" => args.clone = true,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

impl DynamicArgs {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = DynamicArgs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("dynamic")) {
            let parsed: DynamicArgs = attr.parse_args()?;
            args.trivial |= parsed.trivial;
            args.clone |= parsed.clone;
        }
        Ok(args)
    }
}

/// Implementation of the `#[derive(Dynamic)]` macro.
pub fn derive_dynamic_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match DynamicArgs::from_attrs(&input.attrs) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &input.ident;
    let (_, ty_generics, _) = input.generics.split_for_impl();

    let mut generics = input.generics.clone();
    let predicates = &mut generics.make_where_clause().predicates;
    predicates.push(parse_quote!(
        #name #ty_generics: ::core::marker::Send + ::core::marker::Sync + 'static
    ));
    if args.trivial {
        predicates.push(parse_quote!(#name #ty_generics: ::core::marker::Copy));
    }
    let (impl_generics, _, bounded) = generics.split_for_impl();

    let mut cloneable = generics.clone();
    cloneable
        .make_where_clause()
        .predicates
        .push(parse_quote!(#name #ty_generics: ::core::clone::Clone));
    let (_, _, clone_bounded) = cloneable.split_for_impl();

    let (strategy, boxing) = if args.trivial {
        (
            quote!(::dynabox::Strategy::Trivial),
            quote!(::dynabox::strategy::box_trivial(self)),
        )
    } else {
        (
            quote!(::dynabox::Strategy::NonTrivial),
            quote!(::dynabox::strategy::box_value(self)),
        )
    };

    let from_dynamic = (args.trivial || args.clone).then(|| {
        quote! {
            impl #impl_generics ::dynabox::FromDynamic for #name #ty_generics #clone_bounded {
                fn from_dynamic(
                    value: &::dynabox::Dynamic,
                ) -> ::core::result::Result<Self, ::dynabox::CastError> {
                    value.cast::<Self>()
                }
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics ::dynabox::IntoDynamic for #name #ty_generics #bounded {
            const STRATEGY: ::dynabox::Strategy = #strategy;

            fn into_dynamic(self) -> ::dynabox::Dynamic {
                #boxing
            }
        }

        impl #impl_generics ::dynabox::Boxable for #name #ty_generics #bounded {}

        #from_dynamic
    };

    TokenStream::from(expanded)
}
