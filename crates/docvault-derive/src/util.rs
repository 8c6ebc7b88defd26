use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, WhereClause};

pub fn where_clause_with_bounds(
    where_clause: Option<&WhereClause>,
    bounds: &[TokenStream],
) -> TokenStream {
    if bounds.is_empty() {
        return where_clause
            .as_ref()
            .map_or_else(|| quote!(), |wc| quote!(#wc));
    }

    if let Some(wc) = where_clause {
        let preds = &wc.predicates;
        quote!(where #preds, #(#bounds),*)
    } else {
        quote!(where #(#bounds),*)
    }
}

// every type parameter must itself be reflectable
pub fn reflect_bounds(generics: &Generics) -> Vec<TokenStream> {
    generics
        .type_params()
        .map(|param| {
            let ident = &param.ident;
            quote!(#ident: ::docvault::reflect::Reflect + ::docvault::reflect::FromValue)
        })
        .collect()
}
