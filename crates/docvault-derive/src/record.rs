use crate::util::{reflect_bounds, where_clause_with_bounds};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Expr, ExprLit, Fields, Lit, LitStr, Meta};

const ATTRIBUTE: &str = "vault";

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let bounds = reflect_bounds(&input.generics);
    let where_clause = where_clause_with_bounds(where_clause, &bounds);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Record can only be derived for structs with named fields",
            ));
        }
    };

    let mut descriptors = Vec::with_capacity(fields.len());
    let mut field_refs = Vec::with_capacity(fields.len());
    let mut has_values = Vec::with_capacity(fields.len());
    let mut snapshots = Vec::with_capacity(fields.len());
    let mut takes = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_name = field_ident.to_string();
        let field_ty = &field.ty;
        let type_name = quote!(#field_ty).to_string().replace(' ', "");

        let tag = match field_tag(&field.attrs)? {
            Some(tag) => quote!(Some(#tag)),
            None => quote!(None),
        };

        descriptors.push(quote! {
            ::docvault::reflect::FieldDescriptor::new(#field_name, #tag, #type_name)
        });
        field_refs.push(quote! {
            ::docvault::reflect::FieldMut::new(&descriptors[#index], &mut self.#field_ident)
        });
        has_values.push(quote! {
            ::docvault::reflect::Reflect::has_value(&self.#field_ident)
        });
        snapshots.push(quote! {
            (#field_name, ::docvault::reflect::Reflect::to_value(&self.#field_ident))
        });
        takes.push(quote! {
            #field_ident: source.take(#field_name)?
        });
    }

    Ok(quote! {
        impl #impl_generics ::docvault::reflect::Record for #ident #ty_generics #where_clause {
            fn descriptors(&self) -> &'static [::docvault::reflect::FieldDescriptor] {
                const FIELDS: &[::docvault::reflect::FieldDescriptor] = &[#(#descriptors),*];

                FIELDS
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<::docvault::reflect::FieldMut<'_>> {
                #[allow(unused_variables)]
                let descriptors = ::docvault::reflect::Record::descriptors(self);

                ::std::vec![#(#field_refs),*]
            }
        }

        impl #impl_generics ::docvault::reflect::Reflect for #ident #ty_generics #where_clause {
            fn kind(&self) -> ::docvault::reflect::Kind {
                ::docvault::reflect::Kind::Struct
            }

            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            fn has_value(&self) -> bool {
                false #(|| #has_values)*
            }

            fn to_value(&self) -> ::docvault::value::Value {
                ::docvault::value::Value::Struct(::docvault::value::StructValue::new(
                    ::std::any::type_name::<Self>(),
                    ::std::vec![#(#snapshots),*],
                ))
            }

            fn assign(
                &mut self,
                value: ::docvault::value::Value,
            ) -> ::std::result::Result<(), ::docvault::reflect::AssignError> {
                ::docvault::reflect::assign_fields(self, ::std::any::type_name::<Self>(), value)
            }

            fn as_record_mut(
                &mut self,
            ) -> ::std::option::Option<&mut dyn ::docvault::reflect::Record> {
                Some(self)
            }
        }

        impl #impl_generics ::docvault::reflect::FromValue for #ident #ty_generics #where_clause {
            fn from_value(
                value: ::docvault::value::Value,
            ) -> ::std::result::Result<Self, ::docvault::reflect::AssignError> {
                #[allow(unused_mut, unused_variables)]
                let mut source =
                    ::docvault::reflect::FieldSource::new(::std::any::type_name::<Self>(), value)?;

                Ok(Self {
                    #(#takes),*
                })
            }
        }
    })
}

// Read the single `#[vault("...")]` or `#[vault = "..."]` attribute.
fn field_tag(attrs: &[Attribute]) -> Result<Option<LitStr>, Error> {
    let mut found: Option<LitStr> = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
        let tag = match &attr.meta {
            Meta::List(_) => attr.parse_args::<LitStr>()?,
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) => lit.clone(),
                other => {
                    return Err(Error::new_spanned(other, "expected a tag string"));
                }
            },
            Meta::Path(path) => {
                return Err(Error::new_spanned(
                    path,
                    "expected #[vault(\"name,rule,...\")]",
                ));
            }
        };

        if found.is_some() {
            return Err(Error::new_spanned(attr, "duplicate vault attribute"));
        }
        found = Some(tag);
    }

    Ok(found)
}
