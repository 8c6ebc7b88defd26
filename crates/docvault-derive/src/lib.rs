use proc_macro::TokenStream;

mod record;
mod util;

/// Implement `Record`, `Reflect` and `FromValue` for a struct with named
/// fields. Fields opt into validation with `#[vault("name,rule,...")]`.
#[proc_macro_derive(Record, attributes(vault))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
