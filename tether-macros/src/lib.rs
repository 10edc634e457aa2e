mod decode_fields;
mod from_row_trait;
mod reflect_trait;

use decode_fields::decode_fields;
use from_row_trait::from_row_trait;
use proc_macro::TokenStream;
use quote::quote;
use reflect_trait::reflect_trait;
use syn::{ItemStruct, parse_macro_input};

/// Implements `Reflect` and `Record` for a struct with named fields.
///
/// Fields marked `#[tether(ignore)]` are not mapped to a column, they keep
/// their `Default` value when a row is decoded.
#[proc_macro_derive(Record, attributes(tether))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    let fields = match decode_fields(&item) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };
    let name = &item.ident;
    let record_name = name.to_string();
    let reflect = reflect_trait(&item, &fields);
    let from_row = from_row_trait(&fields);
    quote! {
        #reflect
        impl ::tether::Record for #name {
            const NAME: &'static str = #record_name;
            #from_row
        }
    }
    .into()
}
