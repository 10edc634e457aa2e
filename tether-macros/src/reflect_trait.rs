use crate::decode_fields::FieldMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

pub(crate) fn reflect_trait(item: &ItemStruct, fields: &[FieldMetadata]) -> TokenStream {
    let name = &item.ident;
    let slots = fields.iter().map(|f| {
        let ident = &f.ident;
        let field_name = &f.name;
        quote!(::tether::FieldSlot::new(#field_name, &self.#ident))
    });
    quote! {
        impl ::tether::Reflect for #name {
            fn shape(&self) -> ::tether::Shape<'_> {
                ::tether::Shape::Struct(vec![#(#slots),*])
            }
        }
    }
}
