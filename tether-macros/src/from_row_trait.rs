use crate::decode_fields::FieldMetadata;
use proc_macro2::TokenStream;
use quote::quote;

/// Body of `Record::from_row`: starts from `Default` and assigns every column
/// whose label matches a field, other labels are skipped.
pub(crate) fn from_row_trait(fields: &[FieldMetadata]) -> TokenStream {
    let assignments = fields.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        let column = f.name.to_lowercase();
        let field_name = &f.name;
        quote! {
            #column => {
                result.#ident = <#ty as ::tether::AsValue>::try_from_value(__v__).map_err(|e| {
                    e.context(format!(
                        "While decoding the column `{}` into the field `{}::{}`",
                        __n__,
                        <Self as ::tether::Record>::NAME,
                        #field_name,
                    ))
                })?;
            }
        }
    });
    quote! {
        fn from_row(row: ::tether::RowLabeled) -> ::tether::Result<Self> {
            #[allow(unused_mut)]
            let mut result = <Self as ::std::default::Default>::default();
            for (__n__, __v__) in ::std::iter::zip(row.labels.iter(), row.values.into_vec()) {
                match __n__.to_lowercase().as_str() {
                    #(#assignments)*
                    _ => {}
                }
            }
            Ok(result)
        }
    }
}
