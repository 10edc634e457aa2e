use syn::{Fields, Ident, ItemStruct, Type, spanned::Spanned};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    /// Field name without the raw identifier prefix.
    pub(crate) name: String,
    pub(crate) ty: Type,
}

/// Fields that map to a column, in declaration order.
pub(crate) fn decode_fields(item: &ItemStruct) -> syn::Result<Vec<FieldMetadata>> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "Record cannot be derived for a generic struct",
        ));
    }
    let Fields::Named(fields) = &item.fields else {
        return Err(syn::Error::new(
            item.fields.span(),
            "Record can be derived only for a struct with named fields",
        ));
    };
    let mut result = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let mut ignore = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("tether")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignore") {
                    ignore = true;
                    Ok(())
                } else {
                    Err(meta.error("Unknown tether attribute, expected #[tether(ignore)]"))
                }
            })?;
        }
        if ignore {
            continue;
        }
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let name = ident.to_string().trim_start_matches("r#").to_string();
        result.push(FieldMetadata {
            ident,
            name,
            ty: field.ty.clone(),
        });
    }
    Ok(result)
}
