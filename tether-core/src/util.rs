/// Writes every value through `f`, putting `separator` between the ones that
/// actually produced output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Lowercase name used for tables and columns.
pub fn sql_name(name: &str) -> String {
    name.trim_start_matches("r#").to_lowercase()
}

/// Largest char boundary of `value` not after `index`.
#[doc(hidden)]
pub fn char_floor(value: &str, index: usize) -> usize {
    if index >= value.len() {
        return value.len();
    }
    let mut index = index;
    while !value.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::char_floor(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
