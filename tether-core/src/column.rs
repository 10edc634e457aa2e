use std::borrow::Cow;

/// Named column of a table, the only form of a field declaration that can be
/// written as SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Lower-cased field name.
    pub name: String,
    /// SQL type, e.g. `VARCHAR(50)`.
    pub column_type: Cow<'static, str>,
    pub nullable: bool,
    pub unique: bool,
    /// Literal written after `DEFAULT`, already rendered.
    pub default: Option<String>,
}
