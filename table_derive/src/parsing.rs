//! Parsing utilities for table and field attributes
//!
//! This module handles the parsing of `#[table]`, `#[field]`, `#[primary_key]`,
//! `#[updated_at]` and column renames, and validates table and column names.

use quote::quote;
use syn::{
    ext::IdentExt, parse::Parse, parse::ParseStream, Attribute, Data, Error, Fields,
    GenericArgument, Ident, LitStr, PathArguments, Result, Token, Type,
};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Identifier rules for generated SQL. Names are always double-quoted in the
/// generated statements, so keywords are allowed; anything outside
/// `[A-Za-z_][A-Za-z0-9_]*` is not.
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // PostgreSQL limit
    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    Ok(())
}

#[derive(Debug)]
struct FieldOperations {
    operations: Vec<Ident>,
}

impl Parse for FieldOperations {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut operations = Vec::new();

        while !input.is_empty() {
            let op: Ident = input.parse()?;
            operations.push(op);

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            }
        }

        Ok(FieldOperations { operations })
    }
}

#[derive(Debug)]
pub struct TableInfo {
    pub name: String,
    /// Column that list queries order by (descending)
    pub order_by: String,
}

#[derive(Debug)]
pub struct ColumnInfo {
    pub ident: Ident,
    /// SQL column name, from `#[sqlx(rename = "...")]` or the unraw field name
    pub column: String,
    /// Whitespace-free rendering of the Rust type
    pub type_string: String,
    pub optional: bool,
    /// `T` for `Option<T>`, otherwise the field type itself
    pub inner_ty: Type,
    pub primary_key: bool,
    pub create: bool,
    pub update: bool,
    pub updated_at: bool,
    /// `#[serde(...)]` attributes, copied onto the patch struct field
    pub serde_attrs: Vec<Attribute>,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub columns: Vec<ColumnInfo>,
}

impl FieldInfo {
    pub fn primary_key(&self) -> &ColumnInfo {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .unwrap_or_else(|| unreachable!("primary key presence is checked while parsing"))
    }

    pub fn column_for(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.column == name || c.ident == name)
    }

    /// Columns written by INSERT: the primary key plus every `create` field
    pub fn insert_columns(&self) -> Vec<&ColumnInfo> {
        self.columns
            .iter()
            .filter(|c| c.primary_key || c.create)
            .collect()
    }

    /// Columns a patch may change
    pub fn update_columns(&self) -> Vec<&ColumnInfo> {
        self.columns
            .iter()
            .filter(|c| c.update && !c.primary_key)
            .collect()
    }

    pub fn updated_at(&self) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.updated_at)
    }
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut table_name: Option<LitStr> = None;
    let mut order_by: Option<LitStr> = None;

    for attr in attrs {
        if attr.path().is_ident("table") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    table_name = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("order_by") {
                    order_by = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported table attribute, expected `name` or `order_by`"))
                }
            })?;
        }
    }

    let table_name = table_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "table attribute is required: add #[table(name = \"table_name\")] to your struct",
        )
    })?;

    // Validate table name at compile time with proper error handling
    validate_table_name_syn(&table_name.value(), table_name.span())?;

    let order_by = order_by
        .map(|lit| lit.value())
        .unwrap_or_else(|| "created_at".to_string());

    Ok(TableInfo {
        name: table_name.value(),
        order_by,
    })
}

pub fn parse_field_attributes(data: &Data, table_info: &TableInfo) -> Result<FieldInfo> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableMetadata can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableMetadata can only be derived for structs with named fields",
        ));
    };

    let mut columns = Vec::new();

    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        let column = column_rename(&field.attrs)?.unwrap_or_else(|| ident.unraw().to_string());
        validate_column_name_syn(&column, ident.span())?;

        let ty = &field.ty;
        let type_string = quote!(#ty).to_string().replace(' ', "");
        let (optional, inner_ty) = match option_inner(ty) {
            Some(inner) => (true, inner.clone()),
            None => (false, ty.clone()),
        };

        let operations = parse_field_operations(&field.attrs)?;
        let primary_key = has_attribute(&field.attrs, "primary_key");

        columns.push(ColumnInfo {
            column,
            type_string,
            optional,
            inner_ty,
            primary_key,
            create: operations.iter().any(|op| op == "create"),
            update: operations.iter().any(|op| op == "update"),
            updated_at: has_attribute(&field.attrs, "updated_at"),
            serde_attrs: field
                .attrs
                .iter()
                .filter(|a| a.path().is_ident("serde"))
                .cloned()
                .collect(),
            ident,
        });
    }

    let primary_keys: Vec<_> = columns.iter().filter(|c| c.primary_key).collect();
    match primary_keys.as_slice() {
        [pk] if pk.type_string == "String" => {}
        [pk] => {
            return Err(Error::new(
                pk.ident.span(),
                "primary key must be a String identifier",
            ))
        }
        [] => {
            return Err(Error::new(
                proc_macro2::Span::call_site(),
                "exactly one field must be marked #[primary_key]",
            ))
        }
        [_, extra, ..] => {
            return Err(Error::new(
                extra.ident.span(),
                "exactly one field must be marked #[primary_key]",
            ))
        }
    }

    match columns
        .iter()
        .find(|c| c.column == table_info.order_by || c.ident == table_info.order_by)
    {
        Some(c) if !c.optional && c.type_string.ends_with("DateTime<Utc>") => {}
        Some(c) => {
            return Err(Error::new(
                c.ident.span(),
                "order_by column must be a non-optional DateTime<Utc>",
            ))
        }
        None => {
            return Err(Error::new(
                proc_macro2::Span::call_site(),
                format!("order_by column '{}' is not a field of this struct", table_info.order_by),
            ))
        }
    }

    if columns.iter().filter(|c| c.updated_at).count() > 1 {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "at most one field may be marked #[updated_at]",
        ));
    }

    if !columns.iter().any(|c| c.update && !c.primary_key) {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "at least one field must be marked #[field(update)]",
        ));
    }

    Ok(FieldInfo { columns })
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Operations listed in `#[field(...)]`; `#[field]` alone means create and update
pub fn parse_field_operations(attrs: &[Attribute]) -> Result<Vec<String>> {
    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }

        if let syn::Meta::Path(_) = attr.meta {
            return Ok(vec!["create".to_string(), "update".to_string()]);
        }

        let field_ops = attr.parse_args::<FieldOperations>()?;
        let mut operations = Vec::new();
        for ident in field_ops.operations {
            match ident.to_string().as_str() {
                "create" | "update" => operations.push(ident.to_string()),
                _ => {
                    return Err(Error::new(
                        ident.span(),
                        "unknown field operation, expected `create` or `update`",
                    ))
                }
            }
        }
        return Ok(operations);
    }

    Ok(Vec::new())
}

/// Column name override from `#[sqlx(rename = "...")]`, shared with the FromRow derive
fn column_rename(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut rename = None;

    for attr in attrs {
        if attr.path().is_ident("sqlx") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    rename = Some(lit.value());
                } else if meta.input.peek(Token![=]) {
                    // Other sqlx options are not ours to interpret
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            })?;
        }
    }

    Ok(rename)
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
