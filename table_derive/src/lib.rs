//! Procedural macros for generating database table metadata and operations
//!
//! This crate provides the `#[model]` macro and `TableMetadata` derive for automatic
//! generation of SQL, a partial-update `{Name}Patch` type, and insert helpers for
//! struct types.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod model_macro;
mod parsing;
mod sql_generation;

use model_macro::model_attribute;
use parsing::{parse_field_attributes, parse_table_attributes};
use sql_generation::{
    generate_database_executor_impl, generate_patch_struct, generate_table_metadata_impl,
};

/// Derive macro for TableMetadata trait
///
/// Note: It's recommended to use the `#[model]` attribute macro instead,
/// which automatically includes this derive along with other necessary derives.
///
/// Field roles:
/// - `#[primary_key]` marks the `String` id column
/// - `#[field(create, update)]` lists which writes may set the column
/// - `#[updated_at]` marks the column refreshed by every patch
/// - `#[sqlx(rename = "...")]` overrides the column name
///
/// ```ignore
/// use table_derive::model;
///
/// #[model]
/// #[table(name = "notes", order_by = "created_at")]
/// pub struct Note {
///     #[primary_key]
///     pub id: String,
///
///     #[field(create, update)]
///     pub body: String,
///
///     #[field(create)]
///     pub created_at: DateTime<Utc>,
///
///     #[field(create)]
///     #[updated_at]
///     pub updated_at: DateTime<Utc>,
/// }
/// ```
#[proc_macro_derive(TableMetadata, attributes(table, primary_key, field, updated_at))]
pub fn derive_table_metadata(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    // Parse table attributes - handle errors properly
    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    // Parse field attributes - handle errors properly
    let field_info = match parse_field_attributes(&input.data, &table_info) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let table_metadata_impl = generate_table_metadata_impl(name, &table_info, &field_info);
    let patch_struct = generate_patch_struct(name, &input.vis, &field_info);
    let database_executor_impl = generate_database_executor_impl(name, &field_info);

    let expanded = quote::quote! {
        #table_metadata_impl
        #patch_struct
        #database_executor_impl
    };

    TokenStream::from(expanded)
}

/// Convenience attribute macro that adds all necessary derives for a database model
///
/// Usage:
/// ```ignore
/// use table_derive::model;
///
/// #[model]
/// #[table(name = "notes")]
/// pub struct Note {
///     #[primary_key]
///     pub id: String,
///     #[field(create, update)]
///     pub body: String,
///     #[field(create)]
///     pub created_at: DateTime<Utc>,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
