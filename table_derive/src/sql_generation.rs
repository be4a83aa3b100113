//! SQL code generation for database operations
//!
//! This module generates SQL queries and Rust code for database operations
//! based on parsed table and field metadata. Every statement is rendered at
//! expansion time, so the generated trait methods return string literals.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Visibility};

use crate::parsing::{ColumnInfo, FieldInfo, TableInfo};

/// Quote an identifier that was already validated at parse time
fn safe_sql_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn placeholders(range: std::ops::RangeInclusive<usize>) -> String {
    range
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column definition used by CREATE TABLE
fn column_definition(column: &ColumnInfo, table_info: &TableInfo) -> String {
    let name = safe_sql_identifier(&column.column);

    if column.primary_key {
        // Byte-wise collation keeps keyset comparisons identical to Rust string ordering
        return format!("{} TEXT COLLATE \"C\" PRIMARY KEY", name);
    }

    let pg_type = type_mapping::rust_type_to_pg_type(&column.type_string);
    let mut definition = format!("{} {}", name, pg_type);
    if !column.optional {
        definition.push_str(" NOT NULL");
    }
    if column.updated_at || column.column == table_info.order_by {
        definition.push_str(" DEFAULT NOW()");
    }
    definition
}

pub struct GeneratedSql {
    pub insert: String,
    pub seed_insert: String,
    pub patch: String,
    pub get_by_id: String,
    pub delete_by_id: String,
    pub count_all: String,
    pub first_page: String,
    pub page_after: String,
    pub create_table: String,
    pub create_indexes: Vec<String>,
}

pub fn generate_sql(table_info: &TableInfo, field_info: &FieldInfo) -> GeneratedSql {
    let table = safe_sql_identifier(&table_info.name);
    let pk = safe_sql_identifier(&field_info.primary_key().column);
    let order_column = field_info
        .column_for(&table_info.order_by)
        .map(|c| c.column.clone())
        .unwrap_or_else(|| table_info.order_by.clone());
    let order = safe_sql_identifier(&order_column);

    let insert_columns = field_info.insert_columns();
    let insert_names: Vec<_> = insert_columns
        .iter()
        .map(|c| safe_sql_identifier(&c.column))
        .collect();
    let insert_values = placeholders(1..=insert_columns.len());

    let insert = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        table,
        insert_names.join(", "),
        insert_values
    );

    // Seeding must never clobber a row that already exists
    let seed_insert = format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO NOTHING RETURNING *",
        table,
        insert_names.join(", "),
        insert_values,
        pk
    );

    let update_columns = field_info.update_columns();
    let mut assignments: Vec<_> = update_columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let column = safe_sql_identifier(&c.column);
            format!("{} = COALESCE(${}, {})", column, i + 1, column)
        })
        .collect();
    if let Some(updated_at) = field_info.updated_at() {
        assignments.push(format!(
            "{} = NOW()",
            safe_sql_identifier(&updated_at.column)
        ));
    }
    let patch = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING *",
        table,
        assignments.join(", "),
        pk,
        update_columns.len() + 1
    );

    let get_by_id = format!("SELECT * FROM {} WHERE {} = $1", table, pk);
    let delete_by_id = format!("DELETE FROM {} WHERE {} = $1", table, pk);
    let count_all = format!("SELECT COUNT(*) AS total FROM {}", table);

    let ordering = format!("ORDER BY {} DESC, {} DESC", order, pk);
    let first_page = format!("SELECT * FROM {} {} LIMIT $1", table, ordering);
    let page_after = format!(
        "SELECT * FROM {} WHERE ({}, {}) < ($1, $2) {} LIMIT $3",
        table, order, pk, ordering
    );

    let definitions: Vec<_> = field_info
        .columns
        .iter()
        .map(|c| column_definition(c, table_info))
        .collect();
    let create_table = format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table,
        definitions.join(", ")
    );

    let create_indexes = vec![format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} ({} DESC, {} DESC)",
        safe_sql_identifier(&format!(
            "idx_{}_{}_{}",
            table_info.name,
            order_column,
            field_info.primary_key().column
        )),
        table,
        order,
        pk
    )];

    GeneratedSql {
        insert,
        seed_insert,
        patch,
        get_by_id,
        delete_by_id,
        count_all,
        first_page,
        page_after,
        create_table,
        create_indexes,
    }
}

pub fn patch_ident(name: &Ident) -> Ident {
    format_ident!("{}Patch", name)
}

pub fn generate_table_metadata_impl(
    name: &Ident,
    table_info: &TableInfo,
    field_info: &FieldInfo,
) -> TokenStream {
    let sql = generate_sql(table_info, field_info);
    let patch_name = patch_ident(name);

    let table_name = &table_info.name;
    let pk_column = &field_info.primary_key().column;
    let pk_ident = &field_info.primary_key().ident;
    let order = field_info
        .column_for(&table_info.order_by)
        .unwrap_or_else(|| unreachable!("order_by column is checked while parsing"));
    let order_column = &order.column;
    let order_ident = &order.ident;

    let insert_sql = &sql.insert;
    let seed_insert_sql = &sql.seed_insert;
    let patch_sql = &sql.patch;
    let get_by_id_sql = &sql.get_by_id;
    let delete_by_id_sql = &sql.delete_by_id;
    let count_all_sql = &sql.count_all;
    let first_page_sql = &sql.first_page;
    let page_after_sql = &sql.page_after;
    let create_table_sql = &sql.create_table;
    let create_indexes_sql = &sql.create_indexes;

    let column_names: Vec<_> = field_info.columns.iter().map(|c| &c.column).collect();

    let patch_bind_calls: Vec<_> = field_info
        .update_columns()
        .iter()
        .map(|c| {
            let ident = &c.ident;
            quote! { .bind(patch.#ident.clone()) }
        })
        .collect();

    quote! {
        impl store_object::TableMetadata for #name {
            type Patch = #patch_name;

            fn table_name() -> &'static str {
                #table_name
            }

            fn primary_key_field() -> &'static str {
                #pk_column
            }

            fn order_column() -> &'static str {
                #order_column
            }

            fn insert_sql() -> &'static str {
                #insert_sql
            }

            fn seed_insert_sql() -> &'static str {
                #seed_insert_sql
            }

            fn patch_sql() -> &'static str {
                #patch_sql
            }

            fn get_by_id_sql() -> &'static str {
                #get_by_id_sql
            }

            fn delete_by_id_sql() -> &'static str {
                #delete_by_id_sql
            }

            fn count_all_sql() -> &'static str {
                #count_all_sql
            }

            fn first_page_sql() -> &'static str {
                #first_page_sql
            }

            fn page_after_sql() -> &'static str {
                #page_after_sql
            }

            fn create_table_sql() -> String {
                #create_table_sql.to_string()
            }

            fn create_indexes_sql() -> Vec<String> {
                vec![#(#create_indexes_sql.to_string()),*]
            }

            fn column_names() -> &'static [&'static str] {
                &[#(#column_names),*]
            }

            fn id(&self) -> &str {
                &self.#pk_ident
            }

            fn order_key(&self) -> chrono::DateTime<chrono::Utc> {
                self.#order_ident
            }

            fn bind_patch_params<'a>(
                patch: &'a Self::Patch,
                id: &'a str,
            ) -> sqlx::query::QueryAs<'a, sqlx::Postgres, Self, sqlx::postgres::PgArguments> {
                sqlx::query_as::<_, Self>(Self::patch_sql())
                    #(#patch_bind_calls)*
                    .bind(id)
            }
        }
    }
}

/// Primitive numeric types, which patches accept as JSON numbers or numeric strings
fn is_numeric_type(type_string: &str) -> bool {
    matches!(
        type_string.replace(' ', "").as_str(),
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "f32" | "f64"
    )
}

/// Generate `{Name}Patch`: every updatable field as an `Option`, in the model's JSON shape
pub fn generate_patch_struct(name: &Ident, vis: &Visibility, field_info: &FieldInfo) -> TokenStream {
    let patch_name = patch_ident(name);
    let update_columns = field_info.update_columns();

    let fields: Vec<_> = update_columns
        .iter()
        .map(|c| {
            let ident = &c.ident;
            let inner = &c.inner_ty;
            let serde_attrs = &c.serde_attrs;
            // Numbers also arrive as strings from form inputs
            let lenient = is_numeric_type(&quote!(#inner).to_string()).then(|| {
                quote! {
                    #[serde(with = "serde_with::As::<Option<serde_with::PickFirst<(serde_with::Same, serde_with::DisplayFromStr)>>>")]
                }
            });
            quote! {
                #(#serde_attrs)*
                #lenient
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub #ident: Option<#inner>
            }
        })
        .collect();

    let apply_steps: Vec<_> = update_columns
        .iter()
        .map(|c| {
            let ident = &c.ident;
            if c.optional {
                quote! {
                    if let Some(value) = &self.#ident {
                        model.#ident = Some(value.clone());
                    }
                }
            } else {
                quote! {
                    if let Some(value) = &self.#ident {
                        model.#ident = value.clone();
                    }
                }
            }
        })
        .collect();

    let touch_updated_at = field_info.updated_at().map(|c| {
        let ident = &c.ident;
        quote! { model.#ident = chrono::Utc::now(); }
    });

    let changed_checks: Vec<_> = update_columns
        .iter()
        .map(|c| {
            let ident = &c.ident;
            let column = &c.column;
            quote! {
                if self.#ident.is_some() {
                    changed.push(#column);
                }
            }
        })
        .collect();

    let doc = format!("Partial write payload for [`{}`]", name);

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        #vis struct #patch_name {
            #(#fields),*
        }

        impl store_object::Patch<#name> for #patch_name {
            fn apply_to(&self, model: &mut #name) {
                #(#apply_steps)*
                #touch_updated_at
            }

            fn changed_fields(&self) -> Vec<&'static str> {
                let mut changed = Vec::new();
                #(#changed_checks)*
                changed
            }
        }
    }
}

/// Generate DatabaseExecutor trait implementation with proper async methods
pub fn generate_database_executor_impl(name: &Ident, field_info: &FieldInfo) -> TokenStream {
    // Generate binding expressions for insert fields
    let insert_bind_calls: Vec<_> = field_info
        .insert_columns()
        .iter()
        .map(|c| {
            let ident = &c.ident;
            quote! { .bind(self.#ident.clone()) }
        })
        .collect();

    quote! {
        #[async_trait::async_trait]
        impl store_object::DatabaseExecutor for #name {
            async fn execute_create(&self, pool: &sqlx::PgPool) -> Result<Self, store_object::StoreError> {
                sqlx::query_as::<_, Self>(<Self as store_object::TableMetadata>::insert_sql())
                    #(#insert_bind_calls)*
                    .fetch_one(pool)
                    .await
                    .map_err(|e| store_object::StoreError::database_operation(
                        <Self as store_object::TableMetadata>::table_name(),
                        "create",
                        e,
                    ))
            }

            async fn execute_create_tx(
                &self,
                tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
            ) -> Result<Self, store_object::StoreError> {
                sqlx::query_as::<_, Self>(<Self as store_object::TableMetadata>::insert_sql())
                    #(#insert_bind_calls)*
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(|e| store_object::StoreError::database_operation(
                        <Self as store_object::TableMetadata>::table_name(),
                        "create",
                        e,
                    ))
            }

            async fn execute_seed_tx(
                &self,
                tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
            ) -> Result<Option<Self>, store_object::StoreError> {
                sqlx::query_as::<_, Self>(<Self as store_object::TableMetadata>::seed_insert_sql())
                    #(#insert_bind_calls)*
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(|e| store_object::StoreError::database_operation(
                        <Self as store_object::TableMetadata>::table_name(),
                        "seed",
                        e,
                    ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse_field_attributes, parse_table_attributes};
    use syn::{parse_quote, DeriveInput};

    fn sql_for(input: DeriveInput) -> GeneratedSql {
        let table = parse_table_attributes(&input.attrs).unwrap();
        let fields = parse_field_attributes(&input.data, &table).unwrap();
        generate_sql(&table, &fields)
    }

    fn notes() -> DeriveInput {
        parse_quote! {
            #[table(name = "notes")]
            pub struct Note {
                #[primary_key]
                pub id: String,
                #[field(create, update)]
                pub body: String,
                #[field(create, update)]
                #[sqlx(rename = "type")]
                pub kind: NoteKind,
                #[field(create, update)]
                pub pinned_at: Option<DateTime<Utc>>,
                #[field(create)]
                pub created_at: DateTime<Utc>,
                #[field(create)]
                #[updated_at]
                pub updated_at: DateTime<Utc>,
            }
        }
    }

    #[test]
    fn test_insert_and_seed_sql() {
        let sql = sql_for(notes());
        assert_eq!(
            sql.insert,
            "INSERT INTO \"notes\" (\"id\", \"body\", \"type\", \"pinned_at\", \"created_at\", \"updated_at\") VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        );
        assert!(sql
            .seed_insert
            .ends_with("ON CONFLICT (\"id\") DO NOTHING RETURNING *"));
    }

    #[test]
    fn test_patch_sql_coalesces_and_touches_updated_at() {
        let sql = sql_for(notes());
        assert_eq!(
            sql.patch,
            "UPDATE \"notes\" SET \"body\" = COALESCE($1, \"body\"), \"type\" = COALESCE($2, \"type\"), \"pinned_at\" = COALESCE($3, \"pinned_at\"), \"updated_at\" = NOW() WHERE \"id\" = $4 RETURNING *"
        );
    }

    #[test]
    fn test_keyset_page_sql() {
        let sql = sql_for(notes());
        assert_eq!(
            sql.first_page,
            "SELECT * FROM \"notes\" ORDER BY \"created_at\" DESC, \"id\" DESC LIMIT $1"
        );
        assert_eq!(
            sql.page_after,
            "SELECT * FROM \"notes\" WHERE (\"created_at\", \"id\") < ($1, $2) ORDER BY \"created_at\" DESC, \"id\" DESC LIMIT $3"
        );
    }

    #[test]
    fn test_create_table_sql() {
        let sql = sql_for(notes());
        assert_eq!(
            sql.create_table,
            "CREATE TABLE IF NOT EXISTS \"notes\" (\"id\" TEXT COLLATE \"C\" PRIMARY KEY, \"body\" TEXT NOT NULL, \"type\" TEXT NOT NULL, \"pinned_at\" TIMESTAMP WITH TIME ZONE, \"created_at\" TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(), \"updated_at\" TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW())"
        );
        assert_eq!(
            sql.create_indexes,
            vec!["CREATE INDEX IF NOT EXISTS \"idx_notes_created_at_id\" ON \"notes\" (\"created_at\" DESC, \"id\" DESC)".to_string()]
        );
    }

    #[test]
    fn test_count_and_lookup_sql() {
        let sql = sql_for(notes());
        assert_eq!(sql.count_all, "SELECT COUNT(*) AS total FROM \"notes\"");
        assert_eq!(sql.get_by_id, "SELECT * FROM \"notes\" WHERE \"id\" = $1");
        assert_eq!(sql.delete_by_id, "DELETE FROM \"notes\" WHERE \"id\" = $1");
    }

    #[test]
    fn test_patch_numbers_accept_strings() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "listings")]
            pub struct Listing {
                #[primary_key]
                pub id: String,
                #[field(create, update)]
                pub title: String,
                #[field(create, update)]
                pub price: f64,
                #[field(create, update)]
                pub rooms: Option<i32>,
                #[field(create)]
                pub created_at: DateTime<Utc>,
            }
        };
        let table = parse_table_attributes(&input.attrs).unwrap();
        let fields = parse_field_attributes(&input.data, &table).unwrap();
        let name: Ident = parse_quote!(Listing);
        let vis: Visibility = parse_quote!(pub);

        let tokens = generate_patch_struct(&name, &vis, &fields).to_string();
        assert_eq!(tokens.matches("DisplayFromStr").count(), 2);
        assert!(tokens.contains("pub title : Option < String >"));
        assert!(is_numeric_type("f64"));
        assert!(!is_numeric_type("String"));
    }
}
