//! SQL type conversion utilities
//!
//! This module handles conversion between Rust types
//! and their SQL equivalents.

/// Map Rust type names to PostgreSQL types for DDL generation
///
/// Unknown types map to `TEXT`, which is how `text_enum!` types are stored.
pub fn rust_type_to_pg_type(rust_type: &str) -> &'static str {
    // Normalize type string by removing all whitespace for consistent matching
    let normalized = rust_type.replace(' ', "");
    let inner = normalized
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(&normalized);

    match inner {
        "String" | "&str" => "TEXT",
        "i8" | "i16" => "SMALLINT",
        "i32" | "u16" => "INTEGER",
        "i64" | "u32" => "BIGINT",
        "u64" => "NUMERIC(20,0)", // PostgreSQL doesn't have native u64
        "f32" => "REAL",
        "f64" => "DOUBLE PRECISION",
        "bool" => "BOOLEAN",
        "DateTime<Utc>" | "chrono::DateTime<chrono::Utc>" | "chrono::NaiveDateTime" => {
            "TIMESTAMP WITH TIME ZONE"
        }
        "NaiveDate" | "chrono::NaiveDate" => "DATE",
        "serde_json::Value" | "Value" => "JSONB",
        "Vec<String>" => "TEXT[]",
        _ => "TEXT",
    }
}

/// Check if a Rust type is Optional (nullable in SQL)
pub fn is_optional_type(rust_type: &str) -> bool {
    rust_type.trim().starts_with("Option")
}
