//! Stored entities
//!
//! Each entity is a `#[model]` struct with a generated `{Name}Patch` that
//! doubles as its create payload. `Entity` ties a model to its route, its
//! store and its seed rows.

pub mod client;
pub mod contract;
pub mod property;
pub mod transaction;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use store_object::{StoreObject, TableMetadata, Validate, ValidationErrors};

use crate::core::Stores;

pub use client::{Client, ClientPatch, ClientStatus};
pub use contract::{Contract, ContractPatch, ContractStatus};
pub use property::{Property, PropertyPatch, PropertyStatus};
pub use transaction::{Transaction, TransactionCategory, TransactionKind, TransactionPatch};

pub trait Entity: TableMetadata<Patch: Validate> {
    /// Collection name: the `/api/{RESOURCE}` path segment and the cache key
    const RESOURCE: &'static str;

    /// Singular noun used in log lines
    const LABEL: &'static str;

    fn store(stores: &Stores) -> &Arc<dyn StoreObject<Model = Self>>;

    /// Build a new record from a create payload that passed validation
    fn from_payload(
        id: String,
        now: DateTime<Utc>,
        payload: Self::Patch,
    ) -> Result<Self, ValidationErrors>;

    /// Example rows inserted into an empty table
    fn seed_records(now: DateTime<Utc>) -> Vec<Self>;

    /// Hook run after every successful write
    fn audit(&self) {}
}

/// Unwrap a payload field that create-mode validation already required
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| ValidationErrors::single(field, "is required"))
}

/// Midnight UTC on a calendar day, for fixed seed dates
pub(crate) fn seed_day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Creation stamps for seed rows: the first row is the newest
pub(crate) fn seed_stamp(now: DateTime<Utc>, index: usize) -> DateTime<Utc> {
    now - chrono::Duration::seconds(index as i64)
}
