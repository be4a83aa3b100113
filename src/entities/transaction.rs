use std::sync::Arc;

use chrono::{DateTime, Utc};
use store_object::{StoreObject, Validate, ValidationErrors, ValidationMode, Validator};
use table_derive::model;
use tracing::warn;

use super::{required, seed_day, seed_stamp, Entity};
use crate::core::Stores;

type_mapping::text_enum! {
    pub enum TransactionCategory {
        Commission => "Commission",
        Expense => "Expense",
        Marketing => "Marketing",
        Other => "Other",
    }
}

type_mapping::text_enum! {
    /// Direction of money; serialized as the `type` field
    pub enum TransactionKind {
        Income => "Income",
        Expense => "Expense",
    }
}

/// Ledger entry. Listed by `date`, newest first.
#[model]
#[table(name = "transactions", order_by = "date")]
pub struct Transaction {
    #[primary_key]
    pub id: String,

    #[field(create, update)]
    pub date: DateTime<Utc>,

    #[field(create, update)]
    pub description: String,

    #[field(create, update)]
    pub category: TransactionCategory,

    /// Signed; negative for money going out
    #[field(create, update)]
    pub amount: f64,

    #[field(create, update)]
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: TransactionKind,

    #[field(create)]
    pub created_at: DateTime<Utc>,

    #[field(create)]
    #[updated_at]
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// True when the sign of `amount` contradicts `type`
    ///
    /// Both are stored as given; reports read `type`.
    pub fn sign_conflict(&self) -> bool {
        match self.kind {
            TransactionKind::Income => self.amount < 0.0,
            TransactionKind::Expense => self.amount > 0.0,
        }
    }
}

impl Validate for TransactionPatch {
    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(mode);
        v.field("date", self.date.as_ref()).required();
        v.field("description", self.description.as_ref())
            .required()
            .min_chars(3, "Description must be at least 3 characters.");
        v.field("category", self.category.as_ref()).required();
        v.field("amount", self.amount.as_ref())
            .required()
            .non_zero("Amount cannot be zero.");
        v.field("type", self.kind.as_ref()).required();
        v.finish()
    }
}

impl Entity for Transaction {
    const RESOURCE: &'static str = "transactions";
    const LABEL: &'static str = "transaction";

    fn store(stores: &Stores) -> &Arc<dyn StoreObject<Model = Self>> {
        &stores.transactions
    }

    fn from_payload(
        id: String,
        now: DateTime<Utc>,
        payload: TransactionPatch,
    ) -> Result<Self, ValidationErrors> {
        Ok(Self {
            id,
            date: required(payload.date, "date")?,
            description: required(payload.description, "description")?,
            category: required(payload.category, "category")?,
            amount: required(payload.amount, "amount")?,
            kind: required(payload.kind, "type")?,
            created_at: now,
            updated_at: now,
        })
    }

    fn seed_records(now: DateTime<Utc>) -> Vec<Self> {
        use TransactionCategory as C;
        use TransactionKind as K;

        let rows = [
            ("trn-1", seed_day(2023, 10, 25), "Commission from 456 Oak Ave", C::Commission, 36_000.0, K::Income),
            ("trn-2", seed_day(2023, 10, 22), "Zillow Premier Agent Ads", C::Marketing, -1_500.0, K::Expense),
            ("trn-3", seed_day(2023, 10, 20), "Office Supplies", C::Expense, -250.0, K::Expense),
            ("trn-4", seed_day(2023, 10, 18), "Rental income Q3", C::Other, 5_000.0, K::Income),
        ];

        rows.into_iter()
            .enumerate()
            .map(|(i, (id, date, description, category, amount, kind))| {
                let stamp = seed_stamp(now, i);
                Self {
                    id: id.to_string(),
                    date,
                    description: description.to_string(),
                    category,
                    amount,
                    kind,
                    created_at: stamp,
                    updated_at: stamp,
                }
            })
            .collect()
    }

    fn audit(&self) {
        if self.sign_conflict() {
            warn!(
                id = %self.id,
                amount = self.amount,
                kind = %self.kind,
                "transaction amount sign disagrees with its type"
            );
        }
    }
}
