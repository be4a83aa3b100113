use std::sync::Arc;

use chrono::{DateTime, Utc};
use store_object::{StoreObject, Validate, ValidationErrors, ValidationMode, Validator};
use table_derive::model;

use super::{required, seed_day, seed_stamp, Entity};
use crate::core::Stores;

type_mapping::text_enum! {
    pub enum ContractStatus {
        Draft => "Draft",
        Sent => "Sent",
        Signed => "Signed",
        Expired => "Expired",
    }
}

/// Agreement between a client and a property. The referenced ids are not
/// checked; views show "N/A" for a dangling one.
#[model]
#[table(name = "contracts")]
pub struct Contract {
    #[primary_key]
    pub id: String,

    #[field(create, update)]
    pub property_id: String,

    #[field(create, update)]
    pub client_id: String,

    #[field(create, update)]
    pub status: ContractStatus,

    #[field(create, update)]
    pub signing_date: Option<DateTime<Utc>>,

    #[field(create, update)]
    pub expiry_date: DateTime<Utc>,

    #[field(create, update)]
    pub amount: f64,

    #[field(create)]
    pub created_at: DateTime<Utc>,

    #[field(create)]
    #[updated_at]
    pub updated_at: DateTime<Utc>,
}

impl Validate for ContractPatch {
    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(mode);
        v.field("propertyId", self.property_id.as_ref())
            .required()
            .non_empty("Please select a property.");
        v.field("clientId", self.client_id.as_ref())
            .required()
            .non_empty("Please select a client.");
        v.field("status", self.status.as_ref()).required();
        v.field("expiryDate", self.expiry_date.as_ref()).required();
        v.field("amount", self.amount.as_ref())
            .required()
            .positive("Amount must be a positive number.");
        v.finish()
    }
}

impl Entity for Contract {
    const RESOURCE: &'static str = "contracts";
    const LABEL: &'static str = "contract";

    fn store(stores: &Stores) -> &Arc<dyn StoreObject<Model = Self>> {
        &stores.contracts
    }

    fn from_payload(
        id: String,
        now: DateTime<Utc>,
        payload: ContractPatch,
    ) -> Result<Self, ValidationErrors> {
        Ok(Self {
            id,
            property_id: required(payload.property_id, "propertyId")?,
            client_id: required(payload.client_id, "clientId")?,
            status: required(payload.status, "status")?,
            signing_date: payload.signing_date,
            expiry_date: required(payload.expiry_date, "expiryDate")?,
            amount: required(payload.amount, "amount")?,
            created_at: now,
            updated_at: now,
        })
    }

    fn seed_records(now: DateTime<Utc>) -> Vec<Self> {
        let rows = [
            ("con-1", "prop-2", "cli-1", ContractStatus::Signed, Some(seed_day(2023, 9, 15)), seed_day(2023, 10, 30), 1_200_000.0),
            ("con-2", "prop-3", "cli-4", ContractStatus::Sent, None, seed_day(2023, 11, 10), 950_000.0),
            ("con-3", "prop-1", "cli-2", ContractStatus::Draft, None, seed_day(2023, 11, 20), 750_000.0),
            ("con-4", "prop-4", "cli-5", ContractStatus::Draft, None, seed_day(2023, 12, 1), 3_500_000.0),
        ];

        rows.into_iter()
            .enumerate()
            .map(
                |(i, (id, property_id, client_id, status, signing_date, expiry_date, amount))| {
                    let stamp = seed_stamp(now, i);
                    Self {
                        id: id.to_string(),
                        property_id: property_id.to_string(),
                        client_id: client_id.to_string(),
                        status,
                        signing_date,
                        expiry_date,
                        amount,
                        created_at: stamp,
                        updated_at: stamp,
                    }
                },
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_object::TableMetadata;

    #[test]
    fn test_signing_date_is_optional() {
        let patch: ContractPatch = serde_json::from_value(serde_json::json!({
            "propertyId": "prop-1",
            "clientId": "cli-1",
            "status": "Draft",
            "expiryDate": "2024-06-30T00:00:00Z",
            "amount": 500000
        }))
        .unwrap();
        assert!(patch.validate(ValidationMode::Create).is_ok());

        let contract = Contract::from_payload("c".to_string(), Utc::now(), patch).unwrap();
        assert!(contract.signing_date.is_none());
        let json = serde_json::to_value(&contract).unwrap();
        assert!(json["signingDate"].is_null());
        assert_eq!(json["propertyId"], "prop-1");
    }

    #[test]
    fn test_malformed_expiry_date_is_a_type_error() {
        let result: Result<ContractPatch, _> =
            serde_json::from_value(serde_json::json!({"expiryDate": "next tuesday"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_rules() {
        let patch = ContractPatch {
            property_id: Some(String::new()),
            amount: Some(-5.0),
            ..Default::default()
        };
        let errors = patch.validate(ValidationMode::Create).unwrap_err();
        for field in ["propertyId", "clientId", "status", "expiryDate", "amount"] {
            assert!(errors.has_field(field), "{}", field);
        }
    }

    #[test]
    fn test_nullable_signing_date_column() {
        let ddl = Contract::create_table_sql();
        assert!(ddl.contains("\"signing_date\" TIMESTAMP WITH TIME ZONE,"));
        assert!(ddl.contains("\"expiry_date\" TIMESTAMP WITH TIME ZONE NOT NULL"));
    }
}
