use std::sync::Arc;

use chrono::{DateTime, Utc};
use store_object::{StoreObject, Validate, ValidationErrors, ValidationMode, Validator};
use table_derive::model;

use super::{required, seed_day, seed_stamp, Entity};
use crate::core::Stores;

type_mapping::text_enum! {
    /// Pipeline stage of a client; also the pipeline board column
    pub enum ClientStatus {
        Lead => "Lead",
        Active => "Active",
        Inactive => "Inactive",
    }
}

#[model]
#[table(name = "clients")]
pub struct Client {
    #[primary_key]
    pub id: String,

    #[field(create, update)]
    pub name: String,

    #[field(create, update)]
    pub email: String,

    #[field(create, update)]
    pub phone: String,

    #[field(create, update)]
    pub status: ClientStatus,

    /// Set by the server when the client is created
    #[field(create)]
    pub last_contacted: DateTime<Utc>,

    #[field(create)]
    pub created_at: DateTime<Utc>,

    #[field(create)]
    #[updated_at]
    pub updated_at: DateTime<Utc>,
}

impl Validate for ClientPatch {
    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(mode);
        v.field("name", self.name.as_ref())
            .required()
            .min_chars(2, "Name must be at least 2 characters.");
        v.field("email", self.email.as_ref())
            .required()
            .email("Please enter a valid email.");
        v.field("phone", self.phone.as_ref())
            .required()
            .min_chars(10, "Phone number must be at least 10 digits.");
        v.field("status", self.status.as_ref()).required();
        v.finish()
    }
}

impl Entity for Client {
    const RESOURCE: &'static str = "clients";
    const LABEL: &'static str = "client";

    fn store(stores: &Stores) -> &Arc<dyn StoreObject<Model = Self>> {
        &stores.clients
    }

    fn from_payload(
        id: String,
        now: DateTime<Utc>,
        payload: ClientPatch,
    ) -> Result<Self, ValidationErrors> {
        Ok(Self {
            id,
            name: required(payload.name, "name")?,
            email: required(payload.email, "email")?,
            phone: required(payload.phone, "phone")?,
            status: required(payload.status, "status")?,
            last_contacted: now,
            created_at: now,
            updated_at: now,
        })
    }

    fn seed_records(now: DateTime<Utc>) -> Vec<Self> {
        let rows = [
            ("cli-1", "John Doe", "john.doe@example.com", "123-456-7890", ClientStatus::Active, seed_day(2023, 10, 26)),
            ("cli-2", "Jane Smith", "jane.smith@example.com", "098-765-4321", ClientStatus::Lead, seed_day(2023, 10, 28)),
            ("cli-3", "Sam Wilson", "sam.wilson@example.com", "555-555-5555", ClientStatus::Inactive, seed_day(2023, 1, 15)),
            ("cli-4", "Alice Johnson", "alice.j@example.com", "111-222-3333", ClientStatus::Active, seed_day(2023, 10, 25)),
            ("cli-5", "Bob Brown", "bob.b@example.com", "444-555-6666", ClientStatus::Lead, seed_day(2023, 10, 29)),
        ];

        rows.into_iter()
            .enumerate()
            .map(|(i, (id, name, email, phone, status, last_contacted))| {
                let stamp = seed_stamp(now, i);
                Self {
                    id: id.to_string(),
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: phone.to_string(),
                    status,
                    last_contacted,
                    created_at: stamp,
                    updated_at: stamp,
                }
            })
            .collect()
    }
}
