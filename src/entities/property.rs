use std::sync::Arc;

use chrono::{DateTime, Utc};
use store_object::{StoreObject, Validate, ValidationErrors, ValidationMode, Validator};
use table_derive::model;

use super::{required, seed_stamp, Entity};
use crate::core::Stores;

type_mapping::text_enum! {
    /// Listing state of a property
    pub enum PropertyStatus {
        ForSale => "For Sale",
        Sold => "Sold",
        Pending => "Pending",
    }
}

#[model]
#[table(name = "properties")]
pub struct Property {
    #[primary_key]
    pub id: String,

    #[field(create, update)]
    pub name: String,

    #[field(create, update)]
    pub address: String,

    #[field(create, update)]
    pub price: f64,

    #[field(create, update)]
    pub status: PropertyStatus,

    #[field(create, update)]
    pub image_url: String,

    #[field(create, update)]
    pub bedrooms: i32,

    #[field(create, update)]
    pub bathrooms: i32,

    #[field(create, update)]
    pub sqft: i32,

    #[field(create)]
    pub created_at: DateTime<Utc>,

    #[field(create)]
    #[updated_at]
    pub updated_at: DateTime<Utc>,
}

impl Validate for PropertyPatch {
    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(mode);
        v.field("name", self.name.as_ref())
            .required()
            .min_chars(5, "Property name must be at least 5 characters.");
        v.field("address", self.address.as_ref())
            .required()
            .min_chars(10, "Address must be at least 10 characters.");
        v.field("price", self.price.as_ref())
            .required()
            .positive("Price must be a positive number.");
        v.field("status", self.status.as_ref()).required();
        v.field("imageUrl", self.image_url.as_ref())
            .required()
            .http_url("Please enter a valid image URL.");
        v.field("bedrooms", self.bedrooms.as_ref())
            .required()
            .at_least(0, "Bedrooms cannot be negative.");
        v.field("bathrooms", self.bathrooms.as_ref())
            .required()
            .at_least(0, "Bathrooms cannot be negative.");
        v.field("sqft", self.sqft.as_ref())
            .required()
            .positive("Square footage must be a positive number.");
        v.finish()
    }
}

impl Entity for Property {
    const RESOURCE: &'static str = "properties";
    const LABEL: &'static str = "property";

    fn store(stores: &Stores) -> &Arc<dyn StoreObject<Model = Self>> {
        &stores.properties
    }

    fn from_payload(
        id: String,
        now: DateTime<Utc>,
        payload: PropertyPatch,
    ) -> Result<Self, ValidationErrors> {
        Ok(Self {
            id,
            name: required(payload.name, "name")?,
            address: required(payload.address, "address")?,
            price: required(payload.price, "price")?,
            status: required(payload.status, "status")?,
            image_url: required(payload.image_url, "imageUrl")?,
            bedrooms: required(payload.bedrooms, "bedrooms")?,
            bathrooms: required(payload.bathrooms, "bathrooms")?,
            sqft: required(payload.sqft, "sqft")?,
            created_at: now,
            updated_at: now,
        })
    }

    fn seed_records(now: DateTime<Utc>) -> Vec<Self> {
        let rows = [
            (
                "prop-1",
                "Modern Downtown Loft",
                "123 Main St, Anytown",
                750_000.0,
                PropertyStatus::ForSale,
                "https://images.unsplash.com/photo-1580587771525-78b9dba3b914?q=80&w=2000",
                (2, 2, 1200),
            ),
            (
                "prop-2",
                "Suburban Family Home",
                "456 Oak Ave, Suburbia",
                1_200_000.0,
                PropertyStatus::Sold,
                "https://images.unsplash.com/photo-1568605114967-8130f3a36994?q=80&w=2000",
                (4, 3, 2500),
            ),
            (
                "prop-3",
                "Cozy Beachside Cottage",
                "789 Ocean Blvd, Beachtown",
                950_000.0,
                PropertyStatus::Pending,
                "https://images.unsplash.com/photo-1570129477492-45c003edd2be?q=80&w=2000",
                (3, 2, 1800),
            ),
            (
                "prop-4",
                "Luxury Penthouse Suite",
                "101 Sky High Rd, Metropolis",
                3_500_000.0,
                PropertyStatus::ForSale,
                "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?q=80&w=2000",
                (3, 4, 3200),
            ),
        ];

        rows.into_iter()
            .enumerate()
            .map(
                |(i, (id, name, address, price, status, image_url, (bedrooms, bathrooms, sqft)))| {
                    let stamp = seed_stamp(now, i);
                    Self {
                        id: id.to_string(),
                        name: name.to_string(),
                        address: address.to_string(),
                        price,
                        status,
                        image_url: image_url.to_string(),
                        bedrooms,
                        bathrooms,
                        sqft,
                        created_at: stamp,
                        updated_at: stamp,
                    }
                },
            )
            .collect()
    }
}
