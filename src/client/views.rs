//! Row shapes and lookups behind the list pages

use serde::Serialize;

use crate::entities::{Client, Contract, ContractStatus, Property};

/// Shown in place of a name when a reference points nowhere
pub const MISSING: &str = "N/A";

/// A contract with its property and client resolved to names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRow {
    pub id: String,
    pub property_name: String,
    pub client_name: String,
    pub status: ContractStatus,
    pub amount: f64,
}

pub fn contract_rows(
    contracts: &[Contract],
    properties: &[Property],
    clients: &[Client],
) -> Vec<ContractRow> {
    contracts
        .iter()
        .map(|contract| ContractRow {
            id: contract.id.clone(),
            property_name: properties
                .iter()
                .find(|p| p.id == contract.property_id)
                .map_or_else(|| MISSING.to_string(), |p| p.name.clone()),
            client_name: clients
                .iter()
                .find(|c| c.id == contract.client_id)
                .map_or_else(|| MISSING.to_string(), |c| c.name.clone()),
            status: contract.status,
            amount: contract.amount,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SearchHit {
    Client { id: String, name: String, email: String },
    Property { id: String, name: String, address: String },
}

/// Case-insensitive match over client name/email and property name/address
///
/// An empty or blank query matches nothing.
pub fn global_search(query: &str, clients: &[Client], properties: &[Property]) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let matches = |text: &str| text.to_lowercase().contains(&needle);

    let client_hits = clients
        .iter()
        .filter(|c| matches(&c.name) || matches(&c.email))
        .map(|c| SearchHit::Client {
            id: c.id.clone(),
            name: c.name.clone(),
            email: c.email.clone(),
        });
    let property_hits = properties
        .iter()
        .filter(|p| matches(&p.name) || matches(&p.address))
        .map(|p| SearchHit::Property {
            id: p.id.clone(),
            name: p.name.clone(),
            address: p.address.clone(),
        });

    client_hits.chain(property_hits).collect()
}

/// US dollar amount with cents, e.g. `$1,200,000.00` or `-$250.00`
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}
