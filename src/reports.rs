//! Dashboard figures computed over the full contents of every store

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use store_object::pagination::MAX_LIMIT;
use store_object::{Cursor, PageRequest, StoreError, StoreObject, TableMetadata};

use crate::core::Stores;
use crate::entities::{
    Client, ClientStatus, Contract, ContractStatus, Property, PropertyStatus, Transaction,
    TransactionCategory, TransactionKind,
};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Income-commission activity for one calendar month, across all years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub name: String,
    pub sales: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sum of `Income` amounts
    pub total_revenue: f64,
    pub new_leads: usize,
    pub active_listings: usize,
    pub contracts_pending: usize,
    /// Jan through Dec
    pub monthly: Vec<MonthlyPoint>,
}

impl DashboardSummary {
    pub fn compute(
        clients: &[Client],
        properties: &[Property],
        transactions: &[Transaction],
        contracts: &[Contract],
    ) -> Self {
        let mut monthly: Vec<MonthlyPoint> = MONTHS
            .iter()
            .map(|name| MonthlyPoint {
                name: name.to_string(),
                sales: 0,
                revenue: 0.0,
            })
            .collect();

        for t in transactions {
            if t.kind == TransactionKind::Income && t.category == TransactionCategory::Commission {
                let point = &mut monthly[t.date.month0() as usize];
                point.sales += 1;
                point.revenue += t.amount;
            }
        }

        Self {
            total_revenue: transactions
                .iter()
                .filter(|t| t.kind == TransactionKind::Income)
                .map(|t| t.amount)
                .sum(),
            new_leads: clients
                .iter()
                .filter(|c| c.status == ClientStatus::Lead)
                .count(),
            active_listings: properties
                .iter()
                .filter(|p| p.status == PropertyStatus::ForSale)
                .count(),
            contracts_pending: contracts
                .iter()
                .filter(|c| c.status == ContractStatus::Sent)
                .count(),
            monthly,
        }
    }
}

/// Every record of a store, walking pages of the largest size
pub async fn load_all<T>(store: &dyn StoreObject<Model = T>) -> Result<Vec<T>, StoreError>
where
    T: TableMetadata,
{
    let mut records = Vec::new();
    let mut request = PageRequest::first(MAX_LIMIT);
    loop {
        let page = store.list(&request).await?;
        crate::trace_log!(
            "loaded {} {} rows, more: {}",
            page.items.len(),
            T::table_name(),
            page.next.is_some()
        );
        records.extend(page.items);
        match page.next {
            Some(next) => request = PageRequest::first(MAX_LIMIT).after(Cursor::decode(&next)?),
            None => return Ok(records),
        }
    }
}

pub async fn dashboard(stores: &Stores) -> Result<DashboardSummary, StoreError> {
    let clients = load_all(stores.clients.as_ref()).await?;
    let properties = load_all(stores.properties.as_ref()).await?;
    let transactions = load_all(stores.transactions.as_ref()).await?;
    let contracts = load_all(stores.contracts.as_ref()).await?;

    Ok(DashboardSummary::compute(
        &clients,
        &properties,
        &transactions,
        &contracts,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{seed_day, Entity};
    use chrono::Utc;

    fn seeded() -> DashboardSummary {
        let now = Utc::now();
        DashboardSummary::compute(
            &Client::seed_records(now),
            &Property::seed_records(now),
            &Transaction::seed_records(now),
            &Contract::seed_records(now),
        )
    }

    #[test]
    fn test_seed_figures() {
        let summary = seeded();
        assert_eq!(summary.total_revenue, 41_000.0);
        assert_eq!(summary.new_leads, 2);
        assert_eq!(summary.active_listings, 2);
        assert_eq!(summary.contracts_pending, 1);
    }

    #[test]
    fn test_monthly_counts_income_commissions_only() {
        let summary = seeded();
        assert_eq!(summary.monthly.len(), 12);
        assert_eq!(summary.monthly[0].name, "Jan");
        assert_eq!(summary.monthly[9].name, "Oct");
        assert_eq!(summary.monthly[9].sales, 1);
        assert_eq!(summary.monthly[9].revenue, 36_000.0);
        let others: usize = summary
            .monthly
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 9)
            .map(|(_, p)| p.sales)
            .sum();
        assert_eq!(others, 0);
    }

    #[test]
    fn test_months_merge_across_years() {
        let mut transactions = Transaction::seed_records(Utc::now());
        transactions[3].category = TransactionCategory::Commission;
        transactions[3].date = seed_day(2021, 10, 2);

        let summary = DashboardSummary::compute(&[], &[], &transactions, &[]);
        assert_eq!(summary.monthly[9].sales, 2);
        assert_eq!(summary.monthly[9].revenue, 41_000.0);
    }

    #[tokio::test]
    async fn test_load_all_walks_every_page() {
        let stores = Stores::memory();
        let template = Transaction::seed_records(Utc::now()).remove(0);
        let records: Vec<Transaction> = (0..MAX_LIMIT + 35)
            .map(|i| Transaction {
                id: format!("trn-bulk-{:03}", i),
                created_at: template.created_at + chrono::Duration::seconds(i as i64),
                ..template.clone()
            })
            .collect();
        stores.transactions.create_many(records).await.unwrap();

        let loaded = load_all(stores.transactions.as_ref()).await.unwrap();
        assert_eq!(loaded.len(), MAX_LIMIT + 35);
        assert_eq!(loaded[0].id, format!("trn-bulk-{:03}", MAX_LIMIT + 34));

        let summary = dashboard(&stores).await.unwrap();
        assert_eq!(summary.total_revenue, template.amount * (MAX_LIMIT + 35) as f64);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(DashboardSummary::compute(&[], &[], &[], &[])).unwrap();
        assert_eq!(json["totalRevenue"], 0.0);
        assert!(json.get("contractsPending").is_some());
        assert_eq!(json["monthly"][11]["name"], "Dec");
    }
}
