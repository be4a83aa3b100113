//! Pipeline board state
//!
//! Clients are grouped into one column per status. Dropping a card on a
//! column, or on a card in another column, moves the client to that status.

use cache_system::QueryKey;
use serde::Serialize;
use tracing::{info, warn};

use super::api_client::Result;
use super::data_layer::DataLayer;
use crate::entities::{Client, ClientPatch, ClientStatus};

/// Where a dragged card was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column(ClientStatus),
    /// Another card, identified by client id; resolves to that card's column
    Card(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineColumn {
    pub status: ClientStatus,
    pub clients: Vec<Client>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved(Client),
    /// Target column is the card's current column
    Unchanged,
    /// Card or target is not on the board
    Ignored,
}

/// Lead, Active and Inactive columns, in that order
pub fn group_by_status(clients: Vec<Client>) -> Vec<PipelineColumn> {
    let mut columns: Vec<PipelineColumn> = ClientStatus::ALL
        .iter()
        .map(|status| PipelineColumn {
            status: *status,
            clients: Vec::new(),
        })
        .collect();

    for client in clients {
        if let Some(column) = columns.iter_mut().find(|c| c.status == client.status) {
            column.clients.push(client);
        }
    }
    columns
}

/// Status a drop target stands for, if it is on the board
pub fn resolve_target(target: &DropTarget, clients: &[Client]) -> Option<ClientStatus> {
    match target {
        DropTarget::Column(status) => Some(*status),
        DropTarget::Card(id) => clients.iter().find(|c| &c.id == id).map(|c| c.status),
    }
}

#[derive(Debug, Clone)]
pub struct PipelineBoard {
    data: DataLayer,
}

impl PipelineBoard {
    pub fn new(data: DataLayer) -> Self {
        Self { data }
    }

    /// Cache key of the board's client list, under the `clients` tree
    pub fn key() -> QueryKey {
        QueryKey::resource("clients").child("pipeline")
    }

    async fn clients(&self) -> Result<Vec<Client>> {
        let api = self.data.api();
        self.data
            .cache()
            .get_or_fetch(&Self::key(), || api.list_all::<Client>())
            .await
    }

    pub async fn columns(&self) -> Result<Vec<PipelineColumn>> {
        Ok(group_by_status(self.clients().await?))
    }

    /// Move a card and refresh the board
    ///
    /// The board key is dropped whether the update succeeds or fails, so the
    /// next read reflects the server. The `clients` tree is dropped on success.
    pub async fn move_card(&self, client_id: &str, target: &DropTarget) -> Result<MoveOutcome> {
        let clients = self.clients().await?;
        let Some(card) = clients.iter().find(|c| c.id == client_id) else {
            return Ok(MoveOutcome::Ignored);
        };
        let Some(status) = resolve_target(target, &clients) else {
            return Ok(MoveOutcome::Ignored);
        };
        if card.status == status {
            return Ok(MoveOutcome::Unchanged);
        }

        let patch = ClientPatch {
            status: Some(status),
            ..Default::default()
        };
        let result = self.data.api().update::<Client>(client_id, &patch).await;
        self.data.cache().invalidate(&Self::key()).await;

        match result {
            Ok(updated) => {
                self.data.invalidate_resource::<Client>().await;
                info!(client = %client_id, status = %status, "moved pipeline card");
                Ok(MoveOutcome::Moved(updated))
            }
            Err(e) => {
                warn!(client = %client_id, error = %e, "pipeline move failed");
                Err(e)
            }
        }
    }
}
