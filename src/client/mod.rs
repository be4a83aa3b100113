//! Client side of the API
//!
//! A typed HTTP client, a cached data layer over it, and the computations
//! behind the pipeline board and the list views.

pub mod api_client;
pub mod data_layer;
pub mod pipeline;
pub mod views;

pub use api_client::{ApiClient, ClientError};
pub use data_layer::DataLayer;
pub use pipeline::{DropTarget, MoveOutcome, PipelineBoard, PipelineColumn};
