pub mod client;
pub mod graphql;

pub use crate::shared::errors::ApiError;
pub use client::{ActionResponse, ApiClient};
pub use graphql::GraphQlError;
