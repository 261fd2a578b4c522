// src/api/dto/mod.rs
pub mod activity_dto;
pub mod approval_dto;
pub mod approval_flow_dto;
pub mod auth_dto;
pub mod common;
pub mod dashboard_dto;
pub mod organization_dto;
pub mod plan_dto;
pub mod user_dto;

// Re-export common response types
pub use common::{PaginatedResponse, PaginationMeta, PaginationQuery};
