// src/api/handlers/mod.rs
pub mod activity_handler;
pub mod approval_flow_handler;
pub mod approval_handler;
pub mod auth_handler;
pub mod dashboard_handler;
pub mod organization_handler;
pub mod plan_handler;
pub mod user_handler;
