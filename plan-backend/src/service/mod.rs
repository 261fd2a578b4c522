// src/service/mod.rs
pub mod activity_service;
pub mod approval_flow_service;
pub mod approval_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod notification_service;
pub mod organization_service;
pub mod plan_service;
pub mod report_service;
pub mod user_service;
