// src/domain/mod.rs
pub mod activity_model;
pub mod activity_status;
pub mod annual_plan_model;
pub mod approval_flow_model;
pub mod approval_model;
pub mod approval_status;
pub mod approver_role_model;
pub mod level_type;
pub mod organization_level_model;
pub mod position;
pub mod user_model;
pub mod user_profile_model;
pub mod workflow_module;
