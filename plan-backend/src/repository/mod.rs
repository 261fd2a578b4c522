// plan-backend/src/repository/mod.rs
pub mod activity_repository;
pub mod annual_plan_repository;
pub mod approval_flow_repository;
pub mod approval_repository;
pub mod approver_role_repository;
pub mod organization_level_repository;
pub mod user_profile_repository;
pub mod user_repository;
