// plan-backend/src/service/approval_flow_service.rs

use crate::api::dto::approval_flow_dto::{
    AddApproverRoleRequest, ApprovalFlowDto, ApproverRoleDto, CreateApprovalFlowRequest,
};
use crate::db::DbPool;
use crate::domain::approver_role_model;
use crate::error::AppResult;
use crate::repository::approval_flow_repository::ApprovalFlowRepository;
use crate::repository::approver_role_repository::{ApproverRoleRepository, CreateApproverRole};
use crate::repository::user_repository::UserRepository;
use crate::utils::error_helper::{conflict_error, not_found_error, validation_error};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 承認フロー管理サービス
pub struct ApprovalFlowService {
    flow_repo: Arc<ApprovalFlowRepository>,
    role_repo: Arc<ApproverRoleRepository>,
    user_repo: Arc<UserRepository>,
}

impl ApprovalFlowService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            flow_repo: Arc::new(ApprovalFlowRepository::new(db_pool.clone())),
            role_repo: Arc::new(ApproverRoleRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool)),
        }
    }

    /// 承認フロー一覧を取得（ロールを承認順で含む）
    pub async fn list_flows(&self) -> AppResult<Vec<ApprovalFlowDto>> {
        let flows = self.flow_repo.find_all().await?;

        let mut result = Vec::with_capacity(flows.len());
        for flow in flows {
            let roles = self.role_repo.find_by_flow(flow.id).await?;
            let roles = self.enrich_roles(roles).await?;
            result.push(ApprovalFlowDto::new(flow, roles));
        }

        Ok(result)
    }

    /// 承認フローを取得
    pub async fn get_flow(&self, flow_id: Uuid) -> AppResult<ApprovalFlowDto> {
        let flow = self
            .flow_repo
            .find_by_id(flow_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Approval flow",
                    &flow_id.to_string(),
                    "approval_flow_service::get_flow",
                )
            })?;

        let roles = self.role_repo.find_by_flow(flow.id).await?;
        let roles = self.enrich_roles(roles).await?;

        Ok(ApprovalFlowDto::new(flow, roles))
    }

    /// 承認フローを作成
    pub async fn create_flow(
        &self,
        request: CreateApprovalFlowRequest,
    ) -> AppResult<ApprovalFlowDto> {
        if self
            .flow_repo
            .find_by_module(request.module.as_str())
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "An approval flow for this module already exists",
                "approval_flow_service::create_flow",
            ));
        }

        let flow = self
            .flow_repo
            .create(request.module.as_str().to_string())
            .await?;

        info!(
            flow_id = %flow.id,
            module = %flow.module,
            "Approval flow created successfully"
        );

        Ok(ApprovalFlowDto::new(flow, Vec::new()))
    }

    /// 承認者ロールをフローに追加
    pub async fn add_approver(
        &self,
        flow_id: Uuid,
        request: AddApproverRoleRequest,
    ) -> AppResult<ApproverRoleDto> {
        self.flow_repo
            .find_by_id(flow_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Approval flow",
                    &flow_id.to_string(),
                    "approval_flow_service::add_approver",
                )
            })?;

        let user = self
            .user_repo
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| validation_error("user_id", "Approver user does not exist"))?;

        if !user.is_active {
            return Err(validation_error("user_id", "Approver user is inactive"));
        }

        // 同一ユーザー・同一順序の二重登録を防ぐ
        if self
            .role_repo
            .find_by_flow_and_user(flow_id, request.user_id)
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "User is already an approver in this flow",
                "approval_flow_service::add_approver",
            ));
        }

        if self
            .role_repo
            .find_by_flow_and_order(flow_id, request.approval_order)
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "Approval order is already taken in this flow",
                "approval_flow_service::add_approver",
            ));
        }

        let role = self
            .role_repo
            .create(CreateApproverRole {
                flow_id,
                user_id: request.user_id,
                role_name: request.role_name,
                approval_order: request.approval_order,
            })
            .await?;

        info!(
            flow_id = %flow_id,
            role_id = %role.id,
            user_id = %role.user_id,
            approval_order = role.approval_order,
            "Approver role added successfully"
        );

        let mut dto = ApproverRoleDto::from(role);
        dto.approver_name = Some(user.full_name());
        Ok(dto)
    }

    /// 承認者ロールをフローから削除
    pub async fn remove_approver(&self, flow_id: Uuid, role_id: Uuid) -> AppResult<()> {
        let role = self
            .role_repo
            .find_by_id(role_id)
            .await?
            .filter(|role| role.flow_id == flow_id)
            .ok_or_else(|| {
                not_found_error(
                    "Approver role",
                    &role_id.to_string(),
                    "approval_flow_service::remove_approver",
                )
            })?;

        self.role_repo.delete(role.id).await?;

        info!(
            flow_id = %flow_id,
            role_id = %role_id,
            "Approver role removed successfully"
        );

        Ok(())
    }

    /// ロールに承認者名を補完する
    async fn enrich_roles(
        &self,
        roles: Vec<approver_role_model::Model>,
    ) -> AppResult<Vec<ApproverRoleDto>> {
        let user_ids: Vec<Uuid> = roles.iter().map(|r| r.user_id).collect();
        let users = self.user_repo.find_by_ids(&user_ids).await?;
        let names: HashMap<Uuid, String> =
            users.into_iter().map(|u| (u.id, u.full_name())).collect();

        Ok(roles
            .into_iter()
            .map(|role| {
                let name = names.get(&role.user_id).cloned();
                let mut dto = ApproverRoleDto::from(role);
                dto.approver_name = name;
                dto
            })
            .collect())
    }
}
