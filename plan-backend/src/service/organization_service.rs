// plan-backend/src/service/organization_service.rs

use crate::api::dto::organization_dto::{
    CreateOrganizationLevelRequest, OrganizationLevelDto, OrganizationTreeNodeDto,
    UpdateOrganizationLevelRequest,
};
use crate::db::DbPool;
use crate::domain::level_type::LevelType;
use crate::domain::organization_level_model;
use crate::domain::position::Position;
use crate::domain::workflow_module::WorkflowModule;
use crate::error::{AppError, AppResult};
use crate::repository::approval_flow_repository::ApprovalFlowRepository;
use crate::repository::approver_role_repository::ApproverRoleRepository;
use crate::repository::organization_level_repository::{
    CreateOrganizationLevel, OrganizationLevelRepository, UpdateOrganizationLevel,
};
use crate::repository::user_repository::UserRepository;
use crate::utils::error_helper::{conflict_error, not_found_error, validation_error};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 組織階層サービス
///
/// 組織レベルのCRUDと、承認ワークフローが使う承認者解決を担う。
pub struct OrganizationService {
    level_repo: Arc<OrganizationLevelRepository>,
    user_repo: Arc<UserRepository>,
    flow_repo: Arc<ApprovalFlowRepository>,
    role_repo: Arc<ApproverRoleRepository>,
}

impl OrganizationService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            level_repo: Arc::new(OrganizationLevelRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool.clone())),
            flow_repo: Arc::new(ApprovalFlowRepository::new(db_pool.clone())),
            role_repo: Arc::new(ApproverRoleRepository::new(db_pool)),
        }
    }

    // --- 組織レベルCRUD ---

    /// 組織レベル一覧を取得
    pub async fn list_levels(&self) -> AppResult<Vec<OrganizationLevelDto>> {
        let levels = self.level_repo.find_all().await?;
        Ok(levels.into_iter().map(Into::into).collect())
    }

    /// 組織レベルを取得
    pub async fn get_level(&self, level_id: Uuid) -> AppResult<OrganizationLevelDto> {
        let level = self
            .level_repo
            .find_by_id(level_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Organization level",
                    &level_id.to_string(),
                    "organization_service::get_level",
                )
            })?;

        Ok(level.into())
    }

    /// 組織レベルを作成
    pub async fn create_level(
        &self,
        request: CreateOrganizationLevelRequest,
    ) -> AppResult<OrganizationLevelDto> {
        // (名称, 種別) の重複チェック
        if self
            .level_repo
            .find_by_name_and_type(&request.name, request.level_type.as_str())
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "An organization level with the same name and type already exists",
                "organization_service::create_level",
            ));
        }

        // 階層の形を検証
        self.validate_parent(request.level_type, request.parent_id)
            .await?;

        // ディレクターの職位を検証
        self.validate_director(request.level_type, request.director_id)
            .await?;

        let level = self
            .level_repo
            .create(CreateOrganizationLevel {
                name: request.name,
                level_type: request.level_type.as_str().to_string(),
                parent_id: request.parent_id,
                director_id: request.director_id,
            })
            .await?;

        info!(
            level_id = %level.id,
            name = %level.name,
            level_type = %level.level_type,
            "Organization level created successfully"
        );

        Ok(level.into())
    }

    /// 組織レベルを更新（名称とディレクターのみ）
    pub async fn update_level(
        &self,
        level_id: Uuid,
        request: UpdateOrganizationLevelRequest,
    ) -> AppResult<OrganizationLevelDto> {
        let level = self
            .level_repo
            .find_by_id(level_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Organization level",
                    &level_id.to_string(),
                    "organization_service::update_level",
                )
            })?;

        // 名称変更時は (名称, 種別) の重複チェック
        if let Some(name) = &request.name {
            if let Some(existing) = self
                .level_repo
                .find_by_name_and_type(name, &level.level_type)
                .await?
            {
                if existing.id != level_id {
                    return Err(conflict_error(
                        "An organization level with the same name and type already exists",
                        "organization_service::update_level",
                    ));
                }
            }
        }

        // ディレクター変更時は職位を検証
        if let Some(director_id) = request.director_id {
            self.validate_director(level.level_type(), director_id)
                .await?;
        }

        let updated = self
            .level_repo
            .update(
                level_id,
                UpdateOrganizationLevel {
                    name: request.name,
                    level_type: None,
                    parent_id: None,
                    director_id: request.director_id,
                },
            )
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Organization level",
                    &level_id.to_string(),
                    "organization_service::update_level",
                )
            })?;

        info!(level_id = %level_id, "Organization level updated successfully");

        Ok(updated.into())
    }

    /// 組織ツリーを取得（ルートから子レベルを再帰的に含む）
    pub async fn get_tree(&self) -> AppResult<Vec<OrganizationTreeNodeDto>> {
        let levels = self.level_repo.find_all().await?;

        // ディレクター名を一括で引く
        let director_ids: Vec<Uuid> = levels.iter().map(|l| l.director_id).collect();
        let directors = self.user_repo.find_by_ids(&director_ids).await?;
        let director_names: HashMap<Uuid, String> = directors
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect();

        // 親ID別に子レベルをまとめる
        let mut children_by_parent: HashMap<Option<Uuid>, Vec<&organization_level_model::Model>> =
            HashMap::new();
        for level in &levels {
            children_by_parent
                .entry(level.parent_id)
                .or_default()
                .push(level);
        }

        let roots = children_by_parent.get(&None).cloned().unwrap_or_default();
        Ok(roots
            .into_iter()
            .map(|root| Self::build_tree_node(root, &children_by_parent, &director_names))
            .collect())
    }

    fn build_tree_node(
        level: &organization_level_model::Model,
        children_by_parent: &HashMap<Option<Uuid>, Vec<&organization_level_model::Model>>,
        director_names: &HashMap<Uuid, String>,
    ) -> OrganizationTreeNodeDto {
        let children = children_by_parent
            .get(&Some(level.id))
            .map(|children| {
                children
                    .iter()
                    .map(|child| Self::build_tree_node(child, children_by_parent, director_names))
                    .collect()
            })
            .unwrap_or_default();

        OrganizationTreeNodeDto {
            id: level.id,
            name: level.name.clone(),
            level_type: level.level_type.clone(),
            director_id: level.director_id,
            director_name: director_names.get(&level.director_id).cloned(),
            children,
        }
    }

    // --- 承認者解決 ---

    /// 指定レベル発の活動に対する承認者列を順序どおりに解決する
    ///
    /// 年間計画モジュールに承認フローが設定されていればそのロール順、
    /// なければ階層をルートまで辿って各レベルのディレクターを集める。
    /// 重複は初出を残して除去する。
    pub async fn resolve_approvers(&self, level_id: Uuid) -> AppResult<Vec<Uuid>> {
        // 設定済みフローが最優先
        if let Some(flow) = self
            .flow_repo
            .find_by_module(WorkflowModule::AnnualPlan.as_str())
            .await?
        {
            let roles = self.role_repo.find_by_flow(flow.id).await?;
            if !roles.is_empty() {
                return Ok(roles.into_iter().map(|r| r.user_id).collect());
            }
        }

        // フォールバック: 階層のディレクターを下から上へ収集
        let mut approvers: Vec<Uuid> = Vec::new();
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut current = self
            .level_repo
            .find_by_id(level_id)
            .await?
            .ok_or_else(|| {
                AppError::ConfigurationError(format!(
                    "Organization level {} does not exist",
                    level_id
                ))
            })?;

        loop {
            if !visited.insert(current.id) {
                return Err(AppError::ConfigurationError(
                    "Organization hierarchy contains a cycle".to_string(),
                ));
            }

            if !approvers.contains(&current.director_id) {
                approvers.push(current.director_id);
            }

            match current.parent_id {
                Some(parent_id) => {
                    current = self
                        .level_repo
                        .find_by_id(parent_id)
                        .await?
                        .ok_or_else(|| {
                            AppError::ConfigurationError(format!(
                                "Parent organization level {} does not exist",
                                parent_id
                            ))
                        })?;
                }
                None => break,
            }
        }

        Ok(approvers)
    }

    // --- 内部検証 ---

    /// 階層の形を検証
    ///
    /// Central はルート専用。Regional と BaseUnit は Central 直下に置く。
    async fn validate_parent(
        &self,
        level_type: LevelType,
        parent_id: Option<Uuid>,
    ) -> AppResult<()> {
        match (level_type.allowed_parent_type(), parent_id) {
            (None, Some(_)) => Err(validation_error(
                "parent_id",
                "Central levels cannot have a parent",
            )),
            (None, None) => Ok(()),
            (Some(_), None) => Err(validation_error(
                "parent_id",
                &format!("{} levels require a parent", level_type.display_name()),
            )),
            (Some(required), Some(parent_id)) => {
                let parent = self
                    .level_repo
                    .find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| {
                        validation_error("parent_id", "Parent organization level does not exist")
                    })?;

                if parent.level_type() != required {
                    return Err(validation_error(
                        "parent_id",
                        &format!(
                            "{} levels must report to a {} level",
                            level_type.display_name(),
                            required.display_name()
                        ),
                    ));
                }

                Ok(())
            }
        }
    }

    /// ディレクターの職位がレベル種別と一致することを検証
    async fn validate_director(&self, level_type: LevelType, director_id: Uuid) -> AppResult<()> {
        let director = self
            .user_repo
            .find_by_id(director_id)
            .await?
            .ok_or_else(|| validation_error("director_id", "Director user does not exist"))?;

        if !director.is_active {
            return Err(validation_error("director_id", "Director user is inactive"));
        }

        let required = Position::director_for(level_type);
        if director.position() != required {
            return Err(validation_error(
                "director_id",
                &format!(
                    "Director must hold the {} position",
                    required.display_name()
                ),
            ));
        }

        Ok(())
    }
}
