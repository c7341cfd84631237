//! # ワークフローハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/server/v1/workflows` - 追加
//! - `GET /api/server/v1/workflows` - 一覧（`limit`, `offset`, `filter`）
//! - `GET /api/server/v1/workflows/{workflow_id}` - 詳細
//! - `PUT /api/server/v1/workflows/{workflow_id}` - 更新
//! - `DELETE /api/server/v1/workflows/{workflow_id}` - 削除
//!
//! 成功時はすべて `200 OK` を返す。

use std::sync::Arc;

use axum::{
   Json,
   extract::{Path, State},
   http::StatusCode,
   response::IntoResponse,
};
use idflow_domain::workflow::{
   StepOption,
   TemplateStep,
   Workflow,
   WorkflowDetail,
   WorkflowId,
   WorkflowTemplate,
};
use idflow_shared::PaginatedResponse;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
   error::{ApiError, ErrorMessage},
   extract::{ApiQuery, Tenant, ValidatedJson},
   usecase::{WorkflowInput, WorkflowUseCaseImpl},
};

/// ワークフロー API の共有状態
pub struct WorkflowState {
   pub usecase: WorkflowUseCaseImpl,
}

// --- リクエスト / レスポンス型 ---

/// ワークフロー追加・更新リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct WorkflowRequest {
   #[validate(length(min = 1, message = "ワークフロー名は必須です"))]
   pub name:        String,
   pub description: Option<String>,
   /// ワークフローエンジン ID
   pub engine:      String,
   #[validate(nested)]
   pub template:    WorkflowTemplateDto,
}

/// 承認テンプレート
///
/// 保存形式に変換しても失われない形だけを受け付ける:
/// ステップ番号は重複なく昇順、各ステップに 1 つ以上の選択肢、
/// 値は空でなく `,` を含まない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_step_order"))]
pub struct WorkflowTemplateDto {
   /// テンプレート ID
   pub name:  String,
   #[serde(default)]
   #[validate(nested)]
   pub steps: Vec<TemplateStepDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TemplateStepDto {
   #[validate(range(min = 1, message = "ステップ番号は 1 以上である必要があります"))]
   pub step:    u32,
   #[serde(default)]
   #[validate(length(min = 1, message = "各ステップには 1 つ以上の選択肢が必要です"))]
   #[validate(nested)]
   pub options: Vec<StepOptionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StepOptionDto {
   pub entity: String,
   #[serde(default)]
   #[validate(custom(function = "validate_option_values"))]
   pub values: Vec<String>,
}

fn validate_step_order(template: &WorkflowTemplateDto) -> Result<(), ValidationError> {
   let ascending = template
      .steps
      .windows(2)
      .all(|pair| pair[0].step < pair[1].step);
   if ascending {
      return Ok(());
   }
   Err(ValidationError::new("step_order")
      .with_message("ステップ番号は重複なく昇順である必要があります".into()))
}

fn validate_option_values(values: &[String]) -> Result<(), ValidationError> {
   if values.iter().any(|v| v.is_empty()) {
      return Err(ValidationError::new("empty_value").with_message("空の値は指定できません".into()));
   }
   if values.iter().any(|v| v.contains(',')) {
      return Err(
         ValidationError::new("value_separator").with_message("値に `,` は使用できません".into()),
      );
   }
   Ok(())
}

/// ワークフロー詳細レスポンス
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowResponse {
   pub id:          String,
   pub name:        String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub description: Option<String>,
   pub engine:      String,
   pub template:    WorkflowTemplateDto,
}

/// 一覧の 1 件
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowListItem {
   pub id:          String,
   pub name:        String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub description: Option<String>,
   /// テンプレート ID
   pub template:    String,
   pub engine:      String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowList {
   pub workflows: Vec<WorkflowListItem>,
}

pub type WorkflowListResponse = PaginatedResponse<WorkflowList>;

/// 一覧取得クエリ
#[derive(Debug, Deserialize)]
pub struct ListQuery {
   pub limit:  Option<u32>,
   pub offset: Option<u32>,
   pub filter: Option<String>,
}

impl From<WorkflowTemplateDto> for WorkflowTemplate {
   fn from(dto: WorkflowTemplateDto) -> Self {
      Self {
         name:  dto.name,
         steps: dto
            .steps
            .into_iter()
            .map(|step| TemplateStep {
               step:    step.step,
               options: step
                  .options
                  .into_iter()
                  .map(|option| StepOption {
                     entity: option.entity,
                     values: option.values,
                  })
                  .collect(),
            })
            .collect(),
      }
   }
}

impl From<WorkflowTemplate> for WorkflowTemplateDto {
   fn from(template: WorkflowTemplate) -> Self {
      Self {
         name:  template.name,
         steps: template
            .steps
            .into_iter()
            .map(|step| TemplateStepDto {
               step:    step.step,
               options: step
                  .options
                  .into_iter()
                  .map(|option| StepOptionDto {
                     entity: option.entity,
                     values: option.values,
                  })
                  .collect(),
            })
            .collect(),
      }
   }
}

impl From<WorkflowRequest> for WorkflowInput {
   fn from(req: WorkflowRequest) -> Self {
      Self {
         name:        req.name,
         description: req.description,
         engine_id:   req.engine,
         template:    req.template.into(),
      }
   }
}

impl From<WorkflowDetail> for WorkflowResponse {
   fn from(detail: WorkflowDetail) -> Self {
      let workflow = detail.workflow;
      Self {
         id:          workflow.id().to_string(),
         name:        workflow.name().to_string(),
         description: workflow.description().map(str::to_string),
         engine:      workflow.engine_id().to_string(),
         template:    detail.template.into(),
      }
   }
}

impl From<Workflow> for WorkflowListItem {
   fn from(workflow: Workflow) -> Self {
      Self {
         id:          workflow.id().to_string(),
         name:        workflow.name().to_string(),
         description: workflow.description().map(str::to_string),
         template:    workflow.template_id().to_string(),
         engine:      workflow.engine_id().to_string(),
      }
   }
}

/// パスのワークフロー ID を解釈する
///
/// UUID でない ID のワークフローは存在し得ないため `404` とする。
fn parse_workflow_id(raw: &str) -> Result<WorkflowId, ApiError> {
   raw.parse()
      .map_err(|_| ApiError::not_found(ErrorMessage::WorkflowNotFound, raw))
}

// --- ハンドラ ---

/// POST /api/server/v1/workflows
///
/// ## レスポンス
///
/// - `200 OK`: 追加されたワークフロー
/// - `400 Bad Request`: 入力不正、テナントヘッダーなし
/// - `500 Internal Server Error`: バックエンドの失敗
#[tracing::instrument(skip_all, fields(tenant_id = %tenant_id))]
pub async fn add_workflow(
   State(state): State<Arc<WorkflowState>>,
   Tenant(tenant_id): Tenant,
   ValidatedJson(req): ValidatedJson<WorkflowRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let detail = state.usecase.add_workflow(req.into(), &tenant_id).await?;

   Ok((StatusCode::OK, Json(WorkflowResponse::from(detail))))
}

/// GET /api/server/v1/workflows
///
/// `limit` / `offset` のどちらかが未指定なら両方とも既定値（10 / 0）を使う。
///
/// ## レスポンス
///
/// - `200 OK`: ワークフロー一覧
/// - `400 Bad Request`: 不正なフィルタ
#[tracing::instrument(skip_all, fields(tenant_id = %tenant_id))]
pub async fn list_workflows(
   State(state): State<Arc<WorkflowState>>,
   Tenant(tenant_id): Tenant,
   ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
   let page = state
      .usecase
      .list_workflows(
         query.limit,
         query.offset,
         query.filter.as_deref(),
         &tenant_id,
      )
      .await?;

   let page = page.map(WorkflowListItem::from);
   let response = WorkflowListResponse {
      total_results: page.total_results,
      start_index:   page.start_index,
      count:         page.count(),
      items:         WorkflowList {
         workflows: page.items,
      },
   };

   Ok((StatusCode::OK, Json(response)))
}

/// GET /api/server/v1/workflows/{workflow_id}
///
/// ## レスポンス
///
/// - `200 OK`: ワークフロー詳細
/// - `404 Not Found`: ワークフローが見つからない
#[tracing::instrument(skip_all, fields(%workflow_id))]
pub async fn get_workflow(
   State(state): State<Arc<WorkflowState>>,
   Path(workflow_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_workflow_id(&workflow_id)?;

   let detail = state.usecase.get_workflow(&id).await?;

   Ok((StatusCode::OK, Json(WorkflowResponse::from(detail))))
}

/// PUT /api/server/v1/workflows/{workflow_id}
///
/// ## レスポンス
///
/// - `200 OK`: 更新後のワークフロー
/// - `400 Bad Request`: 入力不正
/// - `404 Not Found`: ワークフローが見つからない
#[tracing::instrument(skip_all, fields(%workflow_id))]
pub async fn update_workflow(
   State(state): State<Arc<WorkflowState>>,
   Path(workflow_id): Path<String>,
   Tenant(tenant_id): Tenant,
   ValidatedJson(req): ValidatedJson<WorkflowRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_workflow_id(&workflow_id)?;

   let detail = state
      .usecase
      .update_workflow(&id, req.into(), &tenant_id)
      .await?;

   Ok((StatusCode::OK, Json(WorkflowResponse::from(detail))))
}

/// DELETE /api/server/v1/workflows/{workflow_id}
///
/// ## レスポンス
///
/// - `200 OK`: 削除成功（ボディなし）
/// - `400 Bad Request`: 存在しない、または紐付けが残っている
/// - `404 Not Found`: ID が UUID でない
#[tracing::instrument(skip_all, fields(%workflow_id))]
pub async fn remove_workflow(
   State(state): State<Arc<WorkflowState>>,
   Path(workflow_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_workflow_id(&workflow_id)?;

   state.usecase.remove_workflow(&id).await?;

   Ok(StatusCode::OK)
}
