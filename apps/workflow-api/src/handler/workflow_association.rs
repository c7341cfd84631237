//! # ワークフロー紐付けハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/server/v1/workflow-associations` - 追加（リクエストをそのまま返す）
//! - `GET /api/server/v1/workflow-associations` - 一覧
//! - `GET /api/server/v1/workflow-associations/{association_id}` - 詳細
//! - `PATCH /api/server/v1/workflow-associations/{association_id}` - 部分更新
//! - `DELETE /api/server/v1/workflow-associations/{association_id}` - 削除

use std::sync::Arc;

use axum::{
   Json,
   extract::{Path, State},
   http::StatusCode,
   response::IntoResponse,
};
use idflow_domain::association::{Association, AssociationId, Operation};
use idflow_shared::PaginatedResponse;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::workflow::ListQuery;
use crate::{
   error::{ApiError, ErrorMessage},
   extract::{ApiQuery, Tenant, ValidatedJson},
   usecase::{AssociationInput, AssociationPatch, AssociationUseCaseImpl},
};

/// 紐付け API の共有状態
pub struct AssociationState {
   pub usecase: AssociationUseCaseImpl,
}

// --- リクエスト / レスポンス型 ---

/// 紐付け追加リクエスト（成功時のレスポンスも同じ形）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAssociationRequest {
   #[validate(length(min = 1, message = "紐付け名は必須です"))]
   pub association_name:      String,
   #[validate(length(min = 1, message = "ワークフロー ID は必須です"))]
   pub workflow_id:           String,
   pub operation:             Operation,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub association_condition: Option<String>,
   #[serde(default = "enabled_by_default")]
   pub is_enabled:            bool,
}

fn enabled_by_default() -> bool {
   true
}

/// 紐付け部分更新リクエスト
///
/// 省略または `null` のフィールドは変更しない。
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAssociationPatchRequest {
   #[validate(length(min = 1, message = "紐付け名は空にできません"))]
   pub association_name:      Option<String>,
   pub workflow_id:           Option<String>,
   pub operation:             Option<Operation>,
   pub association_condition: Option<String>,
   pub is_enabled:            Option<bool>,
}

/// 紐付け詳細レスポンス
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAssociationResponse {
   pub id:                    String,
   pub association_name:      String,
   pub operation:             Operation,
   pub workflow_name:         String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub association_condition: Option<String>,
   pub is_enabled:            bool,
}

/// 一覧の 1 件（条件式は含まない）
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAssociationListItem {
   pub id:               String,
   pub association_name: String,
   pub operation:        Operation,
   pub workflow_name:    String,
   pub is_enabled:       bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAssociationList {
   pub workflow_associations: Vec<WorkflowAssociationListItem>,
}

pub type WorkflowAssociationListResponse = PaginatedResponse<WorkflowAssociationList>;

impl From<WorkflowAssociationRequest> for AssociationInput {
   fn from(req: WorkflowAssociationRequest) -> Self {
      Self {
         name:        req.association_name,
         operation:   req.operation,
         workflow_id: req.workflow_id,
         condition:   req.association_condition,
         enabled:     req.is_enabled,
      }
   }
}

impl From<AssociationInput> for WorkflowAssociationRequest {
   fn from(input: AssociationInput) -> Self {
      Self {
         association_name:      input.name,
         workflow_id:           input.workflow_id,
         operation:             input.operation,
         association_condition: input.condition,
         is_enabled:            input.enabled,
      }
   }
}

impl From<WorkflowAssociationPatchRequest> for AssociationPatch {
   fn from(req: WorkflowAssociationPatchRequest) -> Self {
      Self {
         name:        req.association_name,
         operation:   req.operation,
         workflow_id: req.workflow_id,
         condition:   req.association_condition,
         enabled:     req.is_enabled,
      }
   }
}

impl From<Association> for WorkflowAssociationResponse {
   fn from(association: Association) -> Self {
      Self {
         id:                    association.id.to_string(),
         association_name:      association.name,
         operation:             association.operation,
         workflow_name:         association.workflow_name,
         association_condition: association.condition,
         is_enabled:            association.enabled,
      }
   }
}

impl From<Association> for WorkflowAssociationListItem {
   fn from(association: Association) -> Self {
      Self {
         id:               association.id.to_string(),
         association_name: association.name,
         operation:        association.operation,
         workflow_name:    association.workflow_name,
         is_enabled:       association.enabled,
      }
   }
}

/// 整数でない ID の紐付けは存在し得ないため `404` とする
fn parse_association_id(raw: &str) -> Result<AssociationId, ApiError> {
   raw.parse()
      .map_err(|_| ApiError::not_found(ErrorMessage::AssociationNotFound, raw))
}

// --- ハンドラ ---

/// POST /api/server/v1/workflow-associations
///
/// 新しい紐付け ID は返さず、受け取ったリクエストをそのまま返す。
///
/// ## レスポンス
///
/// - `200 OK`: リクエストと同じ内容
/// - `400 Bad Request`: 入力不正、参照先のワークフロー・イベントが存在しない
#[tracing::instrument(skip_all, fields(operation = %req.operation))]
pub async fn add_association(
   State(state): State<Arc<AssociationState>>,
   ValidatedJson(req): ValidatedJson<WorkflowAssociationRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let echoed = state.usecase.add_association(req.into()).await?;

   Ok((StatusCode::OK, Json(WorkflowAssociationRequest::from(echoed))))
}

/// GET /api/server/v1/workflow-associations
///
/// ## レスポンス
///
/// - `200 OK`: 紐付け一覧
/// - `400 Bad Request`: 不正なフィルタ
#[tracing::instrument(skip_all, fields(tenant_id = %tenant_id))]
pub async fn list_associations(
   State(state): State<Arc<AssociationState>>,
   Tenant(tenant_id): Tenant,
   ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
   let page = state
      .usecase
      .list_associations(
         query.limit,
         query.offset,
         query.filter.as_deref(),
         &tenant_id,
      )
      .await?
      .map(WorkflowAssociationListItem::from);

   let response = WorkflowAssociationListResponse {
      total_results: page.total_results,
      start_index:   page.start_index,
      count:         page.count(),
      items:         WorkflowAssociationList {
         workflow_associations: page.items,
      },
   };

   Ok((StatusCode::OK, Json(response)))
}

/// GET /api/server/v1/workflow-associations/{association_id}
///
/// ## レスポンス
///
/// - `200 OK`: 紐付け詳細
/// - `404 Not Found`: 紐付けが見つからない
#[tracing::instrument(skip_all, fields(%association_id))]
pub async fn get_association(
   State(state): State<Arc<AssociationState>>,
   Path(association_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_association_id(&association_id)?;

   let association = state.usecase.get_association(id).await?;

   Ok((
      StatusCode::OK,
      Json(WorkflowAssociationResponse::from(association)),
   ))
}

/// PATCH /api/server/v1/workflow-associations/{association_id}
///
/// ## レスポンス
///
/// - `200 OK`: 更新後の紐付け
/// - `400 Bad Request`: 入力不正、`isEnabled` 指定時に紐付けが存在しない
/// - `404 Not Found`: `isEnabled` 未指定時に紐付けが存在しない
#[tracing::instrument(skip_all, fields(%association_id))]
pub async fn update_association(
   State(state): State<Arc<AssociationState>>,
   Path(association_id): Path<String>,
   ValidatedJson(req): ValidatedJson<WorkflowAssociationPatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_association_id(&association_id)?;

   let association = state.usecase.update_association(id, req.into()).await?;

   Ok((
      StatusCode::OK,
      Json(WorkflowAssociationResponse::from(association)),
   ))
}

/// DELETE /api/server/v1/workflow-associations/{association_id}
///
/// ## レスポンス
///
/// - `200 OK`: 削除成功（ボディなし）
/// - `404 Not Found`: 紐付けが見つからない
#[tracing::instrument(skip_all, fields(%association_id))]
pub async fn remove_association(
   State(state): State<Arc<AssociationState>>,
   Path(association_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
   let id = parse_association_id(&association_id)?;

   state.usecase.remove_association(id).await?;

   Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
   use axum::{
      Router,
      body::Body,
      http::{Method, Request},
      routing::get,
   };
   use idflow_domain::{
      tenant::TenantId,
      workflow::{NewWorkflow, Workflow, WorkflowId},
   };
   use idflow_infra::{
      mock::{MockWorkflowManagementRepository, RecordedCall},
      repository::WorkflowManagementRepository,
   };
   use idflow_shared::ErrorResponse;
   use pretty_assertions::assert_eq;
   use serde_json::json;
   use tower::ServiceExt;

   use super::*;
   use crate::extract::TENANT_HEADER;

   const TENANT: &str = "0192f0a4-7c3e-7a10-9a55-1c2d3e4f5a6b";
   const BASE: &str = "/api/server/v1/workflow-associations";

   fn create_test_app(mock: &MockWorkflowManagementRepository) -> Router {
      let state = Arc::new(AssociationState {
         usecase: AssociationUseCaseImpl::new(Arc::new(mock.clone())),
      });

      Router::new()
         .route(BASE, get(list_associations).post(add_association))
         .route(
            "/api/server/v1/workflow-associations/{association_id}",
            get(get_association)
               .patch(update_association)
               .delete(remove_association),
         )
         .with_state(state)
   }

   async fn response_body<T: serde::de::DeserializeOwned>(
      response: axum::http::Response<Body>,
   ) -> T {
      let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      serde_json::from_slice(&bytes).unwrap()
   }

   fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
      Request::builder()
         .method(method)
         .uri(uri)
         .header("content-type", "application/json")
         .header(TENANT_HEADER, TENANT)
         .body(Body::from(body.to_string()))
         .unwrap()
   }

   fn get_request(uri: &str) -> Request<Body> {
      Request::builder()
         .uri(uri)
         .header(TENANT_HEADER, TENANT)
         .body(Body::empty())
         .unwrap()
   }

   /// ワークフロー "Reg" を保存し、その ID を返す
   async fn seed_workflow(mock: &MockWorkflowManagementRepository) -> WorkflowId {
      let workflow = Workflow::new(NewWorkflow {
         id:          WorkflowId::new(),
         name:        "Reg".to_string(),
         description: None,
         template_id: "tmpl1".to_string(),
         engine_id:   "eng1".to_string(),
      })
      .unwrap();
      let tenant_id: TenantId = TENANT.parse().unwrap();
      mock.store()
         .add_workflow(&workflow, &[], &tenant_id)
         .await
         .unwrap();
      *workflow.id()
   }

   fn association_body(workflow_id: &WorkflowId) -> serde_json::Value {
      json!({
         "associationName": "A1",
         "workflowId": workflow_id.to_string(),
         "operation": "ADD_USER",
         "associationCondition": "//*[local-name()='tenantDomain']"
      })
   }

   async fn seed_association(sut: &Router, workflow_id: &WorkflowId) {
      let response = sut
         .clone()
         .oneshot(json_request(Method::POST, BASE, association_body(workflow_id)))
         .await
         .unwrap();
      assert_eq!(response.status(), StatusCode::OK);
   }

   #[tokio::test]
   async fn test_post_追加すると200でリクエストがそのまま返る() {
      // Given
      let mock = MockWorkflowManagementRepository::new();
      let workflow_id = seed_workflow(&mock).await;
      let sut = create_test_app(&mock);

      // When
      let response = sut
         .oneshot(json_request(Method::POST, BASE, association_body(&workflow_id)))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::OK);
      let body: serde_json::Value = response_body(response).await;
      let mut expected = association_body(&workflow_id);
      expected["isEnabled"] = json!(true);
      assert_eq!(body, expected);
   }

   #[tokio::test]
   async fn test_post_無効で追加すると無効のまま保存される() {
      let mock = MockWorkflowManagementRepository::new();
      let workflow_id = seed_workflow(&mock).await;
      let sut = create_test_app(&mock);
      let mut body = association_body(&workflow_id);
      body["isEnabled"] = json!(false);

      let response = sut
         .clone()
         .oneshot(json_request(Method::POST, BASE, body.clone()))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      let echoed: serde_json::Value = response_body(response).await;
      assert_eq!(echoed, body);
      let response = sut.oneshot(get_request(&format!("{BASE}/1"))).await.unwrap();
      let stored: WorkflowAssociationResponse = response_body(response).await;
      assert!(!stored.is_enabled);
   }

   #[tokio::test]
   async fn test_post_存在しないワークフローへの紐付けは400() {
      let mock = MockWorkflowManagementRepository::new();
      let sut = create_test_app(&mock);

      let response = sut
         .oneshot(json_request(
            Method::POST,
            BASE,
            association_body(&WorkflowId::new()),
         ))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      let body: ErrorResponse = response_body(response).await;
      assert_eq!(body.code, "WFM-60005");
   }

   #[tokio::test]
   async fn test_post_未知の操作は400() {
      let mock = MockWorkflowManagementRepository::new();
      let workflow_id = seed_workflow(&mock).await;
      let sut = create_test_app(&mock);
      let mut body = association_body(&workflow_id);
      body["operation"] = json!("LAUNCH_ROCKET");

      let response = sut
         .oneshot(json_request(Method::POST, BASE, body))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      let body: ErrorResponse = response_body(response).await;
      assert_eq!(body.code, "WFM-60009");
   }

   #[tokio::test]
   async fn test_get_紐付けの詳細が返る() {
      let mock = MockWorkflowManagementRepository::new();
      let workflow_id = seed_workflow(&mock).await;
      let sut = create_test_app(&mock);
      seed_association(&sut, &workflow_id).await;

      let response = sut.oneshot(get_request(&format!("{BASE}/1"))).await.unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      let body: WorkflowAssociationResponse = response_body(response).await;
      assert_eq!(
         body,
         WorkflowAssociationResponse {
            id:                    "1".to_string(),
            association_name:      "A1".to_string(),
            operation:             Operation::AddUser,
            workflow_name:         "Reg".to_string(),
            association_condition: Some("//*[local-name()='tenantDomain']".to_string()),
            is_enabled:            true,
         }
      );
   }

   #[tokio::test]
   async fn test_get_整数でないidは404() {
      let sut = create_test_app(&MockWorkflowManagementRepository::new());

      let response = sut.oneshot(get_request(&format!("{BASE}/abc"))).await.unwrap();

      assert_eq!(response.status(), StatusCode::NOT_FOUND);
      let body: ErrorResponse = response_body(response).await;
      assert_eq!(body.code, "WFM-60008");
   }

   #[tokio::test]
   async fn test_list_一覧はworkflow_associationsキーで返る() {
      let mock = MockWorkflowManagementRepository::new();
      let workflow_id = seed_workflow(&mock).await;
      let sut = create_test_app(&mock);
      seed_association(&sut, &workflow_id).await;
      seed_association(&sut, &workflow_id).await;

      let response = sut.oneshot(get_request(BASE)).await.unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      let body: serde_json::Value = response_body(response).await;
      assert_eq!(body["totalResults"], 2);
      assert_eq!(body["startIndex"], 1);
      assert_eq!(body["count"], 2);
      assert_eq!(body["workflowAssociations"][0]["workflowName"], "Reg");
      assert!(body["workflowAssociations"][0].get("associationCondition").is_none());
   }

   #[tokio::test]
   async fn test_patch_nullのフィールドは保存値を維持する() {
      // Given
      let mock = MockWorkflowManagementRepository::new();
      let workflow_id = seed_workflow(&mock).await;
      let sut = create_test_app(&mock);
      seed_association(&sut, &workflow_id).await;
      let response = sut
         .clone()
         .oneshot(json_request(
            Method::PATCH,
            &format!("{BASE}/1"),
            json!({ "isEnabled": false }),
         ))
         .await
         .unwrap();
      assert_eq!(response.status(), StatusCode::OK);

      // When
      let response = sut
         .clone()
         .oneshot(json_request(
            Method::PATCH,
            &format!("{BASE}/1"),
            json!({ "isEnabled": null, "operation": null }),
         ))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::OK);
      let body: WorkflowAssociationResponse = response_body(response).await;
      assert!(!body.is_enabled);
      assert_eq!(body.operation, Operation::AddUser);
      assert!(mock.calls().contains(&RecordedCall::GetAssociation(
         AssociationId::new(1)
      )));
   }

   #[tokio::test]
   async fn test_patch_無効化できる() {
      let mock = MockWorkflowManagementRepository::new();
      let workflow_id = seed_workflow(&mock).await;
      let sut = create_test_app(&mock);
      seed_association(&sut, &workflow_id).await;

      let response = sut
         .oneshot(json_request(
            Method::PATCH,
            &format!("{BASE}/1"),
            json!({ "isEnabled": false, "associationName": "A1-off" }),
         ))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      let body: WorkflowAssociationResponse = response_body(response).await;
      assert!(!body.is_enabled);
      assert_eq!(body.association_name, "A1-off");
   }

   #[tokio::test]
   async fn test_patch_存在しない紐付けはisenabledの有無で応答が異なる() {
      let sut = create_test_app(&MockWorkflowManagementRepository::new());

      let without_enabled = sut
         .clone()
         .oneshot(json_request(
            Method::PATCH,
            &format!("{BASE}/9"),
            json!({ "associationName": "x" }),
         ))
         .await
         .unwrap();
      let with_enabled = sut
         .oneshot(json_request(
            Method::PATCH,
            &format!("{BASE}/9"),
            json!({ "isEnabled": true }),
         ))
         .await
         .unwrap();

      assert_eq!(without_enabled.status(), StatusCode::NOT_FOUND);
      assert_eq!(with_enabled.status(), StatusCode::BAD_REQUEST);
   }

   #[tokio::test]
   async fn test_delete_削除すると取得できなくなる() {
      let mock = MockWorkflowManagementRepository::new();
      let workflow_id = seed_workflow(&mock).await;
      let sut = create_test_app(&mock);
      seed_association(&sut, &workflow_id).await;

      let deleted = sut
         .clone()
         .oneshot(
            Request::builder()
               .method(Method::DELETE)
               .uri(format!("{BASE}/1"))
               .body(Body::empty())
               .unwrap(),
         )
         .await
         .unwrap();
      let fetched = sut.oneshot(get_request(&format!("{BASE}/1"))).await.unwrap();

      assert_eq!(deleted.status(), StatusCode::OK);
      assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
   }

   #[tokio::test]
   async fn test_delete_存在しない紐付けは404で削除を呼ばない() {
      let mock = MockWorkflowManagementRepository::new();
      let sut = create_test_app(&mock);

      let response = sut
         .oneshot(
            Request::builder()
               .method(Method::DELETE)
               .uri(format!("{BASE}/5"))
               .body(Body::empty())
               .unwrap(),
         )
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::NOT_FOUND);
      assert!(
         !mock
            .calls()
            .contains(&RecordedCall::RemoveAssociation(AssociationId::new(5)))
      );
   }
}
