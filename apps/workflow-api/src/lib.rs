//! # Workflow API
//!
//! ワークフロー定義と、ユーザー・ロール操作イベントへの紐付けを管理する REST API。
//!
//! 永続化と承認テンプレートの解釈は [`WorkflowManagementRepository`] に委譲し、
//! この crate は HTTP 入出力、ページング既定値、存在確認、エラー分類を担当する。

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod usecase;

use std::sync::Arc;

use axum::{Router, routing::get};
use handler::{
   AssociationState,
   WorkflowState,
   add_association,
   add_workflow,
   get_association,
   get_workflow,
   health_check,
   list_associations,
   list_workflows,
   remove_association,
   remove_workflow,
   update_association,
   update_workflow,
};
use idflow_infra::repository::WorkflowManagementRepository;
use usecase::{AssociationUseCaseImpl, WorkflowUseCaseImpl};

/// ルーターを構築する
///
/// ワークフローと紐付けのユースケースは同じバックエンドを共有する。
pub fn router(repository: Arc<dyn WorkflowManagementRepository>) -> Router {
   let workflow_state = Arc::new(WorkflowState {
      usecase: WorkflowUseCaseImpl::new(repository.clone()),
   });
   let association_state = Arc::new(AssociationState {
      usecase: AssociationUseCaseImpl::new(repository),
   });

   Router::new()
      .route("/health", get(health_check))
      // ワークフロー API
      .route(
         "/api/server/v1/workflows",
         get(list_workflows).post(add_workflow),
      )
      .route(
         "/api/server/v1/workflows/{workflow_id}",
         get(get_workflow)
            .put(update_workflow)
            .delete(remove_workflow),
      )
      .with_state(workflow_state)
      // ワークフロー紐付け API
      .route(
         "/api/server/v1/workflow-associations",
         get(list_associations).post(add_association),
      )
      .route(
         "/api/server/v1/workflow-associations/{association_id}",
         get(get_association)
            .patch(update_association)
            .delete(remove_association),
      )
      .with_state(association_state)
}
