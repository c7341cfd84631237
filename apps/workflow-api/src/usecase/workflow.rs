//! # ワークフローユースケース
//!
//! ワークフロー定義の追加・更新・取得・一覧・削除を実装する。
//! 承認テンプレートはパラメータレコードに変換して保存し、取得時に復元する。

use std::sync::Arc;

use idflow_domain::{
   DomainError,
   pagination::{Page, PageRequest},
   tenant::TenantId,
   workflow::{
      NewWorkflow,
      Workflow,
      WorkflowDetail,
      WorkflowId,
      WorkflowTemplate,
      decode_template_steps,
      encode_template_steps,
   },
};
use idflow_infra::repository::WorkflowManagementRepository;

use crate::error::{ApiError, ErrorMessage};

/// ワークフローの追加・更新入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowInput {
   pub name:        String,
   pub description: Option<String>,
   pub engine_id:   String,
   pub template:    WorkflowTemplate,
}

/// ワークフローユースケース
pub struct WorkflowUseCaseImpl {
   repository: Arc<dyn WorkflowManagementRepository>,
}

impl WorkflowUseCaseImpl {
   pub fn new(repository: Arc<dyn WorkflowManagementRepository>) -> Self {
      Self { repository }
   }

   /// ワークフローを追加する
   ///
   /// 新しい ID を生成して保存し、保存後の詳細を読み直して返す。
   pub async fn add_workflow(
      &self,
      input: WorkflowInput,
      tenant_id: &TenantId,
   ) -> Result<WorkflowDetail, ApiError> {
      let id = WorkflowId::new();

      self
         .save(
            id,
            input,
            tenant_id,
            ErrorMessage::ClientErrorAddingWorkflow,
            ErrorMessage::ErrorAddingWorkflow,
         )
         .await?;

      self.get_workflow(&id).await
   }

   /// 既存のワークフローを上書きする
   ///
   /// 対象が存在しない場合は `NotFound`。
   pub async fn update_workflow(
      &self,
      id: &WorkflowId,
      input: WorkflowInput,
      tenant_id: &TenantId,
   ) -> Result<WorkflowDetail, ApiError> {
      let id_str = id.to_string();
      let existing = self.repository.get_workflow(id).await.map_err(|e| {
         ApiError::from_infra(
            ErrorMessage::ClientErrorUpdatingWorkflow,
            ErrorMessage::ErrorUpdatingWorkflow,
            Some(id_str.as_str()),
            e,
         )
      })?;
      if existing.is_none() {
         return Err(ApiError::not_found(ErrorMessage::WorkflowNotFound, id));
      }

      self
         .save(
            *id,
            input,
            tenant_id,
            ErrorMessage::ClientErrorUpdatingWorkflow,
            ErrorMessage::ErrorUpdatingWorkflow,
         )
         .await?;

      self.get_workflow(id).await
   }

   /// ワークフローの詳細を取得する
   ///
   /// ワークフロー本体かパラメータ集合のどちらかが存在しなければ `NotFound`。
   pub async fn get_workflow(&self, id: &WorkflowId) -> Result<WorkflowDetail, ApiError> {
      let id_str = id.to_string();
      let map_infra = |e| {
         ApiError::from_infra(
            ErrorMessage::WorkflowNotFound,
            ErrorMessage::ErrorRetrievingWorkflow,
            Some(id_str.as_str()),
            e,
         )
      };

      let workflow = self.repository.get_workflow(id).await.map_err(map_infra)?;
      let params = self
         .repository
         .get_workflow_parameters(id)
         .await
         .map_err(map_infra)?;
      let (Some(workflow), Some(params)) = (workflow, params) else {
         return Err(ApiError::not_found(ErrorMessage::WorkflowNotFound, id));
      };

      let steps = decode_template_steps(&params).map_err(|e| {
         ApiError::server_fault(
            ErrorMessage::ErrorRetrievingWorkflow,
            Some(id_str.as_str()),
            &e,
         )
      })?;
      let template = WorkflowTemplate {
         name: workflow.template_id().to_string(),
         steps,
      };

      Ok(WorkflowDetail { workflow, template })
   }

   /// テナント内のワークフロー一覧を取得する
   ///
   /// `limit` / `offset` のどちらかが未指定なら両方とも既定値を使う。
   /// 総件数はページとは別に数える。
   pub async fn list_workflows(
      &self,
      limit: Option<u32>,
      offset: Option<u32>,
      filter: Option<&str>,
      tenant_id: &TenantId,
   ) -> Result<Page<Workflow>, ApiError> {
      let page = PageRequest::resolve(limit, offset);
      let map_infra = |e| {
         ApiError::from_infra(
            ErrorMessage::ClientErrorListingWorkflows,
            ErrorMessage::ErrorListingWorkflows,
            None,
            e,
         )
      };

      let items = self
         .repository
         .list_paginated_workflows(tenant_id, page.limit, page.offset, filter)
         .await
         .map_err(map_infra)?;
      let total_results = self
         .repository
         .get_workflows_count(tenant_id, filter)
         .await
         .map_err(map_infra)?;

      Ok(Page {
         items,
         total_results,
         start_index: page.start_index(),
      })
   }

   /// ワークフローを削除する
   ///
   /// 存在確認はバックエンドに任せる（不在はクライアント起因として 400）。
   pub async fn remove_workflow(&self, id: &WorkflowId) -> Result<(), ApiError> {
      let id_str = id.to_string();
      self.repository.remove_workflow(id).await.map_err(|e| {
         ApiError::from_infra(
            ErrorMessage::WorkflowNotFound,
            ErrorMessage::ErrorRemovingWorkflow,
            Some(id_str.as_str()),
            e,
         )
      })
   }

   async fn save(
      &self,
      id: WorkflowId,
      input: WorkflowInput,
      tenant_id: &TenantId,
      client: ErrorMessage,
      server: ErrorMessage,
   ) -> Result<(), ApiError> {
      let params = encode_template_steps(id, &input.template.steps);
      let workflow = Workflow::new(NewWorkflow {
         id,
         name: input.name,
         description: input.description,
         template_id: input.template.name,
         engine_id: input.engine_id,
      })
      .map_err(|e| match e {
         DomainError::Validation(reason) => ApiError::validation(client, reason),
         other => ApiError::validation(client, other.to_string()),
      })?;

      let id_str = id.to_string();
      self
         .repository
         .add_workflow(&workflow, &params, tenant_id)
         .await
         .map_err(|e| ApiError::from_infra(client, server, Some(id_str.as_str()), e))
   }
}

#[cfg(test)]
mod tests {
   use idflow_domain::workflow::{Parameter, ParameterHolder, StepOption, TemplateStep};
   use idflow_infra::{
      mock::{InjectedFailure, MockWorkflowManagementRepository, RecordedCall},
      repository::WorkflowManagementRepository as _,
   };
   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};

   use super::*;
   use crate::error::ErrorKind;

   fn registration_input() -> WorkflowInput {
      WorkflowInput {
         name:        "Reg".to_string(),
         description: Some("d".to_string()),
         engine_id:   "eng1".to_string(),
         template:    WorkflowTemplate {
            name:  "tmpl1".to_string(),
            steps: vec![TemplateStep {
               step:    1,
               options: vec![StepOption {
                  entity: "Rolename".to_string(),
                  values: vec!["Employee".to_string()],
               }],
            }],
         },
      }
   }

   #[fixture]
   fn mock() -> MockWorkflowManagementRepository {
      MockWorkflowManagementRepository::new()
   }

   fn sut(mock: &MockWorkflowManagementRepository) -> WorkflowUseCaseImpl {
      WorkflowUseCaseImpl::new(Arc::new(mock.clone()))
   }

   // ===== add_workflow / get_workflow =====

   #[rstest]
   #[tokio::test]
   async fn test_追加したワークフローを取得すると入力と一致する(
      mock: MockWorkflowManagementRepository,
   ) {
      // Given
      let sut = sut(&mock);
      let tenant_id = TenantId::new();
      let input = registration_input();

      // When
      let added = sut.add_workflow(input.clone(), &tenant_id).await.unwrap();
      let fetched = sut.get_workflow(added.workflow.id()).await.unwrap();

      // Then
      assert_eq!(fetched, added);
      assert_eq!(fetched.workflow.name(), "Reg");
      assert_eq!(fetched.workflow.description(), Some("d"));
      assert_eq!(fetched.workflow.engine_id(), "eng1");
      assert_eq!(fetched.template, input.template);
   }

   #[rstest]
   #[tokio::test]
   async fn test_追加すると新しいidが採番され承認ステップが復元される(
      mock: MockWorkflowManagementRepository,
   ) {
      let sut = sut(&mock);

      let added = sut
         .add_workflow(registration_input(), &TenantId::new())
         .await
         .unwrap();

      assert!(!added.workflow.id().as_uuid().is_nil());
      assert_eq!(
         added.template.steps[0].options[0].values,
         vec!["Employee".to_string()]
      );
   }

   #[rstest]
   #[case::テンプレートなし("", "eng1")]
   #[case::エンジンなし("tmpl1", "")]
   #[tokio::test]
   async fn test_テンプレートかエンジンが空ならバリデーションエラー(
      mock: MockWorkflowManagementRepository,
      #[case] template: &str,
      #[case] engine: &str,
   ) {
      let sut = sut(&mock);
      let mut input = registration_input();
      input.template.name = template.to_string();
      input.engine_id = engine.to_string();

      let error = sut.add_workflow(input, &TenantId::new()).await.unwrap_err();

      assert_eq!(error.kind(), ErrorKind::Validation);
      assert_eq!(error.response().code, "WFM-60001");
      assert!(mock.calls().is_empty());
   }

   #[rstest]
   #[tokio::test]
   async fn test_保存時のサーバーエラーは500に振り分けられる(
      mock: MockWorkflowManagementRepository,
   ) {
      mock.fail_on("add_workflow", InjectedFailure::ServerFault("db down".to_string()));
      let sut = sut(&mock);

      let error = sut
         .add_workflow(registration_input(), &TenantId::new())
         .await
         .unwrap_err();

      assert_eq!(error.kind(), ErrorKind::ServerFault);
      assert_eq!(error.response().code, "WFM-65001");
   }

   #[rstest]
   #[tokio::test]
   async fn test_存在しないワークフローの取得はnotfound(mock: MockWorkflowManagementRepository) {
      let sut = sut(&mock);
      let id = WorkflowId::new();

      let error = sut.get_workflow(&id).await.unwrap_err();

      assert_eq!(error.kind(), ErrorKind::NotFound);
      assert_eq!(
         error.response().description,
         format!("ID {id} のワークフローは存在しません")
      );
   }

   #[rstest]
   #[tokio::test]
   async fn test_パラメータ集合がなければnotfound(mock: MockWorkflowManagementRepository) {
      let sut = sut(&mock);
      let added = sut
         .add_workflow(registration_input(), &TenantId::new())
         .await
         .unwrap();
      mock.hide_parameters();

      let error = sut.get_workflow(added.workflow.id()).await.unwrap_err();

      assert_eq!(error.kind(), ErrorKind::NotFound);
   }

   #[rstest]
   #[tokio::test]
   async fn test_保存済みパラメータが壊れていればサーバーエラー(
      mock: MockWorkflowManagementRepository,
   ) {
      // Given: qualified name にステップ番号がないパラメータを直接保存する
      let workflow = Workflow::new(NewWorkflow {
         id:          WorkflowId::new(),
         name:        "Broken".to_string(),
         description: None,
         template_id: "tmpl1".to_string(),
         engine_id:   "eng1".to_string(),
      })
      .unwrap();
      let broken = Parameter {
         workflow_id:    *workflow.id(),
         param_name:     "ApprovalSteps".to_string(),
         param_value:    "Employee".to_string(),
         qualified_name: "step:Rolename".to_string(),
         holder:         ParameterHolder::Template,
      };
      mock.store()
         .add_workflow(&workflow, &[broken], &TenantId::new())
         .await
         .unwrap();
      let sut = sut(&mock);

      // When
      let error = sut.get_workflow(workflow.id()).await.unwrap_err();

      // Then
      assert_eq!(error.kind(), ErrorKind::ServerFault);
      assert_eq!(error.response().code, "WFM-65003");
   }

   // ===== update_workflow =====

   #[rstest]
   #[tokio::test]
   async fn test_更新は既存idのまま内容を置き換える(mock: MockWorkflowManagementRepository) {
      let sut = sut(&mock);
      let tenant_id = TenantId::new();
      let added = sut
         .add_workflow(registration_input(), &tenant_id)
         .await
         .unwrap();
      let mut input = registration_input();
      input.name = "Reg v2".to_string();
      input.template.steps[0].options[0].values = vec!["Manager".to_string()];

      let updated = sut
         .update_workflow(added.workflow.id(), input, &tenant_id)
         .await
         .unwrap();

      assert_eq!(updated.workflow.id(), added.workflow.id());
      assert_eq!(updated.workflow.name(), "Reg v2");
      assert_eq!(
         updated.template.steps[0].options[0].values,
         vec!["Manager".to_string()]
      );
   }

   #[rstest]
   #[tokio::test]
   async fn test_存在しないワークフローの更新はnotfoundで保存しない(
      mock: MockWorkflowManagementRepository,
   ) {
      let sut = sut(&mock);
      let id = WorkflowId::new();

      let error = sut
         .update_workflow(&id, registration_input(), &TenantId::new())
         .await
         .unwrap_err();

      assert_eq!(error.kind(), ErrorKind::NotFound);
      assert!(
         !mock
            .calls()
            .iter()
            .any(|c| matches!(c, RecordedCall::AddWorkflow(_)))
      );
   }

   // ===== list_workflows =====

   async fn seed(sut: &WorkflowUseCaseImpl, tenant_id: &TenantId, count: usize) {
      for i in 0..count {
         let mut input = registration_input();
         input.name = format!("wf-{i:02}");
         sut.add_workflow(input, tenant_id).await.unwrap();
      }
   }

   #[rstest]
   #[tokio::test]
   async fn test_ページ指定がなければ既定値と同じ結果になる(
      mock: MockWorkflowManagementRepository,
   ) {
      let sut = sut(&mock);
      let tenant_id = TenantId::new();
      seed(&sut, &tenant_id, 12).await;

      let defaulted = sut
         .list_workflows(None, None, None, &tenant_id)
         .await
         .unwrap();
      let explicit = sut
         .list_workflows(Some(10), Some(0), None, &tenant_id)
         .await
         .unwrap();

      assert_eq!(defaulted, explicit);
      assert_eq!(defaulted.count(), 10);
      assert_eq!(defaulted.total_results, 12);
      assert_eq!(defaulted.start_index, 1);
   }

   #[rstest]
   #[case::limitのみ(Some(3), None)]
   #[case::offsetのみ(None, Some(5))]
   #[tokio::test]
   async fn test_片方だけの指定でも両方とも既定値になる(
      mock: MockWorkflowManagementRepository,
      #[case] limit: Option<u32>,
      #[case] offset: Option<u32>,
   ) {
      let sut = sut(&mock);
      let tenant_id = TenantId::new();

      sut.list_workflows(limit, offset, Some("name sw wf"), &tenant_id)
         .await
         .unwrap();

      assert!(mock.calls().contains(&RecordedCall::ListWorkflows {
         limit:  10,
         offset: 0,
         filter: Some("name sw wf".to_string()),
      }));
      assert!(mock.calls().contains(&RecordedCall::CountWorkflows {
         filter: Some("name sw wf".to_string()),
      }));
   }

   #[rstest]
   #[tokio::test]
   async fn test_総件数はページと独立して数える(mock: MockWorkflowManagementRepository) {
      let sut = sut(&mock);
      let tenant_id = TenantId::new();
      seed(&sut, &tenant_id, 5).await;

      let page = sut
         .list_workflows(Some(2), Some(4), None, &tenant_id)
         .await
         .unwrap();

      assert_eq!(page.count(), 1);
      assert_eq!(page.total_results, 5);
      assert_eq!(page.start_index, 5);
   }

   #[rstest]
   #[tokio::test]
   async fn test_不正なフィルタはクライアントエラー(mock: MockWorkflowManagementRepository) {
      let sut = sut(&mock);

      let error = sut
         .list_workflows(None, None, Some("owner eq me"), &TenantId::new())
         .await
         .unwrap_err();

      assert_eq!(error.kind(), ErrorKind::ClientFault);
      assert_eq!(error.response().code, "WFM-60003");
   }

   // ===== remove_workflow =====

   #[rstest]
   #[tokio::test]
   async fn test_削除したワークフローは取得できない(mock: MockWorkflowManagementRepository) {
      let sut = sut(&mock);
      let added = sut
         .add_workflow(registration_input(), &TenantId::new())
         .await
         .unwrap();

      sut.remove_workflow(added.workflow.id()).await.unwrap();

      let error = sut.get_workflow(added.workflow.id()).await.unwrap_err();
      assert_eq!(error.kind(), ErrorKind::NotFound);
   }

   #[rstest]
   #[tokio::test]
   async fn test_存在しないワークフローの削除は事前確認せずクライアントエラー(
      mock: MockWorkflowManagementRepository,
   ) {
      let sut = sut(&mock);
      let id = WorkflowId::new();

      let error = sut.remove_workflow(&id).await.unwrap_err();

      assert_eq!(error.kind(), ErrorKind::ClientFault);
      assert_eq!(error.response().code, "WFM-60004");
      assert_eq!(mock.calls(), vec![RecordedCall::RemoveWorkflow(id)]);
   }

   #[rstest]
   #[tokio::test]
   async fn test_削除時のサーバーエラーは500に振り分けられる(
      mock: MockWorkflowManagementRepository,
   ) {
      mock.fail_on(
         "remove_workflow",
         InjectedFailure::ServerFault("disk full".to_string()),
      );
      let sut = sut(&mock);

      let error = sut.remove_workflow(&WorkflowId::new()).await.unwrap_err();

      assert_eq!(error.kind(), ErrorKind::ServerFault);
      assert_eq!(error.response().code, "WFM-65005");
   }
}
