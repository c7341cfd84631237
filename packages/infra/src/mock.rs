//! # テスト用モックリポジトリ
//!
//! ユースケーステストで使用するモックリポジトリ。
//! 保存は [`InMemoryWorkflowManagementRepository`] に委譲し、
//! 呼び出し履歴の記録と失敗の注入を追加する。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! idflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
   collections::HashMap,
   sync::{Arc, Mutex},
};

use async_trait::async_trait;
use idflow_domain::{
   association::{Association, AssociationId, AssociationUpdate, NewAssociation, WorkflowEvent},
   tenant::TenantId,
   workflow::{Parameter, Workflow, WorkflowId},
};

use crate::{
   error::InfraError,
   repository::{InMemoryWorkflowManagementRepository, WorkflowManagementRepository},
};

/// 記録されたバックエンド呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
   AddWorkflow(WorkflowId),
   GetWorkflow(WorkflowId),
   GetWorkflowParameters(WorkflowId),
   ListWorkflows {
      limit:  u32,
      offset: u32,
      filter: Option<String>,
   },
   CountWorkflows {
      filter: Option<String>,
   },
   RemoveWorkflow(WorkflowId),
   AddAssociation(NewAssociation),
   GetAssociation(AssociationId),
   ListAssociations {
      limit:  u32,
      offset: u32,
      filter: Option<String>,
   },
   CountAssociations {
      filter: Option<String>,
   },
   UpdateAssociation(AssociationUpdate),
   RemoveAssociation(AssociationId),
   GetEvent(String),
}

/// 注入する失敗
#[derive(Debug, Clone)]
pub enum InjectedFailure {
   /// クライアント起因（`InfraErrorKind::InvalidInput`）
   ClientFault(String),
   /// サーバー起因（`InfraErrorKind::Unexpected`）
   ServerFault(String),
}

impl InjectedFailure {
   fn to_error(&self) -> InfraError {
      match self {
         Self::ClientFault(msg) => InfraError::invalid_input(msg.clone()),
         Self::ServerFault(msg) => InfraError::unexpected(msg.clone()),
      }
   }
}

// ===== MockWorkflowManagementRepository =====

#[derive(Clone, Default)]
pub struct MockWorkflowManagementRepository {
   inner:             InMemoryWorkflowManagementRepository,
   calls:             Arc<Mutex<Vec<RecordedCall>>>,
   failures:          Arc<Mutex<HashMap<&'static str, InjectedFailure>>>,
   hidden_parameters: Arc<Mutex<bool>>,
}

impl MockWorkflowManagementRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// 保存先を指定して作成する（登録イベントを絞り込む場合など）
   pub fn with_store(inner: InMemoryWorkflowManagementRepository) -> Self {
      Self {
         inner,
         ..Self::default()
      }
   }

   /// 保存先への直接アクセス（テストデータの準備用、呼び出しは記録されない）
   pub fn store(&self) -> &InMemoryWorkflowManagementRepository {
      &self.inner
   }

   /// 指定したメソッドが失敗するように設定する
   ///
   /// `method` はトレイトのメソッド名（例: `"remove_workflow"`）。
   pub fn fail_on(&self, method: &'static str, failure: InjectedFailure) {
      self.failures.lock().unwrap().insert(method, failure);
   }

   /// `get_workflow_parameters` が常に `None` を返すように設定する
   pub fn hide_parameters(&self) {
      *self.hidden_parameters.lock().unwrap() = true;
   }

   /// これまでの呼び出し履歴
   pub fn calls(&self) -> Vec<RecordedCall> {
      self.calls.lock().unwrap().clone()
   }

   fn record(&self, method: &'static str, call: RecordedCall) -> Result<(), InfraError> {
      self.calls.lock().unwrap().push(call);
      match self.failures.lock().unwrap().get(method) {
         Some(failure) => Err(failure.to_error()),
         None => Ok(()),
      }
   }
}

#[async_trait]
impl WorkflowManagementRepository for MockWorkflowManagementRepository {
   async fn add_workflow(
      &self,
      workflow: &Workflow,
      params: &[Parameter],
      tenant_id: &TenantId,
   ) -> Result<(), InfraError> {
      self.record("add_workflow", RecordedCall::AddWorkflow(*workflow.id()))?;
      self.inner.add_workflow(workflow, params, tenant_id).await
   }

   async fn get_workflow(&self, id: &WorkflowId) -> Result<Option<Workflow>, InfraError> {
      self.record("get_workflow", RecordedCall::GetWorkflow(*id))?;
      self.inner.get_workflow(id).await
   }

   async fn get_workflow_parameters(
      &self,
      id: &WorkflowId,
   ) -> Result<Option<Vec<Parameter>>, InfraError> {
      self.record(
         "get_workflow_parameters",
         RecordedCall::GetWorkflowParameters(*id),
      )?;
      if *self.hidden_parameters.lock().unwrap() {
         return Ok(None);
      }
      self.inner.get_workflow_parameters(id).await
   }

   async fn list_paginated_workflows(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u32,
      filter: Option<&str>,
   ) -> Result<Vec<Workflow>, InfraError> {
      self.record(
         "list_paginated_workflows",
         RecordedCall::ListWorkflows {
            limit,
            offset,
            filter: filter.map(str::to_string),
         },
      )?;
      self
         .inner
         .list_paginated_workflows(tenant_id, limit, offset, filter)
         .await
   }

   async fn get_workflows_count(
      &self,
      tenant_id: &TenantId,
      filter: Option<&str>,
   ) -> Result<u64, InfraError> {
      self.record(
         "get_workflows_count",
         RecordedCall::CountWorkflows {
            filter: filter.map(str::to_string),
         },
      )?;
      self.inner.get_workflows_count(tenant_id, filter).await
   }

   async fn remove_workflow(&self, id: &WorkflowId) -> Result<(), InfraError> {
      self.record("remove_workflow", RecordedCall::RemoveWorkflow(*id))?;
      self.inner.remove_workflow(id).await
   }

   async fn add_association(
      &self,
      association: &NewAssociation,
   ) -> Result<AssociationId, InfraError> {
      self.record(
         "add_association",
         RecordedCall::AddAssociation(association.clone()),
      )?;
      self.inner.add_association(association).await
   }

   async fn get_association(&self, id: AssociationId) -> Result<Option<Association>, InfraError> {
      self.record("get_association", RecordedCall::GetAssociation(id))?;
      self.inner.get_association(id).await
   }

   async fn list_paginated_associations(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u32,
      filter: Option<&str>,
   ) -> Result<Vec<Association>, InfraError> {
      self.record(
         "list_paginated_associations",
         RecordedCall::ListAssociations {
            limit,
            offset,
            filter: filter.map(str::to_string),
         },
      )?;
      self
         .inner
         .list_paginated_associations(tenant_id, limit, offset, filter)
         .await
   }

   async fn get_associations_count(
      &self,
      tenant_id: &TenantId,
      filter: Option<&str>,
   ) -> Result<u64, InfraError> {
      self.record(
         "get_associations_count",
         RecordedCall::CountAssociations {
            filter: filter.map(str::to_string),
         },
      )?;
      self.inner.get_associations_count(tenant_id, filter).await
   }

   async fn update_association(&self, update: &AssociationUpdate) -> Result<(), InfraError> {
      self.record(
         "update_association",
         RecordedCall::UpdateAssociation(update.clone()),
      )?;
      self.inner.update_association(update).await
   }

   async fn remove_association(&self, id: AssociationId) -> Result<(), InfraError> {
      self.record("remove_association", RecordedCall::RemoveAssociation(id))?;
      self.inner.remove_association(id).await
   }

   async fn get_event(&self, name: &str) -> Result<Option<WorkflowEvent>, InfraError> {
      self.record("get_event", RecordedCall::GetEvent(name.to_string()))?;
      self.inner.get_event(name).await
   }
}
