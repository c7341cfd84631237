//! # WorkflowManagementRepository
//!
//! ワークフロー定義・パラメータ・紐付け・登録済みイベントを保持するバックエンドの
//! 操作を定義する。
//!
//! ## 設計方針
//!
//! - **テナントは明示的に渡す**: 一覧・件数取得と追加はテナント ID を引数で受け取る
//! - **不在は `None`**: 単一取得で対象が存在しない場合はエラーではなく `Ok(None)`
//! - **削除・更新の不在はエラー**: 対象が存在しない場合は `InfraErrorKind::NotFound`

use async_trait::async_trait;
use idflow_domain::{
   association::{Association, AssociationId, AssociationUpdate, NewAssociation, WorkflowEvent},
   tenant::TenantId,
   workflow::{Parameter, Workflow, WorkflowId},
};

use crate::error::InfraError;

/// ワークフロー管理バックエンド
///
/// `Arc<dyn WorkflowManagementRepository>` として API 層に注入する。
#[async_trait]
pub trait WorkflowManagementRepository: Send + Sync {
   /// ワークフローを保存する
   ///
   /// 同じ ID のワークフローが存在する場合は上書きし、パラメータ集合も置き換える。
   async fn add_workflow(
      &self,
      workflow: &Workflow,
      params: &[Parameter],
      tenant_id: &TenantId,
   ) -> Result<(), InfraError>;

   /// ID でワークフローを取得する
   async fn get_workflow(&self, id: &WorkflowId) -> Result<Option<Workflow>, InfraError>;

   /// ワークフローのパラメータ集合を取得する
   ///
   /// ワークフローが存在しない場合は `Ok(None)`。
   async fn get_workflow_parameters(
      &self,
      id: &WorkflowId,
   ) -> Result<Option<Vec<Parameter>>, InfraError>;

   /// テナント内のワークフローを 1 ページ分取得する
   ///
   /// フィルタ式が不正な場合は `InfraErrorKind::InvalidInput`。
   async fn list_paginated_workflows(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u32,
      filter: Option<&str>,
   ) -> Result<Vec<Workflow>, InfraError>;

   /// limit / offset を無視したワークフローの総件数
   async fn get_workflows_count(
      &self,
      tenant_id: &TenantId,
      filter: Option<&str>,
   ) -> Result<u64, InfraError>;

   /// ワークフローを削除する
   async fn remove_workflow(&self, id: &WorkflowId) -> Result<(), InfraError>;

   /// 紐付けを作成し、採番した ID を返す
   async fn add_association(
      &self,
      association: &NewAssociation,
   ) -> Result<AssociationId, InfraError>;

   /// ID で紐付けを取得する
   async fn get_association(&self, id: AssociationId) -> Result<Option<Association>, InfraError>;

   /// テナント内の紐付けを 1 ページ分取得する
   async fn list_paginated_associations(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u32,
      filter: Option<&str>,
   ) -> Result<Vec<Association>, InfraError>;

   /// limit / offset を無視した紐付けの総件数
   async fn get_associations_count(
      &self,
      tenant_id: &TenantId,
      filter: Option<&str>,
   ) -> Result<u64, InfraError>;

   /// 紐付けを部分更新する
   ///
   /// `None` のフィールドは変更しない。
   async fn update_association(&self, update: &AssociationUpdate) -> Result<(), InfraError>;

   /// 紐付けを削除する
   async fn remove_association(&self, id: AssociationId) -> Result<(), InfraError>;

   /// イベント名から登録済みイベントを取得する
   async fn get_event(&self, name: &str) -> Result<Option<WorkflowEvent>, InfraError>;
}
