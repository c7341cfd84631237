//! # ワークフロー紐付けユースケース
//!
//! 操作イベントとワークフローの紐付けを管理する。

use std::sync::Arc;

use idflow_domain::{
   association::{Association, AssociationId, AssociationUpdate, NewAssociation, Operation},
   pagination::{Page, PageRequest},
   tenant::TenantId,
   workflow::WorkflowId,
};
use idflow_infra::repository::WorkflowManagementRepository;

use crate::error::{ApiError, ErrorMessage};

/// 紐付けの追加入力
///
/// `workflow_id` はクライアントから受け取った文字列のまま保持する。
/// 追加が成功した場合はこの入力がそのまま応答として返る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationInput {
   pub name:        String,
   pub operation:   Operation,
   pub workflow_id: String,
   pub condition:   Option<String>,
   pub enabled:     bool,
}

/// 紐付けの部分更新入力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationPatch {
   pub name:        Option<String>,
   pub operation:   Option<Operation>,
   pub workflow_id: Option<String>,
   pub condition:   Option<String>,
   pub enabled:     Option<bool>,
}

pub struct AssociationUseCaseImpl {
   repository: Arc<dyn WorkflowManagementRepository>,
}

impl AssociationUseCaseImpl {
   pub fn new(repository: Arc<dyn WorkflowManagementRepository>) -> Self {
      Self { repository }
   }

   /// 紐付けを追加する
   ///
   /// 参照先のワークフローとイベントがどちらも存在する場合のみ保存する。
   /// 新しい紐付け ID は返さない。
   pub async fn add_association(&self, input: AssociationInput) -> Result<AssociationInput, ApiError> {
      let map_infra = |e| {
         ApiError::from_infra(
            ErrorMessage::ClientErrorAddingAssociation,
            ErrorMessage::ErrorAddingAssociation,
            None,
            e,
         )
      };

      let workflow = match input.workflow_id.parse::<WorkflowId>() {
         Ok(id) => self.repository.get_workflow(&id).await.map_err(map_infra)?,
         Err(_) => None,
      };
      let operation: &'static str = input.operation.into();
      let event = self.repository.get_event(operation).await.map_err(map_infra)?;

      let Some(workflow) = workflow else {
         return Err(ApiError::validation(
            ErrorMessage::ClientErrorAddingAssociation,
            format!("ID {} のワークフローは存在しません", input.workflow_id),
         ));
      };
      if event.is_none() {
         return Err(ApiError::validation(
            ErrorMessage::ClientErrorAddingAssociation,
            format!("イベント {operation} は登録されていません"),
         ));
      }

      self
         .repository
         .add_association(&NewAssociation {
            name:        input.name.clone(),
            operation:   input.operation,
            workflow_id: *workflow.id(),
            condition:   input.condition.clone(),
            enabled:     input.enabled,
         })
         .await
         .map_err(map_infra)?;

      Ok(input)
   }

   pub async fn get_association(&self, id: AssociationId) -> Result<Association, ApiError> {
      let id_str = id.to_string();
      self
         .repository
         .get_association(id)
         .await
         .map_err(|e| {
            ApiError::from_infra(
               ErrorMessage::AssociationNotFound,
               ErrorMessage::ErrorRetrievingAssociation,
               Some(id_str.as_str()),
               e,
            )
         })?
         .ok_or_else(|| ApiError::not_found(ErrorMessage::AssociationNotFound, id))
   }

   /// テナント内の紐付け一覧を取得する
   ///
   /// ページングの既定値はワークフロー一覧と同じ。
   pub async fn list_associations(
      &self,
      limit: Option<u32>,
      offset: Option<u32>,
      filter: Option<&str>,
      tenant_id: &TenantId,
   ) -> Result<Page<Association>, ApiError> {
      let page = PageRequest::resolve(limit, offset);
      let map_infra = |e| {
         ApiError::from_infra(
            ErrorMessage::ClientErrorListingAssociations,
            ErrorMessage::ErrorListingAssociations,
            None,
            e,
         )
      };

      let items = self
         .repository
         .list_paginated_associations(tenant_id, page.limit, page.offset, filter)
         .await
         .map_err(map_infra)?;
      let total_results = self
         .repository
         .get_associations_count(tenant_id, filter)
         .await
         .map_err(map_infra)?;

      Ok(Page {
         items,
         total_results,
         start_index: page.start_index(),
      })
   }

   /// 紐付けを部分更新する
   ///
   /// `enabled` が未指定の場合は現在値を読み出して引き継ぐ（対象がなければ `NotFound`）。
   /// 指定済みの場合は存在確認をバックエンドに任せる。
   pub async fn update_association(
      &self,
      id: AssociationId,
      patch: AssociationPatch,
   ) -> Result<Association, ApiError> {
      let id_str = id.to_string();
      let map_infra = |e| {
         ApiError::from_infra(
            ErrorMessage::ClientErrorUpdatingAssociation,
            ErrorMessage::ErrorUpdatingAssociation,
            Some(id_str.as_str()),
            e,
         )
      };

      let workflow_id = patch
         .workflow_id
         .map(|raw| {
            raw.parse::<WorkflowId>().map_err(|_| {
               ApiError::validation(
                  ErrorMessage::ClientErrorUpdatingAssociation,
                  format!("ID {raw} のワークフローは存在しません"),
               )
            })
         })
         .transpose()?;

      let enabled = match patch.enabled {
         Some(enabled) => enabled,
         None => {
            self
               .repository
               .get_association(id)
               .await
               .map_err(map_infra)?
               .ok_or_else(|| ApiError::not_found(ErrorMessage::AssociationNotFound, id))?
               .enabled
         }
      };

      self
         .repository
         .update_association(&AssociationUpdate {
            id,
            name: patch.name,
            operation: patch.operation,
            workflow_id,
            condition: patch.condition,
            enabled,
         })
         .await
         .map_err(map_infra)?;

      self.get_association(id).await
   }

   /// 紐付けを削除する
   ///
   /// 事前に存在を確認し、なければ `NotFound`。
   pub async fn remove_association(&self, id: AssociationId) -> Result<(), ApiError> {
      self.get_association(id).await?;

      let id_str = id.to_string();
      self.repository.remove_association(id).await.map_err(|e| {
         ApiError::from_infra(
            ErrorMessage::AssociationNotFound,
            ErrorMessage::ErrorRemovingAssociation,
            Some(id_str.as_str()),
            e,
         )
      })
   }
}
