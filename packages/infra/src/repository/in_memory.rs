//! # InMemoryWorkflowManagementRepository
//!
//! プロセス内のマップにワークフローと紐付けを保持するバックエンド実装。
//! 外部のワークフローエンジンを用意せずに API を起動する場合と、テストで使用する。
//!
//! ## 保存規則
//!
//! - ワークフローは登録したテナントに属し、ID（UUID v7）順に並ぶ
//! - 紐付けのテナントは参照先ワークフローのテナントに従う
//! - 紐付け ID は 1 から単調増加で採番する
//! - 紐付けが残っているワークフローは削除できない

use std::{
   collections::BTreeMap,
   sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use idflow_domain::{
   association::{
      Association,
      AssociationId,
      AssociationUpdate,
      NewAssociation,
      Operation,
      WorkflowEvent,
   },
   tenant::TenantId,
   workflow::{Parameter, Workflow, WorkflowId},
};
use strum::IntoEnumIterator;

use super::{
   WorkflowManagementRepository,
   filter::{parse_filter, satisfies},
};
use crate::error::InfraError;

#[derive(Debug)]
struct StoredWorkflow {
   tenant_id: TenantId,
   workflow:  Workflow,
   params:    Vec<Parameter>,
}

#[derive(Debug)]
struct State {
   workflows:           BTreeMap<WorkflowId, StoredWorkflow>,
   associations:        BTreeMap<AssociationId, Association>,
   next_association_id: i64,
   events:              Vec<WorkflowEvent>,
}

impl State {
   fn tenant_of(&self, association: &Association) -> Option<&TenantId> {
      self
         .workflows
         .get(&association.workflow_id)
         .map(|stored| &stored.tenant_id)
   }

   fn is_registered(&self, operation: Operation) -> bool {
      self.events.iter().any(|e| e.operation == operation)
   }

   fn ensure_registered(&self, operation: Operation) -> Result<(), InfraError> {
      if self.is_registered(operation) {
         Ok(())
      } else {
         Err(InfraError::invalid_input(format!(
            "登録されていないイベントです: {operation}"
         )))
      }
   }

   fn workflow_name(&self, workflow_id: &WorkflowId) -> Result<String, InfraError> {
      self
         .workflows
         .get(workflow_id)
         .map(|stored| stored.workflow.name().to_string())
         .ok_or_else(|| {
            InfraError::invalid_input(format!("参照先のワークフローが存在しません: {workflow_id}"))
         })
   }
}

/// インメモリ実装の WorkflowManagementRepository
#[derive(Debug, Clone)]
pub struct InMemoryWorkflowManagementRepository {
   state: Arc<RwLock<State>>,
}

impl Default for InMemoryWorkflowManagementRepository {
   fn default() -> Self {
      Self::new()
   }
}

impl InMemoryWorkflowManagementRepository {
   /// すべての操作をイベントとして登録した状態で作成する
   pub fn new() -> Self {
      Self::with_events(Operation::iter())
   }

   /// 指定した操作のみをイベントとして登録した状態で作成する
   pub fn with_events(operations: impl IntoIterator<Item = Operation>) -> Self {
      let state = State {
         workflows:           BTreeMap::new(),
         associations:        BTreeMap::new(),
         next_association_id: 1,
         events:              operations.into_iter().map(WorkflowEvent::from).collect(),
      };
      Self {
         state: Arc::new(RwLock::new(state)),
      }
   }

   fn read(&self) -> Result<RwLockReadGuard<'_, State>, InfraError> {
      self
         .state
         .read()
         .map_err(|_| InfraError::unexpected("ストアのロックが破損しています"))
   }

   fn write(&self) -> Result<RwLockWriteGuard<'_, State>, InfraError> {
      self
         .state
         .write()
         .map_err(|_| InfraError::unexpected("ストアのロックが破損しています"))
   }
}

fn paginate<T>(items: impl Iterator<Item = T>, limit: u32, offset: u32) -> Vec<T> {
   items.skip(offset as usize).take(limit as usize).collect()
}

#[async_trait]
impl WorkflowManagementRepository for InMemoryWorkflowManagementRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(id = %workflow.id(), %tenant_id))]
   async fn add_workflow(
      &self,
      workflow: &Workflow,
      params: &[Parameter],
      tenant_id: &TenantId,
   ) -> Result<(), InfraError> {
      let mut state = self.write()?;

      let owned_by_other = state
         .workflows
         .get(workflow.id())
         .is_some_and(|existing| existing.tenant_id != *tenant_id);
      if owned_by_other {
         return Err(InfraError::invalid_input(format!(
            "別テナントのワークフローは上書きできません: {}",
            workflow.id()
         )));
      }

      state.workflows.insert(
         *workflow.id(),
         StoredWorkflow {
            tenant_id: *tenant_id,
            workflow:  workflow.clone(),
            params:    params.to_vec(),
         },
      );
      for association in state
         .associations
         .values_mut()
         .filter(|a| a.workflow_id == *workflow.id())
      {
         association.workflow_name = workflow.name().to_string();
      }

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn get_workflow(&self, id: &WorkflowId) -> Result<Option<Workflow>, InfraError> {
      Ok(self.read()?.workflows.get(id).map(|s| s.workflow.clone()))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn get_workflow_parameters(
      &self,
      id: &WorkflowId,
   ) -> Result<Option<Vec<Parameter>>, InfraError> {
      Ok(self.read()?.workflows.get(id).map(|s| s.params.clone()))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id, %limit, %offset))]
   async fn list_paginated_workflows(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u32,
      filter: Option<&str>,
   ) -> Result<Vec<Workflow>, InfraError> {
      let filter = parse_filter::<Workflow>(filter)?;
      let state = self.read()?;

      let matched = state
         .workflows
         .values()
         .filter(|s| s.tenant_id == *tenant_id)
         .map(|s| &s.workflow)
         .filter(|w| satisfies(*w, filter.as_ref()))
         .cloned();

      Ok(paginate(matched, limit, offset))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id))]
   async fn get_workflows_count(
      &self,
      tenant_id: &TenantId,
      filter: Option<&str>,
   ) -> Result<u64, InfraError> {
      let filter = parse_filter::<Workflow>(filter)?;
      let state = self.read()?;

      let count = state
         .workflows
         .values()
         .filter(|s| s.tenant_id == *tenant_id && satisfies(&s.workflow, filter.as_ref()))
         .count();

      Ok(count as u64)
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn remove_workflow(&self, id: &WorkflowId) -> Result<(), InfraError> {
      let mut state = self.write()?;

      if !state.workflows.contains_key(id) {
         return Err(InfraError::not_found("Workflow", id));
      }
      if state.associations.values().any(|a| a.workflow_id == *id) {
         return Err(InfraError::invalid_input(format!(
            "紐付けが残っているワークフローは削除できません: {id}"
         )));
      }

      state.workflows.remove(id);
      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(workflow_id = %association.workflow_id))]
   async fn add_association(
      &self,
      association: &NewAssociation,
   ) -> Result<AssociationId, InfraError> {
      let mut state = self.write()?;

      let workflow_name = state.workflow_name(&association.workflow_id)?;
      state.ensure_registered(association.operation)?;

      let id = AssociationId::new(state.next_association_id);
      state.next_association_id += 1;
      state.associations.insert(
         id,
         Association {
            id,
            name: association.name.clone(),
            operation: association.operation,
            workflow_id: association.workflow_id,
            workflow_name,
            condition: association.condition.clone(),
            enabled: association.enabled,
         },
      );

      Ok(id)
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn get_association(&self, id: AssociationId) -> Result<Option<Association>, InfraError> {
      Ok(self.read()?.associations.get(&id).cloned())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id, %limit, %offset))]
   async fn list_paginated_associations(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u32,
      filter: Option<&str>,
   ) -> Result<Vec<Association>, InfraError> {
      let filter = parse_filter::<Association>(filter)?;
      let state = self.read()?;

      let matched = state
         .associations
         .values()
         .filter(|a| state.tenant_of(a) == Some(tenant_id))
         .filter(|a| satisfies(*a, filter.as_ref()))
         .cloned();

      Ok(paginate(matched, limit, offset))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id))]
   async fn get_associations_count(
      &self,
      tenant_id: &TenantId,
      filter: Option<&str>,
   ) -> Result<u64, InfraError> {
      let filter = parse_filter::<Association>(filter)?;
      let state = self.read()?;

      let count = state
         .associations
         .values()
         .filter(|a| state.tenant_of(a) == Some(tenant_id) && satisfies(*a, filter.as_ref()))
         .count();

      Ok(count as u64)
   }

   #[tracing::instrument(skip_all, level = "debug", fields(id = %update.id))]
   async fn update_association(&self, update: &AssociationUpdate) -> Result<(), InfraError> {
      let mut state = self.write()?;

      if !state.associations.contains_key(&update.id) {
         return Err(InfraError::not_found("Association", update.id));
      }
      let workflow_name = update
         .workflow_id
         .as_ref()
         .map(|workflow_id| state.workflow_name(workflow_id))
         .transpose()?;
      if let Some(operation) = update.operation {
         state.ensure_registered(operation)?;
      }

      let association = state
         .associations
         .get_mut(&update.id)
         .ok_or_else(|| InfraError::not_found("Association", update.id))?;
      if let Some(name) = &update.name {
         association.name.clone_from(name);
      }
      if let Some(operation) = update.operation {
         association.operation = operation;
      }
      if let (Some(workflow_id), Some(workflow_name)) = (update.workflow_id, workflow_name) {
         association.workflow_id = workflow_id;
         association.workflow_name = workflow_name;
      }
      if let Some(condition) = &update.condition {
         association.condition = Some(condition.clone());
      }
      association.enabled = update.enabled;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn remove_association(&self, id: AssociationId) -> Result<(), InfraError> {
      self
         .write()?
         .associations
         .remove(&id)
         .map(|_| ())
         .ok_or_else(|| InfraError::not_found("Association", id))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%name))]
   async fn get_event(&self, name: &str) -> Result<Option<WorkflowEvent>, InfraError> {
      let Ok(operation) = name.parse::<Operation>() else {
         return Ok(None);
      };

      Ok(self
         .read()?
         .events
         .iter()
         .find(|e| e.operation == operation)
         .cloned())
   }
}
