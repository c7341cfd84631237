//! # ワークフロー定義
//!
//! ワークフローの識別情報とエンジン・テンプレートへの参照を保持する。

use super::WorkflowTemplate;
use crate::DomainError;

define_uuid_id! {
   /// ワークフローの一意識別子
   ///
   /// 追加時にユースケース層で生成する。
   pub struct WorkflowId;
}

/// ワークフロー定義
///
/// テンプレート ID とエンジン ID は空にできない。
/// 不変条件はコンストラクタで検証し、フィールドは getter 経由でのみ公開する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
   id:          WorkflowId,
   name:        String,
   description: Option<String>,
   template_id: String,
   engine_id:   String,
}

/// [`Workflow::new`] の入力
#[derive(Debug, Clone)]
pub struct NewWorkflow {
   pub id:          WorkflowId,
   pub name:        String,
   pub description: Option<String>,
   pub template_id: String,
   pub engine_id:   String,
}

impl Workflow {
   /// ワークフロー定義を作成する
   ///
   /// # エラー
   ///
   /// テンプレート ID またはエンジン ID が空文字の場合は
   /// [`DomainError::Validation`] を返す。空白のみの ID はそのまま受け付ける。
   pub fn new(input: NewWorkflow) -> Result<Self, DomainError> {
      if input.template_id.is_empty() {
         return Err(DomainError::Validation(
            "テンプレート ID は必須です".to_string(),
         ));
      }
      if input.engine_id.is_empty() {
         return Err(DomainError::Validation("エンジン ID は必須です".to_string()));
      }

      Ok(Self {
         id:          input.id,
         name:        input.name,
         description: input.description,
         template_id: input.template_id,
         engine_id:   input.engine_id,
      })
   }

   pub fn id(&self) -> &WorkflowId {
      &self.id
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn description(&self) -> Option<&str> {
      self.description.as_deref()
   }

   pub fn template_id(&self) -> &str {
      &self.template_id
   }

   pub fn engine_id(&self) -> &str {
      &self.engine_id
   }
}

/// テンプレートを復元済みのワークフロー詳細
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowDetail {
   pub workflow: Workflow,
   pub template: WorkflowTemplate,
}
