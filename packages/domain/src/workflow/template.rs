//! # 承認テンプレート
//!
//! ワークフローの承認ステップ構成を表す入れ子構造。

/// 承認テンプレート
///
/// `name` はテンプレート ID として [`Workflow`](super::Workflow) にも保存される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTemplate {
   pub name:  String,
   pub steps: Vec<TemplateStep>,
}

/// 承認ステップ
///
/// `step` は 1 始まりのステップ番号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStep {
   pub step:    u32,
   pub options: Vec<StepOption>,
}

/// ステップの参加条件
///
/// 例: `entity = "Rolename"`, `values = ["Employee", "Manager"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOption {
   pub entity: String,
   pub values: Vec<String>,
}
