//! # ワークフロー
//!
//! ワークフロー定義と承認テンプレートを管理する。
//!
//! ## 概念モデル
//!
//! - **Workflow**: エンジン実装とテンプレートに紐付いた承認プロセスの定義
//! - **WorkflowTemplate**: 承認ステップとその参加条件（エンティティと値）の入れ子構造
//! - **Parameter**: テンプレートをフラットなキー・バリューとして保存したレコード
//!
//! バックエンドはテンプレートを直接保持せず、[`Parameter`] の集合として保存する。
//! 入れ子構造との相互変換は [`encode_template_steps`] / [`decode_template_steps`] が担う。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use idflow_domain::workflow::{
//!    NewWorkflow, StepOption, TemplateStep, Workflow, WorkflowId, decode_template_steps,
//!    encode_template_steps,
//! };
//!
//! let workflow = Workflow::new(NewWorkflow {
//!    id:          WorkflowId::new(),
//!    name:        "Reg".to_string(),
//!    description: Some("d".to_string()),
//!    template_id: "tmpl1".to_string(),
//!    engine_id:   "eng1".to_string(),
//! })?;
//!
//! let steps = vec![TemplateStep {
//!    step:    1,
//!    options: vec![StepOption {
//!       entity: "Rolename".to_string(),
//!       values: vec!["Employee".to_string()],
//!    }],
//! }];
//! let params = encode_template_steps(*workflow.id(), &steps);
//! assert_eq!(decode_template_steps(&params)?, steps);
//! # Ok(())
//! # }
//! ```

mod definition;
mod parameter;
mod template;

pub use definition::*;
pub use parameter::*;
pub use template::*;
