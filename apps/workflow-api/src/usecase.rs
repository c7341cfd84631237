//! # ユースケース層
//!
//! ワークフローと紐付けの CRUD を、注入されたバックエンドに委譲しつつ
//! ページングの既定値、存在確認、エラーの振り分けを行う。

mod association;
mod workflow;

pub use association::{AssociationInput, AssociationPatch, AssociationUseCaseImpl};
pub use workflow::{WorkflowInput, WorkflowUseCaseImpl};
