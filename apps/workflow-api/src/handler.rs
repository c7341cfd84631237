//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保ち、DTO 変換以外はユースケースに委譲する

pub mod health;
pub mod workflow;
pub mod workflow_association;

pub use health::health_check;
pub use workflow::{
   WorkflowState,
   add_workflow,
   get_workflow,
   list_workflows,
   remove_workflow,
   update_workflow,
};
pub use workflow_association::{
   AssociationState,
   add_association,
   get_association,
   list_associations,
   remove_association,
   update_association,
};
