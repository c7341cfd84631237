//! # リポジトリ
//!
//! ワークフロー管理バックエンドの操作を定義するトレイトと、その実装を提供する。
//!
//! - **依存性逆転**: API 層は [`WorkflowManagementRepository`] にのみ依存する
//! - **テスタビリティ**: トレイト経由でモック可能

pub mod filter;
pub mod in_memory;
pub mod workflow_management_repository;

pub use in_memory::InMemoryWorkflowManagementRepository;
pub use workflow_management_repository::WorkflowManagementRepository;
