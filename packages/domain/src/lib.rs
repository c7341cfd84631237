//! # idflow ドメイン層
//!
//! ワークフロー管理のビジネスルールとエンティティを定義する。
//!
//! ## モジュール構成
//!
//! - [`workflow`]: ワークフロー定義、承認テンプレート、パラメータストアとの変換
//! - [`association`]: ワークフローとトリガー操作の紐付け
//! - [`pagination`]: 一覧取得のページング規則
//! - [`tenant`]: テナント識別子
//! - [`error`]: ドメインエラー
//!
//! インフラ層や HTTP 層には依存しない。

#[macro_use]
mod macros;

pub mod association;
pub mod error;
pub mod pagination;
pub mod tenant;
pub mod workflow;

pub use error::DomainError;
