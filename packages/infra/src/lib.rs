//! # idflow インフラ層
//!
//! ワークフロー管理バックエンドとの接続を担当する。
//!
//! ## 責務
//!
//! - **リポジトリトレイト**: バックエンドが提供する操作の定義
//! - **インメモリ実装**: 単体起動とテストのための参照実装
//! - **フィルタ式**: 一覧・件数取得で使う `<属性> <演算子> <値>` の評価
//!
//! ## 依存関係
//!
//! ```text
//! workflow-api → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリトレイトと実装
//! - `mock` - テスト用モック（`test-utils` feature）

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
