//! # ドメイン層エラー定義
//!
//! ビジネスルール違反や保存データの不整合を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `CorruptData` | 500 Internal Server Error | 保存済みデータが解釈できない |
//!
//! ## 使用例
//!
//! ```rust
//! use idflow_domain::DomainError;
//!
//! fn validate_engine(engine_id: &str) -> Result<(), DomainError> {
//!    if engine_id.is_empty() {
//!       return Err(DomainError::Validation("エンジン ID は必須です".to_string()));
//!    }
//!    Ok(())
//! }
//!
//! assert!(validate_engine("").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
   /// バリデーションエラー
   ///
   /// 入力値がビジネスルールに違反している場合に使用する。
   #[error("バリデーションエラー: {0}")]
   Validation(String),

   /// エンティティが見つからない
   #[error("{entity_type} が見つかりません: {id}")]
   NotFound {
      /// エンティティの種類（"Workflow", "Association" など）
      entity_type: &'static str,
      /// 検索に使用した識別子
      id:          String,
   },

   /// 保存済みデータの不整合
   ///
   /// パラメータストアに格納された値が期待する形式でない場合に使用する。
   /// クライアント入力ではなくサーバー側の問題として扱う。
   #[error("データ不整合: {0}")]
   CorruptData(String),
}
