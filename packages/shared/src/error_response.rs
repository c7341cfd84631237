//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - HTTP ステータスとの対応付けや axum の `IntoResponse` 変換は API 層の責務
//! - `code` はクライアントが機械的に判定するための安定した識別子
//! - `description` には対象 ID などのコンテキスト情報を埋め込む

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// ## JSON 形式
///
/// ```json
/// {
///   "code": "WFM-60004",
///   "message": "ワークフローが見つかりません",
///   "description": "ID 0192... のワークフローは存在しません"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   pub code:        String,
   pub message:     String,
   pub description: String,
}

impl ErrorResponse {
   /// 汎用コンストラクタ
   pub fn new(
      code: impl Into<String>,
      message: impl Into<String>,
      description: impl Into<String>,
   ) -> Self {
      Self {
         code:        code.into(),
         message:     message.into(),
         description: description.into(),
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_new_で全フィールドが正しく設定される() {
      let error = ErrorResponse::new("WFM-60004", "見つかりません", "ID wf-1 は存在しません");

      assert_eq!(error.code, "WFM-60004");
      assert_eq!(error.message, "見つかりません");
      assert_eq!(error.description, "ID wf-1 は存在しません");
   }

   #[test]
   fn test_jsonシリアライズのフィールド名() {
      let error = ErrorResponse::new("WFM-65001", "内部エラー", "詳細");
      let json = serde_json::to_value(&error).unwrap();

      assert_eq!(
         json,
         serde_json::json!({
            "code": "WFM-65001",
            "message": "内部エラー",
            "description": "詳細"
         })
      );
   }
}
