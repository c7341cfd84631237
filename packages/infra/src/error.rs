//! # インフラ層エラー定義
//!
//! バックエンド操作で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! convenience constructor でエラーを生成すると、その時点のスパン情報が
//! 自動的にキャプチャされる。
//!
//! ## 分類
//!
//! API 層は種別によって原因の所在を判定する。
//!
//! | 種別 | 原因 |
//! |------|------|
//! | `NotFound`, `InvalidInput` | クライアント |
//! | `Unexpected` | サーバー |

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///    InfraErrorKind::NotFound { entity, id } => { /* 存在しない */ }
///    _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// 操作対象が存在しない
   #[error("{entity} が見つかりません: {id}")]
   NotFound {
      /// エンティティ名（例: "Workflow"）
      entity: String,
      /// エンティティの ID
      id:     String,
   },

   /// クライアント入力エラー
   ///
   /// インフラ層で検出されるが、原因はクライアント入力にある。
   /// 不正なフィルタ式、存在しない参照先など。
   #[error("入力エラー: {0}")]
   InvalidInput(String),

   /// 予期しないエラー
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraErrorKind {
   /// 原因がクライアント側にあるか
   pub fn is_client_fault(&self) -> bool {
      matches!(self, Self::NotFound { .. } | Self::InvalidInput(_))
   }
}

// ===== InfraError のメソッド =====

impl InfraError {
   /// エラー種別を取得する
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   /// SpanTrace を取得する
   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// 原因がクライアント側にあるか
   pub fn is_client_fault(&self) -> bool {
      self.kind.is_client_fault()
   }

   // ===== Convenience constructors =====

   /// 対象不在エラーを生成する
   pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
      Self::with_kind(InfraErrorKind::NotFound {
         entity: entity.into(),
         id:     id.to_string(),
      })
   }

   /// クライアント入力エラーを生成する
   pub fn invalid_input(msg: impl Into<String>) -> Self {
      Self::with_kind(InfraErrorKind::InvalidInput(msg.into()))
   }

   /// 予期しないエラーを生成する
   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self::with_kind(InfraErrorKind::Unexpected(msg.into()))
   }

   fn with_kind(kind: InfraErrorKind) -> Self {
      Self {
         kind,
         span_trace: SpanTrace::capture(),
      }
   }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      std::error::Error::source(&self.kind)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use tracing_subscriber::layer::SubscriberExt as _;

   use super::*;

   /// テスト用に ErrorLayer 付き subscriber を設定する
   fn with_error_layer(f: impl FnOnce()) {
      let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
      let _guard = tracing::subscriber::set_default(subscriber);
      f();
   }

   #[test]
   fn test_not_foundでspan_traceがキャプチャされる() {
      with_error_layer(|| {
         let span = tracing::info_span!("test_remove_workflow");
         let _enter = span.enter();

         let err = InfraError::not_found("Workflow", "wf-1");

         assert!(matches!(
            err.kind(),
            InfraErrorKind::NotFound { entity, id } if entity == "Workflow" && id == "wf-1"
         ));
         let trace_str = format!("{}", err.span_trace());
         assert!(
            trace_str.contains("test_remove_workflow"),
            "SpanTrace がスパン名を含むこと: {trace_str}",
         );
      });
   }

   #[test]
   fn test_invalid_inputでspan_traceがキャプチャされる() {
      with_error_layer(|| {
         let span = tracing::info_span!("test_filter");
         let _enter = span.enter();

         let err = InfraError::invalid_input("不正なフィルタ");

         assert!(matches!(
            err.kind(),
            InfraErrorKind::InvalidInput(msg) if msg == "不正なフィルタ"
         ));
         assert!(format!("{}", err.span_trace()).contains("test_filter"));
      });
   }

   #[test]
   fn test_クライアント起因かどうかの分類() {
      assert!(InfraError::not_found("Association", 1).is_client_fault());
      assert!(InfraError::invalid_input("x").is_client_fault());
      assert!(!InfraError::unexpected("x").is_client_fault());
   }

   #[test]
   fn test_displayがinfra_error_kindのメッセージを出力する() {
      let err = InfraError::unexpected("ロックが破損しています");

      assert_eq!(format!("{err}"), "予期しないエラー: ロックが破損しています");
   }
}
