//! # Workflow API エラー定義
//!
//! ユースケースで発生した失敗を、共通のエラーレスポンス
//! （[`ErrorResponse`]: `code` / `message` / `description`）と HTTP ステータスに変換する。
//!
//! ## エラー種別と HTTP ステータスの対応
//!
//! | 種別 | HTTP ステータス | 発生箇所 |
//! |------|----------------|----------|
//! | `Validation` | 400 Bad Request | 入力検証、参照先の不在 |
//! | `NotFound` | 404 Not Found | ユースケースでの明示的な存在確認 |
//! | `ClientFault` | 400 Bad Request | バックエンドがクライアント起因と判定した失敗 |
//! | `ServerFault` | 500 Internal Server Error | それ以外のバックエンドの失敗 |

use std::fmt::Display;

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use idflow_infra::InfraError;
use idflow_shared::ErrorResponse;
use thiserror::Error;

/// エラーメッセージカタログ
///
/// 各エントリは安定したコード、メッセージ、`{id}` を含みうる説明テンプレートを持つ。
/// クライアント起因は `WFM-600xx`、サーバー起因は `WFM-650xx`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMessage {
   // ===== クライアント起因 =====
   ClientErrorAddingWorkflow,
   ClientErrorUpdatingWorkflow,
   ClientErrorListingWorkflows,
   WorkflowNotFound,
   ClientErrorAddingAssociation,
   ClientErrorUpdatingAssociation,
   ClientErrorListingAssociations,
   AssociationNotFound,
   InvalidRequest,

   // ===== サーバー起因 =====
   ErrorAddingWorkflow,
   ErrorUpdatingWorkflow,
   ErrorRetrievingWorkflow,
   ErrorListingWorkflows,
   ErrorRemovingWorkflow,
   ErrorAddingAssociation,
   ErrorRetrievingAssociation,
   ErrorListingAssociations,
   ErrorUpdatingAssociation,
   ErrorRemovingAssociation,
}

impl ErrorMessage {
   /// 安定したエラーコード
   pub fn code(self) -> &'static str {
      match self {
         Self::ClientErrorAddingWorkflow => "WFM-60001",
         Self::ClientErrorUpdatingWorkflow => "WFM-60002",
         Self::ClientErrorListingWorkflows => "WFM-60003",
         Self::WorkflowNotFound => "WFM-60004",
         Self::ClientErrorAddingAssociation => "WFM-60005",
         Self::ClientErrorUpdatingAssociation => "WFM-60006",
         Self::ClientErrorListingAssociations => "WFM-60007",
         Self::AssociationNotFound => "WFM-60008",
         Self::InvalidRequest => "WFM-60009",
         Self::ErrorAddingWorkflow => "WFM-65001",
         Self::ErrorUpdatingWorkflow => "WFM-65002",
         Self::ErrorRetrievingWorkflow => "WFM-65003",
         Self::ErrorListingWorkflows => "WFM-65004",
         Self::ErrorRemovingWorkflow => "WFM-65005",
         Self::ErrorAddingAssociation => "WFM-65006",
         Self::ErrorRetrievingAssociation => "WFM-65007",
         Self::ErrorListingAssociations => "WFM-65008",
         Self::ErrorUpdatingAssociation => "WFM-65009",
         Self::ErrorRemovingAssociation => "WFM-65010",
      }
   }

   pub fn message(self) -> &'static str {
      match self {
         Self::ClientErrorAddingWorkflow => "ワークフローを追加できません",
         Self::ClientErrorUpdatingWorkflow => "ワークフローを更新できません",
         Self::ClientErrorListingWorkflows => "ワークフロー一覧を取得できません",
         Self::WorkflowNotFound => "ワークフローが見つかりません",
         Self::ClientErrorAddingAssociation => "ワークフロー紐付けを追加できません",
         Self::ClientErrorUpdatingAssociation => "ワークフロー紐付けを更新できません",
         Self::ClientErrorListingAssociations => "ワークフロー紐付け一覧を取得できません",
         Self::AssociationNotFound => "ワークフロー紐付けが見つかりません",
         Self::InvalidRequest => "不正なリクエストです",
         Self::ErrorAddingWorkflow => "ワークフローの追加に失敗しました",
         Self::ErrorUpdatingWorkflow => "ワークフローの更新に失敗しました",
         Self::ErrorRetrievingWorkflow => "ワークフローの取得に失敗しました",
         Self::ErrorListingWorkflows => "ワークフロー一覧の取得に失敗しました",
         Self::ErrorRemovingWorkflow => "ワークフローの削除に失敗しました",
         Self::ErrorAddingAssociation => "ワークフロー紐付けの追加に失敗しました",
         Self::ErrorRetrievingAssociation => "ワークフロー紐付けの取得に失敗しました",
         Self::ErrorListingAssociations => "ワークフロー紐付け一覧の取得に失敗しました",
         Self::ErrorUpdatingAssociation => "ワークフロー紐付けの更新に失敗しました",
         Self::ErrorRemovingAssociation => "ワークフロー紐付けの削除に失敗しました",
      }
   }

   /// 説明テンプレート（`{id}` は対象 ID に置換される）
   pub fn description_template(self) -> &'static str {
      match self {
         Self::ClientErrorAddingWorkflow => "ワークフローの追加リクエストが不正です",
         Self::ClientErrorUpdatingWorkflow => "ID {id} のワークフローの更新リクエストが不正です",
         Self::ClientErrorListingWorkflows => "ワークフロー一覧の取得条件が不正です",
         Self::WorkflowNotFound => "ID {id} のワークフローは存在しません",
         Self::ClientErrorAddingAssociation => "ワークフロー紐付けの追加リクエストが不正です",
         Self::ClientErrorUpdatingAssociation => {
            "ID {id} のワークフロー紐付けの更新リクエストが不正です"
         }
         Self::ClientErrorListingAssociations => "ワークフロー紐付け一覧の取得条件が不正です",
         Self::AssociationNotFound => "ID {id} のワークフロー紐付けは存在しません",
         Self::InvalidRequest => "リクエストの形式が不正です",
         Self::ErrorAddingWorkflow => "ワークフローの追加中にサーバーエラーが発生しました",
         Self::ErrorUpdatingWorkflow => "ID {id} のワークフローの更新中にサーバーエラーが発生しました",
         Self::ErrorRetrievingWorkflow => {
            "ID {id} のワークフローの取得中にサーバーエラーが発生しました"
         }
         Self::ErrorListingWorkflows => "ワークフロー一覧の取得中にサーバーエラーが発生しました",
         Self::ErrorRemovingWorkflow => "ID {id} のワークフローの削除中にサーバーエラーが発生しました",
         Self::ErrorAddingAssociation => {
            "ワークフロー紐付けの追加中にサーバーエラーが発生しました"
         }
         Self::ErrorRetrievingAssociation => {
            "ID {id} のワークフロー紐付けの取得中にサーバーエラーが発生しました"
         }
         Self::ErrorListingAssociations => {
            "ワークフロー紐付け一覧の取得中にサーバーエラーが発生しました"
         }
         Self::ErrorUpdatingAssociation => {
            "ID {id} のワークフロー紐付けの更新中にサーバーエラーが発生しました"
         }
         Self::ErrorRemovingAssociation => {
            "ID {id} のワークフロー紐付けの削除中にサーバーエラーが発生しました"
         }
      }
   }

   /// 説明テンプレートに ID を埋め込む（ID がなければ空文字）
   pub fn description(self, id: Option<&str>) -> String {
      self.description_template().replace("{id}", id.unwrap_or_default())
   }
}

/// エラー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
   Validation,
   NotFound,
   ClientFault,
   ServerFault,
}

impl ErrorKind {
   pub fn status(self) -> StatusCode {
      match self {
         Self::Validation | Self::ClientFault => StatusCode::BAD_REQUEST,
         Self::NotFound => StatusCode::NOT_FOUND,
         Self::ServerFault => StatusCode::INTERNAL_SERVER_ERROR,
      }
   }
}

/// Workflow API で発生するエラー
#[derive(Debug, Error)]
#[error("{}: {}", .response.code, .response.description)]
pub struct ApiError {
   kind:     ErrorKind,
   response: ErrorResponse,
}

impl ApiError {
   fn new(kind: ErrorKind, message: ErrorMessage, description: String) -> Self {
      Self {
         kind,
         response: ErrorResponse::new(message.code(), message.message(), description),
      }
   }

   /// 明示的な存在確認で対象が見つからなかった
   pub fn not_found(message: ErrorMessage, id: impl Display) -> Self {
      let id = id.to_string();
      Self::new(ErrorKind::NotFound, message, message.description(Some(&id)))
   }

   /// 入力検証の失敗（`reason` をそのまま説明にする）
   pub fn validation(message: ErrorMessage, reason: impl Into<String>) -> Self {
      Self::new(ErrorKind::Validation, message, reason.into())
   }

   /// サーバー起因の失敗
   ///
   /// 原因をログに出力し、説明にはテンプレートを使う（内部情報は返さない）。
   pub fn server_fault(
      message: ErrorMessage,
      id: Option<&str>,
      source: &(dyn std::error::Error + 'static),
   ) -> Self {
      tracing::error!(
         error.category = "domain",
         error.kind = message.code(),
         "{}: {}",
         message.message(),
         source
      );
      Self::new(ErrorKind::ServerFault, message, message.description(id))
   }

   /// バックエンドの失敗を原因の所在で振り分ける
   ///
   /// - クライアント起因: `client` メッセージ、説明はバックエンドのエラーメッセージ
   /// - サーバー起因: `server` メッセージ、説明はテンプレート。SpanTrace 付きでログ出力する
   pub fn from_infra(
      client: ErrorMessage,
      server: ErrorMessage,
      id: Option<&str>,
      error: InfraError,
   ) -> Self {
      if error.is_client_fault() {
         tracing::debug!(error.kind = client.code(), "{}: {}", client.message(), error);
         return Self::new(ErrorKind::ClientFault, client, error.to_string());
      }

      tracing::error!(
         error.category = "infrastructure",
         error.kind = server.code(),
         span_trace = %error.span_trace(),
         "{}: {}",
         server.message(),
         error
      );
      Self::new(ErrorKind::ServerFault, server, server.description(id))
   }

   pub fn kind(&self) -> ErrorKind {
      self.kind
   }

   pub fn response(&self) -> &ErrorResponse {
      &self.response
   }

   pub fn status(&self) -> StatusCode {
      self.kind.status()
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      (self.kind.status(), Json(self.response)).into_response()
   }
}
