//! # リクエスト抽出
//!
//! ハンドラの引数として使う axum エクストラクタ。
//! 抽出に失敗した場合は、すべて共通のエラーレスポンス（400）に変換する。
//!
//! - [`Tenant`]: `X-Tenant-ID` ヘッダーからテナント ID を取り出す
//! - [`ValidatedJson`]: JSON ボディをデシリアライズし `validator` で検証する
//! - [`ApiQuery`]: クエリ文字列をデシリアライズする（検証ルールは持たない）

use axum::{
   Json,
   extract::{FromRequest, FromRequestParts, Query, Request},
   http::{HeaderMap, request::Parts},
};
use idflow_domain::tenant::TenantId;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{ApiError, ErrorMessage};

/// テナント ID ヘッダー名
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// リクエストのテナント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenant(pub TenantId);

impl<S> FromRequestParts<S> for Tenant
where
   S: Send + Sync,
{
   type Rejection = ApiError;

   async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
      extract_tenant_id(&parts.headers).map(Tenant)
   }
}

fn extract_tenant_id(headers: &HeaderMap) -> Result<TenantId, ApiError> {
   let value = headers
      .get(TENANT_HEADER)
      .and_then(|v| v.to_str().ok())
      .ok_or_else(|| {
         ApiError::validation(
            ErrorMessage::InvalidRequest,
            format!("{TENANT_HEADER} ヘッダーが必要です"),
         )
      })?;

   value.parse::<TenantId>().map_err(|_| {
      ApiError::validation(
         ErrorMessage::InvalidRequest,
         format!("{TENANT_HEADER} ヘッダーの値が不正です: {value}"),
      )
   })
}

/// 検証付き JSON ボディ
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
   T: DeserializeOwned + Validate,
   S: Send + Sync,
{
   type Rejection = ApiError;

   async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
      let Json(value) = Json::<T>::from_request(req, state)
         .await
         .map_err(|rejection| {
            ApiError::validation(ErrorMessage::InvalidRequest, rejection.body_text())
         })?;

      value
         .validate()
         .map_err(|e| ApiError::validation(ErrorMessage::InvalidRequest, e.to_string()))?;

      Ok(Self(value))
   }
}

/// クエリ文字列
///
/// `Query` の拒否レスポンスを共通のエラーレスポンスに置き換える。
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
   T: DeserializeOwned,
   S: Send + Sync,
{
   type Rejection = ApiError;

   async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
      let Query(value) = Query::<T>::from_request_parts(parts, state)
         .await
         .map_err(|rejection| {
            ApiError::validation(ErrorMessage::InvalidRequest, rejection.body_text())
         })?;

      Ok(Self(value))
   }
}
