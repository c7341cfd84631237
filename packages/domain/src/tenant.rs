//! # テナント
//!
//! リクエストのデータ所属先（顧客組織）を表す識別子。
//!
//! テナントは暗黙のコンテキストとして伝播させず、一覧・件数取得などの
//! 呼び出しに明示的な引数として渡す。
//!
//! ```rust
//! use idflow_domain::tenant::TenantId;
//! use uuid::Uuid;
//!
//! let tenant_id = TenantId::from_uuid(Uuid::nil());
//! assert_eq!(tenant_id.to_string(), "00000000-0000-0000-0000-000000000000");
//! ```

define_uuid_id! {
   /// テナント（顧客組織）の一意識別子
   pub struct TenantId;
}
