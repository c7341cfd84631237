//! # ページネーション付きレスポンス
//!
//! オフセットベースのページネーションに対応した一覧レスポンス型。

use serde::{Deserialize, Serialize};

/// ページネーション付きレスポンス
///
/// 一覧のキー名はリソースごとに異なる（`workflows`, `workflowAssociations`）ため、
/// 一覧本体は `#[serde(flatten)]` で展開する型パラメータ `T` として受け取る。
///
/// ## JSON 形式
///
/// ```json
/// {
///   "totalResults": 42,
///   "startIndex": 11,
///   "count": 10,
///   "workflows": [...]
/// }
/// ```
///
/// - `totalResults`: limit / offset を無視した総件数
/// - `startIndex`: 1 始まりの開始位置（`offset + 1`）
/// - `count`: 現在のページに含まれる件数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
   pub total_results: u64,
   pub start_index:   u64,
   pub count:         u64,
   #[serde(flatten)]
   pub items:         T,
}
