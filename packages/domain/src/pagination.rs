//! # ページング
//!
//! 一覧取得の limit / offset の既定値と、取得結果のページを表す。
//!
//! limit と offset は独立して補完しない。どちらか一方でも未指定なら
//! 両方とも既定値（limit = 10, offset = 0）に戻す。

/// limit の既定値
pub const DEFAULT_LIMIT: u32 = 10;
/// offset の既定値
pub const DEFAULT_OFFSET: u32 = 0;

/// 既定値を解決済みのページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
   pub limit:  u32,
   pub offset: u32,
}

impl Default for PageRequest {
   fn default() -> Self {
      Self {
         limit:  DEFAULT_LIMIT,
         offset: DEFAULT_OFFSET,
      }
   }
}

impl PageRequest {
   /// クエリパラメータからページ指定を解決する
   ///
   /// ```rust
   /// use idflow_domain::pagination::PageRequest;
   ///
   /// assert_eq!(PageRequest::resolve(Some(5), Some(20)).limit, 5);
   /// // 片方だけの指定は無視される
   /// assert_eq!(PageRequest::resolve(Some(5), None), PageRequest::default());
   /// ```
   pub fn resolve(limit: Option<u32>, offset: Option<u32>) -> Self {
      match (limit, offset) {
         (Some(limit), Some(offset)) => Self { limit, offset },
         _ => Self::default(),
      }
   }

   /// 1 始まりの開始位置
   pub fn start_index(&self) -> u64 {
      u64::from(self.offset) + 1
   }
}

/// 一覧取得結果の 1 ページ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
   pub items:         Vec<T>,
   /// limit / offset を無視した総件数
   pub total_results: u64,
   pub start_index:   u64,
}

impl<T> Page<T> {
   /// 現在のページに含まれる件数
   pub fn count(&self) -> u64 {
      self.items.len() as u64
   }

   /// 要素を変換した新しいページを返す
   pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
      Page {
         items:         self.items.into_iter().map(f).collect(),
         total_results: self.total_results,
         start_index:   self.start_index,
      }
   }
}
