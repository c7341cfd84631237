//! # フィルタ式
//!
//! 一覧・件数取得で使う `<属性> <演算子> <値>` 形式のフィルタを解析・評価する。
//!
//! | 演算子 | 意味 |
//! |--------|------|
//! | `eq` | 完全一致 |
//! | `ne` | 不一致 |
//! | `sw` | 前方一致 |
//! | `ew` | 後方一致 |
//! | `co` | 部分一致 |
//!
//! 値は空白を含んでよい（3 つ目のトークン以降すべてを値とする）。
//!
//! ```rust
//! use idflow_infra::repository::filter::{FilterExpression, FilterOperator};
//!
//! let filter = FilterExpression::parse("name sw New Hire", &["name"]).unwrap();
//! assert_eq!(filter.operator(), FilterOperator::Sw);
//! assert!(filter.matches("New Hire Onboarding"));
//! ```

use idflow_domain::{association::Association, workflow::Workflow};
use strum::EnumString;

use crate::error::InfraError;

/// フィルタ演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FilterOperator {
   Eq,
   Ne,
   Sw,
   Ew,
   Co,
}

/// 解析済みのフィルタ式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
   attribute: String,
   operator:  FilterOperator,
   value:     String,
}

impl FilterExpression {
   /// フィルタ式を解析する
   ///
   /// `attributes` に含まれない属性、未知の演算子、値の欠落は
   /// クライアント入力エラーとなる。
   pub fn parse(expression: &str, attributes: &[&str]) -> Result<Self, InfraError> {
      let mut tokens = expression.trim().splitn(3, ' ');
      let (Some(attribute), Some(operator), Some(value)) =
         (tokens.next(), tokens.next(), tokens.next())
      else {
         return Err(InfraError::invalid_input(format!(
            "フィルタ式の形式が不正です: {expression}"
         )));
      };

      if !attributes.contains(&attribute) {
         return Err(InfraError::invalid_input(format!(
            "フィルタに指定できない属性です: {attribute}"
         )));
      }
      let operator = operator.parse::<FilterOperator>().map_err(|_| {
         InfraError::invalid_input(format!("未対応のフィルタ演算子です: {operator}"))
      })?;

      Ok(Self {
         attribute: attribute.to_string(),
         operator,
         value: value.to_string(),
      })
   }

   pub fn attribute(&self) -> &str {
      &self.attribute
   }

   pub fn operator(&self) -> FilterOperator {
      self.operator
   }

   pub fn value(&self) -> &str {
      &self.value
   }

   /// 属性値がフィルタ条件を満たすか
   pub fn matches(&self, actual: &str) -> bool {
      let expected = self.value.as_str();
      match self.operator {
         FilterOperator::Eq => actual == expected,
         FilterOperator::Ne => actual != expected,
         FilterOperator::Sw => actual.starts_with(expected),
         FilterOperator::Ew => actual.ends_with(expected),
         FilterOperator::Co => actual.contains(expected),
      }
   }
}

/// フィルタ可能なエンティティ
pub trait Filterable {
   /// フィルタに指定できる属性名
   const ATTRIBUTES: &'static [&'static str];

   /// 属性値を取得する
   fn attribute(&self, name: &str) -> Option<&str>;
}

impl Filterable for Workflow {
   const ATTRIBUTES: &'static [&'static str] = &["name", "engine", "template"];

   fn attribute(&self, name: &str) -> Option<&str> {
      match name {
         "name" => Some(self.name()),
         "engine" => Some(self.engine_id()),
         "template" => Some(self.template_id()),
         _ => None,
      }
   }
}

impl Filterable for Association {
   const ATTRIBUTES: &'static [&'static str] = &["name", "operation", "workflowName"];

   fn attribute(&self, name: &str) -> Option<&str> {
      match name {
         "name" => Some(&self.name),
         "operation" => {
            let operation: &'static str = self.operation.into();
            Some(operation)
         }
         "workflowName" => Some(&self.workflow_name),
         _ => None,
      }
   }
}

/// 省略可能なフィルタ式を対象エンティティ向けに解析する
///
/// 空白のみの式はフィルタなしとして扱う。
pub fn parse_filter<T: Filterable>(
   filter: Option<&str>,
) -> Result<Option<FilterExpression>, InfraError> {
   filter
      .filter(|f| !f.trim().is_empty())
      .map(|f| FilterExpression::parse(f, T::ATTRIBUTES))
      .transpose()
}

/// エンティティがフィルタ条件を満たすか（フィルタなしは常に真）
pub fn satisfies<T: Filterable>(item: &T, filter: Option<&FilterExpression>) -> bool {
   filter.is_none_or(|f| item.attribute(f.attribute()).is_some_and(|v| f.matches(v)))
}
