//! # パラメータストア変換
//!
//! 承認テンプレートの入れ子構造と、バックエンドが保存するフラットな
//! パラメータレコードを相互に変換する。副作用を持たない純粋関数のみを置く。
//!
//! ## エンコード規則
//!
//! 1 つの (ステップ, 参加条件) につき 1 レコードを生成する。
//!
//! | フィールド | 値 |
//! |-----------|-----|
//! | `param_name` | `"ApprovalSteps"` |
//! | `qualified_name` | `"step:<ステップ番号>:<エンティティ>"` |
//! | `param_value` | 値を `,` で連結した文字列 |
//! | `holder` | [`ParameterHolder::Template`] |
//!
//! デコード時は `holder` がテンプレート以外のレコードを無視し、
//! ステップ番号の昇順にまとめ直す。

use std::collections::BTreeMap;

use itertools::Itertools;
use strum::{Display, EnumString, IntoStaticStr};

use super::{StepOption, TemplateStep, WorkflowId};
use crate::DomainError;

/// 承認ステップを保存するレコードのパラメータ名
pub const APPROVAL_STEPS_PARAM_NAME: &str = "ApprovalSteps";

const STEP_PREFIX: &str = "step";
const QUALIFIED_NAME_SEPARATOR: char = ':';
const VALUE_SEPARATOR: &str = ",";

/// パラメータの所有者
///
/// テンプレート構成に属するレコードと、エンジン実装が独自に保持する
/// レコードを区別する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterHolder {
   /// テンプレート構成
   Template,
   /// エンジン実装が保持するパラメータ
   WorkflowImpl,
}

/// バックエンドに保存されるフラットなパラメータレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
   pub workflow_id:    WorkflowId,
   pub param_name:     String,
   pub param_value:    String,
   pub qualified_name: String,
   pub holder:         ParameterHolder,
}

/// 承認ステップをパラメータレコードに変換する
///
/// 出力順は入力のステップ順、ステップ内では参加条件の順。
pub fn encode_template_steps(workflow_id: WorkflowId, steps: &[TemplateStep]) -> Vec<Parameter> {
   steps
      .iter()
      .flat_map(|step| {
         step.options.iter().map(move |option| Parameter {
            workflow_id,
            param_name: APPROVAL_STEPS_PARAM_NAME.to_string(),
            param_value: option.values.iter().join(VALUE_SEPARATOR),
            qualified_name: format!(
               "{STEP_PREFIX}{QUALIFIED_NAME_SEPARATOR}{}{QUALIFIED_NAME_SEPARATOR}{}",
               step.step, option.entity
            ),
            holder: ParameterHolder::Template,
         })
      })
      .collect()
}

/// パラメータレコードから承認ステップを復元する
///
/// - `holder` が [`ParameterHolder::Template`] 以外のレコードは無視する
/// - エンティティは 2 つ目の `:` 以降すべて（`:` を含んでよい）
/// - 空の `param_value` は空の値リストになる
/// - ステップは番号の昇順、ステップ内の参加条件は入力順
///
/// # エラー
///
/// `qualified_name` が `step:<番号>:<エンティティ>` の形式でない場合は
/// [`DomainError::CorruptData`] を返す。
pub fn decode_template_steps(params: &[Parameter]) -> Result<Vec<TemplateStep>, DomainError> {
   let mut grouped: BTreeMap<u32, Vec<StepOption>> = BTreeMap::new();

   for param in params
      .iter()
      .filter(|p| p.holder == ParameterHolder::Template)
   {
      let (step, entity) = parse_qualified_name(&param.qualified_name)?;
      let values = if param.param_value.is_empty() {
         Vec::new()
      } else {
         param
            .param_value
            .split(VALUE_SEPARATOR)
            .map(str::to_string)
            .collect()
      };

      grouped.entry(step).or_default().push(StepOption {
         entity: entity.to_string(),
         values,
      });
   }

   Ok(grouped
      .into_iter()
      .map(|(step, options)| TemplateStep { step, options })
      .collect())
}

fn parse_qualified_name(qualified_name: &str) -> Result<(u32, &str), DomainError> {
   let corrupt = || DomainError::CorruptData(format!("不正な qualified name: {qualified_name}"));

   let mut segments = qualified_name.splitn(3, QUALIFIED_NAME_SEPARATOR);
   let (Some(STEP_PREFIX), Some(step), Some(entity)) =
      (segments.next(), segments.next(), segments.next())
   else {
      return Err(corrupt());
   };
   let step = step.parse::<u32>().map_err(|_| corrupt())?;

   Ok((step, entity))
}
