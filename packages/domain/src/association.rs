//! # ワークフロー紐付け
//!
//! ワークフローと、それを起動するユーザー・ロール操作（イベント）の紐付けを表す。
//! 条件式を指定すると、操作が条件に合致した場合のみワークフローが起動する。
//!
//! ## 不変条件
//!
//! 紐付けは常に存在するワークフローと登録済みイベントを参照する。
//! どちらも作成時にユースケース層で検証する。

use std::{num::ParseIntError, str::FromStr};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::workflow::WorkflowId;

/// 紐付けの識別子
///
/// バックエンドが採番する整数値。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct AssociationId(i64);

impl AssociationId {
   pub fn new(value: i64) -> Self {
      Self(value)
   }

   pub fn as_i64(&self) -> i64 {
      self.0
   }
}

impl FromStr for AssociationId {
   type Err = ParseIntError;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      s.parse::<i64>().map(Self)
   }
}

/// ワークフローを起動する操作
///
/// 文字列表現は `ADD_USER` のような SCREAMING_SNAKE_CASE。
/// イベント名としてバックエンドの登録済みイベントと照合される。
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   Hash,
   Serialize,
   Deserialize,
   strum::Display,
   EnumString,
   EnumIter,
   IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
   AddUser,
   DeleteUser,
   UpdateRolesOfUsers,
   AddRole,
   DeleteRole,
   UpdateRoleName,
   UpdateUsersOfRole,
   DeleteUserClaims,
   UpdateUserClaims,
   SelfRegisterUser,
}

impl Operation {
   /// 画面表示用の名称
   pub fn friendly_name(self) -> &'static str {
      match self {
         Self::AddUser => "Add User",
         Self::DeleteUser => "Delete User",
         Self::UpdateRolesOfUsers => "Update Roles of a User",
         Self::AddRole => "Add Role",
         Self::DeleteRole => "Delete Role",
         Self::UpdateRoleName => "Update Role Name",
         Self::UpdateUsersOfRole => "Update Users of a Role",
         Self::DeleteUserClaims => "Delete User Claims",
         Self::UpdateUserClaims => "Update User Claims",
         Self::SelfRegisterUser => "User Self Registration",
      }
   }

   /// 操作対象の分類
   pub fn category(self) -> &'static str {
      match self {
         Self::AddRole | Self::DeleteRole | Self::UpdateRoleName | Self::UpdateUsersOfRole => {
            "ROLE"
         }
         _ => "USER",
      }
   }
}

/// バックエンドに登録されたイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowEvent {
   pub operation:     Operation,
   pub friendly_name: String,
   pub description:   String,
   pub category:      String,
}

impl From<Operation> for WorkflowEvent {
   fn from(operation: Operation) -> Self {
      Self {
         operation,
         friendly_name: operation.friendly_name().to_string(),
         description: format!("{} 操作で起動するワークフロー", operation.friendly_name()),
         category: operation.category().to_string(),
      }
   }
}

/// ワークフロー紐付け
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
   pub id:            AssociationId,
   pub name:          String,
   pub operation:     Operation,
   pub workflow_id:   WorkflowId,
   pub workflow_name: String,
   pub condition:     Option<String>,
   pub enabled:       bool,
}

/// 紐付けの作成内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssociation {
   pub name:        String,
   pub operation:   Operation,
   pub workflow_id: WorkflowId,
   pub condition:   Option<String>,
   pub enabled:     bool,
}

/// 紐付けの部分更新内容
///
/// `None` のフィールドは変更しない。
/// `enabled` だけは必須で、呼び出し側が現在値を解決してから渡す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationUpdate {
   pub id:          AssociationId,
   pub name:        Option<String>,
   pub operation:   Option<Operation>,
   pub workflow_id: Option<WorkflowId>,
   pub condition:   Option<String>,
   pub enabled:     bool,
}
