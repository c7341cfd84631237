//! # Workflow API 設定
//!
//! 環境変数から Workflow API サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3100;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("{name} は有効なポート番号である必要があります: {value}")]
   InvalidPort { name: &'static str, value: String },
}

/// Workflow API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
}

impl ApiConfig {
   /// 環境変数から設定を読み込む
   ///
   /// | 変数名 | 既定値 |
   /// |--------|--------|
   /// | `WORKFLOW_API_HOST` | `0.0.0.0` |
   /// | `WORKFLOW_API_PORT` | `3100` |
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let host = lookup("WORKFLOW_API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
      let port = match lookup("WORKFLOW_API_PORT") {
         Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
            name: "WORKFLOW_API_PORT",
            value,
         })?,
         None => DEFAULT_PORT,
      };

      Ok(Self { host, port })
   }
}

#[cfg(test)]
mod tests {
   use std::collections::HashMap;

   use pretty_assertions::assert_eq;

   use super::*;

   fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
      let vars: HashMap<String, String> = vars
         .iter()
         .map(|(k, v)| (k.to_string(), v.to_string()))
         .collect();
      move |name| vars.get(name).cloned()
   }

   #[test]
   fn test_未設定なら既定値を使う() {
      let config = ApiConfig::from_lookup(lookup(&[])).unwrap();

      assert_eq!(
         config,
         ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 3100,
         }
      );
   }

   #[test]
   fn test_環境変数の値を読み込む() {
      let config = ApiConfig::from_lookup(lookup(&[
         ("WORKFLOW_API_HOST", "127.0.0.1"),
         ("WORKFLOW_API_PORT", "8080"),
      ]))
      .unwrap();

      assert_eq!(config.host, "127.0.0.1");
      assert_eq!(config.port, 8080);
   }

   #[test]
   fn test_不正なポート番号はエラー() {
      let result = ApiConfig::from_lookup(lookup(&[("WORKFLOW_API_PORT", "http")]));

      assert_eq!(
         result,
         Err(ConfigError::InvalidPort {
            name:  "WORKFLOW_API_PORT",
            value: "http".to_string(),
         })
      );
   }
}
