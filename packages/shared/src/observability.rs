//! # Observability 基盤
//!
//! `LOG_FORMAT` と `RUST_LOG` からトレーシングを初期化する。

/// `LOG_FORMAT` 環境変数名
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// 1 イベント 1 行の JSON
   Json,
   #[default]
   Pretty,
}

impl LogFormat {
   /// `LOG_FORMAT` の値を解釈する（大文字小文字は区別する）
   fn from_value(value: &str) -> Option<Self> {
      match value {
         "json" => Some(Self::Json),
         "pretty" => Some(Self::Pretty),
         _ => None,
      }
   }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
   pub service_name:   &'static str,
   pub log_format:     LogFormat,
   /// 解釈できなかった `LOG_FORMAT` の値（初期化後に警告する）
   pub ignored_format: Option<String>,
}

impl TracingConfig {
   /// 環境変数から設定を読み取る
   pub fn from_env(service_name: &'static str) -> Self {
      Self::resolve(service_name, std::env::var(LOG_FORMAT_ENV).ok())
   }

   fn resolve(service_name: &'static str, raw_format: Option<String>) -> Self {
      let parsed = raw_format.as_deref().map(LogFormat::from_value);
      let ignored_format = match parsed {
         Some(None) => raw_format,
         _ => None,
      };

      Self {
         service_name,
         log_format: parsed.flatten().unwrap_or_default(),
         ignored_format,
      }
   }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` が未設定なら `"info,idflow=debug"`。
/// `tracing_error::ErrorLayer` を登録し、インフラ層のエラーに `SpanTrace` を残す。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
   use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| "info,idflow=debug".into());

   let fmt_layer = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_current_span(true)
         .with_span_list(false)
         .boxed(),
      LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
   };

   tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt_layer)
      .with(tracing_error::ErrorLayer::default())
      .init();

   if let Some(ignored) = &config.ignored_format {
      tracing::warn!(
         service = config.service_name,
         value = %ignored,
         "{LOG_FORMAT_ENV} を解釈できないため pretty で出力します"
      );
   }
   tracing::debug!(
      service = config.service_name,
      log_format = ?config.log_format,
      "トレーシングを初期化しました"
   );
}
