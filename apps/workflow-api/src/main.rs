//! # Workflow API サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `WORKFLOW_API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `WORKFLOW_API_PORT` | No | ポート番号（デフォルト: `3100`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,idflow=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p idflow-workflow-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use idflow_infra::repository::{
   InMemoryWorkflowManagementRepository,
   WorkflowManagementRepository,
};
use idflow_shared::observability::{TracingConfig, init_tracing};
use idflow_workflow_api::{config::ApiConfig, router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   init_tracing(&TracingConfig::from_env("workflow-api"));

   let config = ApiConfig::from_env()?;
   tracing::info!(
      "Workflow API サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   // バックエンドは全操作イベントを登録済みのインメモリ実装
   let repository: Arc<dyn WorkflowManagementRepository> =
      Arc::new(InMemoryWorkflowManagementRepository::new());

   let app = router(repository).layer(TraceLayer::new_for_http());

   let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Workflow API サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
