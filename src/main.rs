//! 開発用サーバーのエントリポイント
//!
//! 環境変数（`PORT`, `PATHWRIGHT_DEBUG`, `PATHWRIGHT_STATIC_URL` 等）で設定し、
//! サンプルのハンドラを登録したアプリケーションを起動する。

use env_logger::Env;
use log::{error, info};
use serde::{Deserialize, Serialize};

use pathwright::{url, AppConfig, Application, Error, ErrorHandler, HttpError, Response};

#[derive(Serialize, Deserialize)]
struct Health {
    status: String,
    version: String,
}

fn build_app(config: AppConfig) -> Result<Application, Error> {
    let app = Application::builder()
        .config(config)
        .handler(url("/").get(|_req, _args| Ok("<h1>pathwright</h1>")).build()?)
        .handler(
            url("/health/")
                .get(|_req, _args| {
                    Response::ok().json(&Health {
                        status: "ok".to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    })
                })
                .build()?,
        )
        .handler(
            url("/metal/_/food/_/")
                .get(|_req, args| Ok(format!("{} {}", args[0], args[1])))
                .build()?,
        )
        .handler(
            url("/teapot/")
                .get(|_req, _args| -> Result<String, Error> { Err(HttpError::new(418).into()) })
                .build()?,
        )
        .error_handler(
            ErrorHandler::new()
                .on_status(404, |e| Response::html("<h1>Not Found</h1>").status(e.status()))
                .on_class(5, |e| Response::html("<h1>Server Error</h1>").status(e.status())),
        )
        .build();
    Ok(app)
}

#[tokio::main]
async fn main() {
    // ログ設定（RUST_LOG未指定時はinfo）
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let app = match build_app(config.clone()) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to build application: {}", e);
            std::process::exit(1);
        }
    };

    info!("Routes: {:?}", app.routes().collect::<Vec<_>>());

    #[cfg(feature = "server")]
    {
        if let Err(e) = pathwright::server::run_server(app, &config.host, config.port).await {
            error!("Server error: {}", e);
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        println!("Please enable the 'server' feature to run the development server.");
        println!("Example: cargo run --features server");
        std::process::exit(1);
    }
}
