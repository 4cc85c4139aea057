//! Pathwright: 最小構成のリクエストルーティング／ディスパッチエンジン
//!
//! URLパターンによるルート照合、HTTPメソッドごとのディスパッチ、
//! 拡張機能による前後処理、段階的なエラーハンドラー解決を提供する。
//! 1リクエストの処理は同期的に完結する。

pub mod common;
pub mod config;
pub mod error;
pub mod handler;
pub mod static_files;

#[cfg(feature = "server")]
pub mod server;

pub use common::*;
pub use config::AppConfig;
pub use error::*;
pub use handler::*;
pub use static_files::StaticFiles;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use log::{debug, error, info, warn};

/// アプリケーションを構築するためのビルダー
#[derive(Default)]
pub struct ApplicationBuilder {
    handlers: Vec<Handler>,
    extensions: Vec<Box<dyn Extension>>,
    error_handler: ErrorHandler,
    config: AppConfig,
}

impl ApplicationBuilder {
    /// 新しいApplicationBuilderインスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ハンドラを追加（登録順が照合順になる）
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// 複数のハンドラをまとめて追加
    pub fn handlers(mut self, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    /// 拡張機能を追加（登録順にフックが呼ばれる）
    pub fn extension<E>(mut self, extension: E) -> Self
    where
        E: Extension + 'static,
    {
        self.extensions.push(Box::new(extension));
        self
    }

    /// エラーハンドラーを設定
    pub fn error_handler(mut self, error_handler: ErrorHandler) -> Self {
        self.error_handler = error_handler;
        self
    }

    /// 設定をまとめて適用
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// デバッグモードを設定
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// 末尾スラッシュ補完を301にするかどうか
    pub fn permanent_redirect(mut self, permanent: bool) -> Self {
        self.config.permanent_redirect = permanent;
        self
    }

    /// 静的ファイルのURLプレフィックスとディレクトリを設定
    pub fn static_files(mut self, url_prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.config.static_url = Some(url_prefix.into());
        self.config.static_dir = Some(dir.into());
        self
    }

    /// アプリケーションをビルドして返却
    ///
    /// ルート表を構築した後、拡張機能の `setup` を登録順に一度ずつ呼ぶ。
    pub fn build(self) -> Application {
        let static_files = match (&self.config.static_url, &self.config.static_dir) {
            (Some(url), Some(dir)) if self.config.static_enabled() => {
                Some(StaticFiles::new(url.clone(), dir.clone()))
            }
            _ => None,
        };

        let mut app = Application {
            routes: Vec::with_capacity(self.handlers.len()),
            extensions: Vec::new(),
            error_handler: self.error_handler,
            config: self.config,
            static_files,
            attributes: Attributes::new(),
        };
        for handler in self.handlers {
            app.add_handler(handler);
        }

        let extensions = self.extensions;
        for extension in &extensions {
            extension.setup(&mut app);
        }
        app.extensions = extensions;

        info!(
            "Application built with {} routes and {} extensions (debug: {})",
            app.routes.len(),
            app.extensions.len(),
            app.config.debug
        );
        app
    }
}

/// リクエストを処理するアプリケーション
///
/// 構築後は `&self` だけでリクエストを処理できるため、`Arc` で共有して
/// 複数スレッドから同時に呼び出せる。ルート追加などの変更は起動時に行う。
pub struct Application {
    routes: Vec<Handler>,
    extensions: Vec<Box<dyn Extension>>,
    error_handler: ErrorHandler,
    config: AppConfig,
    static_files: Option<StaticFiles>,
    attributes: Attributes,
}

impl Application {
    /// 新しいApplicationBuilderインスタンスを作成
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// ハンドラをルート表に追加
    ///
    /// 同じテンプレートが既にあれば、元の位置のまま置き換える。
    pub fn add_handler(&mut self, handler: Handler) {
        let template = handler.pattern().template();
        match self
            .routes
            .iter_mut()
            .find(|existing| existing.pattern().template() == template)
        {
            Some(existing) => {
                warn!("Replacing handler for pattern {}", template);
                *existing = handler;
            }
            None => self.routes.push(handler),
        }
    }

    /// 照合順のテンプレート一覧
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|h| h.pattern().template())
    }

    /// 設定を取得
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    /// 拡張機能が付与した属性
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// 指定されたパスに最初にマッチするハンドラとキャプチャを取得
    pub fn find_handler(&self, path: &str) -> Option<(&Handler, Vec<String>)> {
        self.routes
            .iter()
            .find_map(|handler| handler.pattern().captures(path).map(|captures| (handler, captures)))
    }

    /// リクエストを処理してResponseを返す
    ///
    /// ルーティング中のあらゆる失敗（panicを含む）はここで一度だけ捕捉し、
    /// エラーハンドラーでResponseに変換する。
    pub fn handle_request(&self, req: &mut Request) -> Response {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.route(req)));

        let error = match outcome {
            Ok(Ok(response)) => return response,
            Ok(Err(e)) => e,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Panic while handling {} {}: {}", req.method, req.path, message);
                Error::Handler(message)
            }
        };

        self.handle_error(req, error)
    }

    /// ルーティングを経ずにエラーをResponseへ変換する
    ///
    /// ゲートウェイ側で検出したエラー（ボディサイズ超過など）もエラーハンドラーを通す。
    pub fn respond_error(&self, req: &Request, error: HttpError) -> Response {
        self.handle_error(req, error.into())
    }

    fn route(&self, req: &mut Request) -> Result<Response, Error> {
        // 1. 完全一致
        if let Some((handler, captures)) = self.find_handler(&req.path) {
            for extension in &self.extensions {
                extension.before(req)?;
            }
            let mut response = handler.dispatch(req, &captures)?;
            for extension in &self.extensions {
                extension.after(req, &mut response)?;
            }
            return Ok(response);
        }

        // 2. 末尾スラッシュ補完
        let slashed = format!("{}/", req.path);
        if self.routes.iter().any(|handler| handler.pattern().is_match(&slashed)) {
            debug!("Redirecting {} to {}", req.path, slashed);
            return Ok(Response::redirect(slashed, self.config.permanent_redirect));
        }

        // 3. 静的ファイル（デバッグ時のみ）
        if let Some(static_files) = &self.static_files {
            if let Some(response) = static_files.serve(&req.path) {
                return Ok(response);
            }
        }

        // 4. 見つからない
        Err(HttpError::not_found().into())
    }

    fn handle_error(&self, req: &Request, error: Error) -> Response {
        if error.is_http() {
            debug!("{} {} -> {}", req.method, req.path, error);
        } else {
            error!("Error processing request {} {}: {}", req.method, req.path, error);
            if self.config.debug {
                error!("Error detail: {:?}", error);
            }
        }

        let http_error = error.into_http_error();
        match panic::catch_unwind(AssertUnwindSafe(|| self.error_handler.resolve(&http_error))) {
            Ok(response) => response,
            Err(payload) => {
                error!(
                    "Error handler panicked for status {}: {}",
                    http_error.status(),
                    panic_message(payload.as_ref())
                );
                ErrorHandler::default_response(&http_error)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
