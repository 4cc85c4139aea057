use std::collections::HashMap;
use std::fmt;

use log::warn;

use crate::common::Response;
use crate::error::HttpError;

/// エラー処理関数の型
pub type ErrorFn = Box<dyn Fn(&HttpError) -> Response + Send + Sync + 'static>;

/// HttpErrorをResponseに変換するエラーハンドラー
///
/// 解決順は (1) ステータス完全一致 (2) ステータスクラス（先頭の桁）
/// (3) 汎用。最初に見つかった1つだけが呼ばれる。
#[derive(Default)]
pub struct ErrorHandler {
    by_status: HashMap<u16, ErrorFn>,
    by_class: HashMap<u16, ErrorFn>,
    general: Option<ErrorFn>,
}

impl ErrorHandler {
    /// 新しいErrorHandlerを作成（汎用処理のみ）
    pub fn new() -> Self {
        Self::default()
    }

    /// 特定ステータス用の処理を登録（例: 404）
    pub fn on_status<F>(mut self, status: u16, handler: F) -> Self
    where
        F: Fn(&HttpError) -> Response + Send + Sync + 'static,
    {
        self.by_status.insert(status, Box::new(handler));
        self
    }

    /// ステータスクラス用の処理を登録（例: 5 で 5xx）
    ///
    /// クラスは先頭の1桁なので、10以上は登録せずに警告する。
    pub fn on_class<F>(mut self, class: u16, handler: F) -> Self
    where
        F: Fn(&HttpError) -> Response + Send + Sync + 'static,
    {
        if class >= 10 {
            warn!("Ignoring error handler for class {}: a class is a single leading digit", class);
            return self;
        }
        self.by_class.insert(class, Box::new(handler));
        self
    }

    /// 汎用処理を差し替え
    pub fn general<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HttpError) -> Response + Send + Sync + 'static,
    {
        self.general = Some(Box::new(handler));
        self
    }

    /// エラーを解決してResponseを返す
    pub fn resolve(&self, error: &HttpError) -> Response {
        if let Some(handler) = self.by_status.get(&error.status()) {
            return handler(error);
        }
        if let Some(handler) = self.by_class.get(&error.class()) {
            return handler(error);
        }
        match &self.general {
            Some(handler) => handler(error),
            None => Self::default_response(error),
        }
    }

    /// 既定の汎用処理: "Error <status>" をボディに持つレスポンス
    pub fn default_response(error: &HttpError) -> Response {
        Response::html(error.to_string()).status(error.status())
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut statuses: Vec<_> = self.by_status.keys().copied().collect();
        statuses.sort_unstable();
        let mut classes: Vec<_> = self.by_class.keys().map(|c| format!("{}xx", c)).collect();
        classes.sort();
        f.debug_struct("ErrorHandler")
            .field("statuses", &statuses)
            .field("classes", &classes)
            .field("general", &self.general.is_some())
            .finish()
    }
}
