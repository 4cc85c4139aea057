//! エラー型の定義

use thiserror::Error;

use crate::common::StatusCode;

/// クライアントに返すHTTPエラー（ステータスコードのみを保持）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Error {status}")]
pub struct HttpError {
    status: u16,
}

impl HttpError {
    /// 任意のステータスコードでHttpErrorを作成
    pub fn new(status: u16) -> Self {
        Self { status }
    }

    /// 404 Not Found
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound.as_u16())
    }

    /// 405 Method Not Allowed
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::MethodNotAllowed.as_u16())
    }

    /// 413 Payload Too Large
    pub fn payload_too_large() -> Self {
        Self::new(StatusCode::PayloadTooLarge.as_u16())
    }

    /// 500 Internal Server Error
    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::InternalServerError.as_u16())
    }

    /// ステータスコードを取得
    pub fn status(&self) -> u16 {
        self.status
    }

    /// ステータスクラス（先頭の桁）を取得。404 -> 4, 503 -> 5
    pub fn class(&self) -> u16 {
        let mut status = self.status;
        while status >= 10 {
            status /= 10;
        }
        status
    }
}

/// アプリケーションのエラー型
#[derive(Error, Debug)]
pub enum Error {
    /// ステータスを保持したままクライアントに返すエラー
    #[error(transparent)]
    Http(#[from] HttpError),

    /// URLパターンの不正
    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(String),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ハンドラー内部の想定外の失敗
    #[error("Handler error: {0}")]
    Handler(String),
}

impl Error {
    /// エラーからHTTPステータスコードを取得
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Http(e) => e.status(),
            Error::InvalidPattern(_) => 500,
            Error::ConfigurationError(_) => 500,
            Error::Io(_) => 500,
            Error::Handler(_) => 500,
        }
    }

    /// HttpErrorであればそのまま、それ以外は500に正規化する
    pub fn into_http_error(self) -> HttpError {
        match self {
            Error::Http(e) => e,
            _ => HttpError::internal_server_error(),
        }
    }

    /// HttpError由来かどうか
    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}
