//! HTTP関連の基本型とユーティリティ

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use crate::error::Error;

/// 既定のContent-Type
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";
/// 既定の文字コード
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// よく使うHTTPステータスコード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    MovedPermanently = 301,
    Found = 302,
    NotFound = 404,
    MethodNotAllowed = 405,
    PayloadTooLarge = 413,
    InternalServerError = 500,
}

impl StatusCode {
    /// u16の値を取得
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> u16 {
        status.as_u16()
    }
}

/// ステータスコードの理由句を取得（未知のコードは "Unknown"）
pub fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// HTTPメソッド
///
/// 既知の動詞以外は `Other` に大文字で保持する。`Other` はハンドラに
/// 登録できないため、ルートに一致すれば常に405になる。
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
    Other(String),
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => write!(f, "GET"),
            Method::POST => write!(f, "POST"),
            Method::PUT => write!(f, "PUT"),
            Method::DELETE => write!(f, "DELETE"),
            Method::PATCH => write!(f, "PATCH"),
            Method::HEAD => write!(f, "HEAD"),
            Method::OPTIONS => write!(f, "OPTIONS"),
            Method::Other(method) => write!(f, "{}", method),
        }
    }
}

impl Method {
    /// 文字列からMethodに変換
    pub fn from_str(method: &str) -> Option<Self> {
        match method.to_uppercase().as_str() {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "PATCH" => Some(Method::PATCH),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            _ => None,
        }
    }

    /// 文字列からMethodに変換（未知の動詞は `Other`）
    pub fn parse(method: &str) -> Self {
        Self::from_str(method).unwrap_or_else(|| Method::Other(method.to_uppercase()))
    }
}

/// HTTPリクエスト
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTPメソッド
    pub method: Method,
    /// リクエストパス（正規化済み）
    pub path: String,
    /// クエリパラメータ
    pub query_params: HashMap<String, String>,
    /// HTTPヘッダー
    pub headers: HashMap<String, String>,
    /// リクエストボディ
    pub body: Option<Vec<u8>>,
    /// 拡張機能が付与する属性
    attributes: Attributes,
}

impl Request {
    /// 新しいリクエストを作成
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_params: HashMap::new(),
            headers: HashMap::new(),
            body: None,
            attributes: Attributes::new(),
        }
    }

    /// GETリクエストを作成
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// HEADリクエストを作成
    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::HEAD, path)
    }

    /// POSTリクエストを作成
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUTリクエストを作成
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// DELETEリクエストを作成
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// クエリパラメータを追加
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// ヘッダーを追加
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// ボディを追加
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// ボディをUTF-8文字列として取得（不正なバイトは置換）
    pub fn text(&self) -> String {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }

    /// ボディをJSONとしてパース
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, Error> {
        match &self.body {
            Some(body) => serde_json::from_slice(body).map_err(|e| Error::Handler(e.to_string())),
            None => Err(Error::Handler("No request body".to_string())),
        }
    }

    /// 属性の不変参照を取得
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// 属性の可変参照を取得
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// HTTPレスポンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTPステータスコード
    pub status: u16,
    /// Content-Type（charsetを除く）
    pub content_type: Option<String>,
    /// 文字コード
    pub charset: Option<String>,
    /// ヘッダー（順序を保持し、同名の重複を許可）
    pub headerlist: Vec<(String, String)>,
    /// レスポンスボディ
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::Ok.as_u16(),
            content_type: Some(DEFAULT_CONTENT_TYPE.to_string()),
            charset: Some(DEFAULT_CHARSET.to_string()),
            headerlist: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    /// 指定ステータスの空レスポンス（text/html; charset=UTF-8）を作成
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// StatusCodeから新しいレスポンスを作成
    pub fn with_status(status: StatusCode) -> Self {
        Self::new(status.as_u16())
    }

    /// 200 OKレスポンスを作成
    pub fn ok() -> Self {
        Self::default()
    }

    /// 文字列ボディを持つ既定のレスポンスを作成
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok().with_body(body.into().into_bytes())
    }

    /// リダイレクトレスポンスを作成（permanentなら301、そうでなければ302）
    pub fn redirect(location: impl Into<String>, permanent: bool) -> Self {
        let status = if permanent {
            StatusCode::MovedPermanently
        } else {
            StatusCode::Found
        };
        Self::with_status(status).with_header("Location", location)
    }

    /// ステータスを変更
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// ヘッダーを追加（同名ヘッダーも追加される）
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headerlist.push((key.into(), value.into()));
        self
    }

    /// ボディを設定
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Content-Typeとcharsetを設定
    pub fn with_content_type(mut self, content_type: Option<String>, charset: Option<String>) -> Self {
        self.content_type = content_type;
        self.charset = charset;
        self
    }

    /// JSONをボディとして設定
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(value).map_err(|e| Error::Handler(e.to_string()))?;
        self.content_type = Some("application/json".to_string());
        self.charset = None;
        self.body = json;
        Ok(self)
    }

    /// 指定秒数後に期限切れとなるキャッシュヘッダーを設定
    pub fn cache_expires(self, seconds: i64) -> Self {
        let seconds = seconds.clamp(0, i64::from(i32::MAX));
        let expires = Utc::now() + Duration::seconds(seconds);
        self.with_header("Cache-Control", format!("max-age={}", seconds))
            .with_header("Expires", expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
    }

    /// ステータスラインの形式（"404 Not Found"）
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, reason_phrase(self.status))
    }

    /// Content-Typeヘッダー値（charset付き）
    pub fn content_type_header(&self) -> Option<String> {
        self.content_type.as_ref().map(|ct| match &self.charset {
            Some(charset) => format!("{}; charset={}", ct, charset),
            None => ct.clone(),
        })
    }

    /// 最初に一致するヘッダー値を取得（大文字小文字を区別しない）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headerlist
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// ボディをUTF-8文字列として取得（不正なバイトは置換）
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// ボディのみを空にしたレスポンスを返す
    pub fn without_body(mut self) -> Self {
        self.body.clear();
        self
    }
}
