use std::collections::HashMap;
use std::fmt;

use log::debug;
#[cfg(debug_assertions)]
use log::info;

use crate::common::{Method, Request, Response};
use crate::error::{Error, HttpError};

use super::builders::HandlerBuilder;
use super::pattern::Pattern;
use super::response::Reply;

/// 動詞メソッドの関数型（リクエストとキャプチャを受け取る）
pub type VerbFn = Box<dyn Fn(&Request, &[String]) -> Result<Reply, Error> + Send + Sync + 'static>;

/// 動詞の固定順（allowed_methodsの並び順）
const VERB_ORDER: [Method; 7] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// URLパターンと動詞メソッドの表を束ねたハンドラー
///
/// 構築後はパターンも動詞表も変更できない。HEADは常にGETから導出される。
pub struct Handler {
    pattern: Pattern,
    methods: HashMap<Method, VerbFn>,
}

impl Handler {
    /// テンプレートからビルダーを作成
    pub fn builder(template: impl Into<String>) -> HandlerBuilder {
        HandlerBuilder::new(template)
    }

    pub(crate) fn new(pattern: Pattern, methods: HashMap<Method, VerbFn>) -> Self {
        let handler = Self { pattern, methods };

        // 開発時はinfo、本番相当ではdebugに落とす
        #[cfg(debug_assertions)]
        info!(
            "Registering handler {:?} for {} with pattern: {}",
            handler.allowed_methods(),
            handler.pattern.template(),
            handler.pattern.as_regex_str()
        );
        #[cfg(not(debug_assertions))]
        debug!(
            "Registering handler {:?} for {} with pattern: {}",
            handler.allowed_methods(),
            handler.pattern.template(),
            handler.pattern.as_regex_str()
        );
        handler
    }

    /// コンパイル済みパターン
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// 指定メソッドを処理できるかどうか（HEADはGETの有無で判定）
    pub fn supports(&self, method: &Method) -> bool {
        self.methods.contains_key(&Self::lookup_verb(method))
    }

    /// 処理可能なメソッドの一覧
    pub fn allowed_methods(&self) -> Vec<Method> {
        VERB_ORDER
            .iter()
            .filter(|m| self.supports(m))
            .cloned()
            .collect()
    }

    /// リクエストを動詞メソッドにディスパッチし、Responseに正規化する
    ///
    /// 対応するメソッドがなければ405。HEADはGETで処理し、ボディのみ空にする。
    pub fn dispatch(&self, req: &Request, captures: &[String]) -> Result<Response, Error> {
        let verb = Self::lookup_verb(&req.method);
        let method = self.methods.get(&verb).ok_or_else(|| {
            debug!(
                "Method {} not allowed for {} (allowed: {:?})",
                req.method,
                self.pattern.template(),
                self.allowed_methods()
            );
            Error::from(HttpError::method_not_allowed())
        })?;

        let response = method(req, captures)?.into_response();

        if req.method == Method::HEAD {
            Ok(response.without_body())
        } else {
            Ok(response)
        }
    }

    fn lookup_verb(method: &Method) -> Method {
        match method {
            Method::HEAD => Method::GET,
            other => other.clone(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("pattern", &self.pattern)
            .field("methods", &self.allowed_methods())
            .finish()
    }
}
