use std::collections::HashMap;

use log::warn;

use crate::common::{Method, Request};
use crate::error::Error;

use super::core::{Handler, VerbFn};
use super::pattern::Pattern;
use super::response::IntoReply;

/// Handlerを組み立てるビルダー
///
/// ```ignore
/// let handler = url("/arg/_/")
///     .get(|_req, args| Ok(format!("get {}", args[0])))
///     .build()?;
/// ```
pub struct HandlerBuilder {
    template: String,
    methods: HashMap<Method, VerbFn>,
}

impl HandlerBuilder {
    /// 新しいHandlerBuilderを作成
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            methods: HashMap::new(),
        }
    }

    /// 任意の動詞にメソッドを登録（同じ動詞は後勝ち）
    pub fn on<F, R>(mut self, method: Method, handler: F) -> Self
    where
        F: Fn(&Request, &[String]) -> Result<R, Error> + Send + Sync + 'static,
        R: IntoReply,
    {
        if method == Method::HEAD {
            warn!(
                "HEAD is always derived from GET; ignoring explicit HEAD method for {}",
                self.template
            );
            return self;
        }
        if let Method::Other(verb) = &method {
            warn!("Unsupported verb {} ignored for {}", verb, self.template);
            return self;
        }
        let verb_fn: VerbFn = Box::new(move |req, captures| handler(req, captures).map(IntoReply::into_reply));
        self.methods.insert(method, verb_fn);
        self
    }

    /// GETメソッドを登録
    pub fn get<F, R>(self, handler: F) -> Self
    where
        F: Fn(&Request, &[String]) -> Result<R, Error> + Send + Sync + 'static,
        R: IntoReply,
    {
        self.on(Method::GET, handler)
    }

    /// POSTメソッドを登録
    pub fn post<F, R>(self, handler: F) -> Self
    where
        F: Fn(&Request, &[String]) -> Result<R, Error> + Send + Sync + 'static,
        R: IntoReply,
    {
        self.on(Method::POST, handler)
    }

    /// PUTメソッドを登録
    pub fn put<F, R>(self, handler: F) -> Self
    where
        F: Fn(&Request, &[String]) -> Result<R, Error> + Send + Sync + 'static,
        R: IntoReply,
    {
        self.on(Method::PUT, handler)
    }

    /// DELETEメソッドを登録
    pub fn delete<F, R>(self, handler: F) -> Self
    where
        F: Fn(&Request, &[String]) -> Result<R, Error> + Send + Sync + 'static,
        R: IntoReply,
    {
        self.on(Method::DELETE, handler)
    }

    /// PATCHメソッドを登録
    pub fn patch<F, R>(self, handler: F) -> Self
    where
        F: Fn(&Request, &[String]) -> Result<R, Error> + Send + Sync + 'static,
        R: IntoReply,
    {
        self.on(Method::PATCH, handler)
    }

    /// OPTIONSメソッドを登録
    pub fn options<F, R>(self, handler: F) -> Self
    where
        F: Fn(&Request, &[String]) -> Result<R, Error> + Send + Sync + 'static,
        R: IntoReply,
    {
        self.on(Method::OPTIONS, handler)
    }

    /// パターンをコンパイルしてHandlerを構築
    pub fn build(self) -> Result<Handler, Error> {
        let pattern = Pattern::compile(self.template)?;
        Ok(Handler::new(pattern, self.methods))
    }
}

/// URLテンプレートからHandlerBuilderを作成
pub fn url(template: impl Into<String>) -> HandlerBuilder {
    HandlerBuilder::new(template)
}
