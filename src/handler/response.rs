use crate::common::Response;

/// 動詞メソッドの戻り値（文字列ボディ、または完全なResponse）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 既定のレスポンス（200, text/html, UTF-8）に包まれる文字列
    Text(String),
    /// そのまま返すレスポンス
    Response(Response),
}

impl Reply {
    /// Responseに正規化
    pub fn into_response(self) -> Response {
        match self {
            Reply::Text(body) => Response::html(body),
            Reply::Response(response) => response,
        }
    }
}

/// Replyへの変換トレイト
pub trait IntoReply {
    /// 自身をReplyに変換
    fn into_reply(self) -> Reply;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Reply {
        self
    }
}

impl IntoReply for String {
    fn into_reply(self) -> Reply {
        Reply::Text(self)
    }
}

impl IntoReply for &str {
    fn into_reply(self) -> Reply {
        Reply::Text(self.to_string())
    }
}

impl IntoReply for Response {
    fn into_reply(self) -> Reply {
        Reply::Response(self)
    }
}
