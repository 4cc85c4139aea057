//! 共通の抽象化レイヤーとトレイト定義

pub mod attributes;
pub mod http;
pub mod traits;
pub mod utils;

pub use attributes::Attributes;
pub use http::{reason_phrase, Method, Request, Response, StatusCode};
pub use traits::Extension;
pub use utils::{get_max_body_size, parse_query_string, percent_decode};
