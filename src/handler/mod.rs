//! ハンドラーの実装（分割モジュール）

pub mod builders;
pub mod core;
pub mod error_handler;
pub mod pattern;
pub mod response;

pub use builders::{url, HandlerBuilder};
pub use core::{Handler, VerbFn};
pub use error_handler::{ErrorFn, ErrorHandler};
pub use pattern::{Pattern, PLACEHOLDER};
pub use response::{IntoReply, Reply};
