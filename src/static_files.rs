//! 開発用の静的ファイル配信（デバッグモードでのみ使用）

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};
use mime::Mime;

use crate::common::Response;

/// URLプレフィックスとディレクトリの対応
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFiles {
    url_prefix: String,
    dir: PathBuf,
}

impl StaticFiles {
    /// 新しいStaticFilesを作成
    pub fn new(url_prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            dir: dir.into(),
        }
    }

    /// リクエストパスをファイルパスに解決する
    ///
    /// プレフィックスに一致しない場合や、ディレクトリ外を指す可能性のある
    /// パス（`..`、絶対パス、NUL文字）はNone。
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let remainder = path.strip_prefix(&self.url_prefix)?;
        if remainder.is_empty() || remainder.contains('\0') {
            return None;
        }

        let relative = Path::new(remainder);
        let is_safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_safe {
            warn!("Rejected static path outside of static directory: {}", path);
            return None;
        }

        Some(self.dir.join(relative))
    }

    /// ファイルを読み込んでレスポンスを返す。読めなければNone（エラーにはしない）
    pub fn serve(&self, path: &str) -> Option<Response> {
        let file = self.resolve(path)?;
        if !file.is_file() {
            debug!("Static file not found: {}", file.display());
            return None;
        }

        match fs::read(&file) {
            Ok(bytes) => {
                let (content_type, charset) = guess_content_type(&file);
                debug!(
                    "Serving static file {} ({} bytes, {})",
                    file.display(),
                    bytes.len(),
                    content_type
                );
                Some(
                    Response::ok()
                        .with_content_type(Some(content_type), charset)
                        .with_body(bytes),
                )
            }
            Err(e) => {
                warn!("Failed to read static file {}: {}", file.display(), e);
                None
            }
        }
    }
}

/// 拡張子からContent-Typeとcharsetを推測する
///
/// text/* のみ UTF-8 を付与し、不明な拡張子は application/octet-stream。
pub fn guess_content_type(path: &Path) -> (String, Option<String>) {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let mime: Mime = match extension.as_str() {
        "html" | "htm" => mime::TEXT_HTML,
        "css" => mime::TEXT_CSS,
        "js" | "mjs" => mime::TEXT_JAVASCRIPT,
        "txt" => mime::TEXT_PLAIN,
        "csv" => mime::TEXT_CSV,
        "xml" => mime::TEXT_XML,
        "json" => mime::APPLICATION_JSON,
        "pdf" => mime::APPLICATION_PDF,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "woff" => mime::FONT_WOFF,
        "woff2" => mime::FONT_WOFF2,
        _ => mime::APPLICATION_OCTET_STREAM,
    };

    let charset = if mime.type_() == mime::TEXT {
        Some("UTF-8".to_string())
    } else {
        None
    };
    (mime.essence_str().to_string(), charset)
}
