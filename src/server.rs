//! actix-webを使ったHTTPサーバーアダプター（開発用サーバー）

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::header::HeaderMap;
use actix_web::web::{self, Bytes};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use log::{info, warn};

use crate::common::utils::is_header_value_valid;
use crate::common::{get_max_body_size, parse_query_string, Method, Request, Response};
use crate::error::HttpError;
use crate::Application;

/// actix-webのHeaderMapから共通形式のヘッダーに変換
fn convert_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut result = HashMap::new();

    for (key, value) in headers.iter() {
        if let Ok(value_str) = value.to_str() {
            result.insert(key.as_str().to_string(), value_str.to_string());
        }
    }

    result
}

/// actix-webのリクエストから共通形式のRequestに変換
///
/// 未知のメソッドも `Method::Other` としてそのまま渡し、判定はApplicationに任せる。
pub fn convert_request(req: &HttpRequest, body: Bytes) -> Request {
    let mut request = Request::new(Method::parse(req.method().as_str()), req.uri().path());
    request.query_params = parse_query_string(req.query_string());
    request.headers = convert_headers(req.headers());
    if !body.is_empty() {
        request.body = Some(body.to_vec());
    }
    request
}

/// 共通形式のResponseからactix-webのHttpResponseに変換
pub fn convert_to_http_response(response: Response) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(response.status)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);

    if let Some(content_type) = response.content_type_header() {
        builder.insert_header(("Content-Type", content_type));
    }

    // 同名ヘッダーを保持するためappendで追加
    for (key, value) in response.headerlist {
        if !is_header_value_valid(&value) {
            warn!("Dropping header with invalid value: {}", key);
            continue;
        }
        builder.append_header((key, value));
    }

    builder.body(response.body)
}

/// Applicationでリクエストを処理するactix-web用ハンドラー
async fn handle_request(req: HttpRequest, body: Bytes, app: web::Data<Arc<Application>>) -> HttpResponse {
    let max = get_max_body_size();
    if body.len() > max {
        warn!("Request body too large: {} bytes (limit {})", body.len(), max);
        let request = convert_request(&req, Bytes::new());
        let response = app.respond_error(&request, HttpError::payload_too_large());
        info!("{} {} {}", request.method, request.path, response.status_line());
        return convert_to_http_response(response);
    }

    let mut request = convert_request(&req, body);
    let response = app.handle_request(&mut request);
    info!("{} {} {}", request.method, request.path, response.status_line());
    convert_to_http_response(response)
}

/// ApplicationをHTTPサーバーとして実行
pub async fn run_server(app: Application, host: &str, port: u16) -> std::io::Result<()> {
    info!("Starting HTTP server on {}:{}", host, port);

    // アプリケーションをArcで包んでスレッド間で共有可能にする
    let app_data = Arc::new(app);
    let max_body = get_max_body_size();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_data.clone()))
            // ペイロード上限は本体でチェックするため、少し余裕を持たせる
            .app_data(web::PayloadConfig::new(max_body.saturating_add(1)))
            // すべてのリクエストをキャッチする汎用ハンドラー
            .default_service(web::to(handle_request))
    })
    .bind((host, port))?
    .run()
    .await
}
