// src/server.rs — HTTP 服务：POST /generate 生成并返回 PNG

use crate::config::Config;
use crate::generate;
use crate::types::{GenError, LogoPolicy, LogoStrategy, RenderOptions, DEFAULT_BOX_SIZE};
use anyhow::Result;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

pub fn app() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate_handler))
        // 与原服务一致不限制请求体大小，大 logo 也走统一的 JSON 错误
        .layer(DefaultBodyLimit::disable())
}

pub async fn run(cfg: &Config) -> Result<()> {
    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP 服务已启动: http://{addr}");
    axum::serve(listener, app()).await?;
    Ok(())
}

/// 测试页面
async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

fn bad_request(msg: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg.into() }))).into_response()
}

fn server_error(msg: impl Into<String>) -> Response {
    let msg = msg.into();
    tracing::error!("生成失败: {msg}");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg }))).into_response()
}

/// 表单字段：url 必填，border 选填（默认 1），logo 选填文件
async fn generate_handler(mut multipart: Multipart) -> Response {
    let mut url: Option<String> = None;
    let mut border: u32 = 1;
    let mut logo: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => return bad_request(format!("malformed form data: {e}")),
        };
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "url" => match field.text().await {
                Ok(v) if !v.is_empty() => url = Some(v),
                Ok(_) => {}
                Err(e) => return bad_request(format!("malformed form data: {e}")),
            },
            "border" => match field.text().await {
                Ok(v) if !v.trim().is_empty() => match v.trim().parse::<u32>() {
                    Ok(b) => border = b,
                    Err(_) => return bad_request(format!("invalid border: {v}")),
                },
                Ok(_) => {}
                Err(e) => return bad_request(format!("malformed form data: {e}")),
            },
            "logo" => {
                // 空文件名视为未上传
                if field.file_name().is_some_and(|f| !f.is_empty()) {
                    match field.bytes().await {
                        Ok(b) if !b.is_empty() => logo = Some(b.to_vec()),
                        Ok(_) => {}
                        Err(e) => return bad_request(format!("malformed form data: {e}")),
                    }
                }
            }
            _ => {}
        }
    }

    let Some(url) = url else {
        return bad_request("URL is required");
    };

    let opts = RenderOptions { box_size: DEFAULT_BOX_SIZE, border };
    let img = match generate::generate(
        &url,
        &opts,
        logo.as_deref(),
        LogoStrategy::Overlay,
        LogoPolicy::FailFast,
    ) {
        Ok(img) => img,
        Err(e @ (GenError::InvalidLogo(_) | GenError::InvalidParameter(_))) => {
            return bad_request(e.to_string());
        }
        Err(e) => return server_error(e.to_string()),
    };

    match generate::to_png_bytes(&img) {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) => server_error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOUNDARY: &str = "qrlogo-test-boundary";

    /// (字段名, 文件名, 内容) 列表拼为 multipart 请求
    fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_url_returns_400_with_error_key() {
        let res = app()
            .oneshot(multipart_request(&[("border", None, b"2".as_slice())]))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn valid_url_returns_png() {
        let res = app()
            .oneshot(multipart_request(&[(
                "url",
                None,
                b"https://example.com".as_slice(),
            )]))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[tokio::test]
    async fn invalid_logo_returns_400_before_generation() {
        let res = app()
            .oneshot(multipart_request(&[
                ("url", None, b"https://example.com".as_slice()),
                ("logo", Some("logo.png"), b"not an image".as_slice()),
            ]))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        let msg = body["error"].as_str().unwrap();
        assert!(msg.starts_with("Invalid logo image"));
    }

    #[tokio::test]
    async fn large_logo_upload_reaches_handler_as_json_error() {
        // 超过 axum 默认 2 MB 限制的请求体不应被 413 拦截
        let junk = vec![0u8; 3 * 1024 * 1024];
        let res = app()
            .oneshot(multipart_request(&[
                ("url", None, b"https://example.com".as_slice()),
                ("logo", Some("big.bin"), junk.as_slice()),
            ]))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid logo image"));
    }

    #[tokio::test]
    async fn invalid_border_returns_400() {
        let res = app()
            .oneshot(multipart_request(&[
                ("url", None, b"https://example.com".as_slice()),
                ("border", None, b"lots".as_slice()),
            ]))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn index_serves_html() {
        let res = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
