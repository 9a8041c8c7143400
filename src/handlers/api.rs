use axum::{Json, response::Html};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Server is running",
    })
}

/// Static landing page
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>WaaV Phone Bridge</title>
    <style>
      html { font-family: sans-serif; font-weight: 700; }
      body { background: white; }
      section {
        position: absolute;
        top: 50%;
        left: 50%;
        transform: translate(-50%, -50%);
        color: #1C151A;
      }
    </style>
  </head>
  <body>
    <section>
      <p>WaaV Phone Bridge is running.</p>
    </section>
  </body>
</html>
"#;
