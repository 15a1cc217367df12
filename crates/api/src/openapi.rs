// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` documentation module
//!
//! This module provides the `OpenAPI` specification and `Swagger UI`
//! endpoints for API documentation.

use axum::{Json, http::StatusCode, response::Html};
use utoipa::OpenApi;

use crate::{
    config::Environment,
    routes::handlers::{InterpretRequest, InterpretResponse},
    state::{HealthCheck, HealthStatus},
};

/// `OpenAPI` document for the contract interpretation service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contract Lens API",
        description = "Resolves smart-contract identifiers to verified source code and natural-language interpretations"
    ),
    paths(
        crate::routes::handlers::health_handler,
        crate::routes::handlers::interpret_handler
    ),
    components(schemas(
        InterpretRequest,
        InterpretResponse,
        HealthCheck,
        HealthStatus,
        Environment,
        shared_types::Chain
    )),
    tags(
        (name = "contracts", description = "Contract source resolution and interpretation"),
        (name = "health", description = "Service health monitoring")
    )
)]
pub struct ApiDoc;

/// `OpenAPI` specification endpoint
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Swagger UI endpoint
pub async fn swagger_ui() -> Result<Html<&'static str>, StatusCode> {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Contract Lens API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css" />
    <style>
        html { box-sizing: border-box; overflow: -moz-scrollbars-vertical; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin:0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: '/api-doc/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            });
        }
    </script>
</body>
</html>
"#;
    Ok(Html(html))
}
