use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;
use crate::static_ui;
use axum::{
    extract::{multipart::Field, DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Form, Router,
};
use portal_core::{check_content_type, ImageUpload, Incident, Submission, UploadError, MAX_IMAGE_BYTES};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Room for the text fields and multipart framing on top of the image.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

const IMAGE_FIELD: &str = "image";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: u64,
    incident_count: usize,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/incidents",
            get(list_incidents_handler).post(create_incident_handler),
        )
        .route("/uploads/:filename", get(image_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    // A built client takes over everything the API does not answer
    let app = match state.client_build.clone() {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            api.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => api.route("/", get(|| async { Html(static_ui::UI_HTML) })),
    };

    app.layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + FORM_OVERHEAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_incidents_handler(State(state): State<AppState>) -> Json<Vec<Incident>> {
    Json(state.list_incidents())
}

async fn create_incident_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<Incident>), ApiError> {
    let (submission, image) = read_submission(&state, request).await.map_err(|e| {
        tracing::debug!("Rejected upload: {}", e);
        metrics::record_rejection("upload");
        e
    })?;

    let incident = state.create_incident(submission, image).await?;
    Ok((StatusCode::CREATED, Json(incident)))
}

/// Decodes a create request by its content type. Multipart bodies may carry
/// an image; JSON and urlencoded bodies only carry text fields. Anything
/// else has no readable fields and fails validation downstream.
async fn read_submission(
    state: &AppState,
    request: Request,
) -> Result<(Submission, Option<ImageUpload>), ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state).await?;
        read_form(multipart).await
    } else if content_type.starts_with("application/json") {
        let Json(submission) = Json::<Submission>::from_request(request, state).await?;
        Ok((submission, None))
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(submission) = Form::<Submission>::from_request(request, state).await?;
        Ok((submission, None))
    } else {
        Ok((Submission::default(), None))
    }
}

/// Collects the text fields and the optional image from a multipart body.
/// A rejected image fails the whole request before anything is written.
async fn read_form(mut multipart: Multipart) -> Result<(Submission, Option<ImageUpload>), ApiError> {
    let mut submission = Submission::default();
    let mut image = None;
    let mut seen_image = false;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "title" => submission.title = Some(field.text().await?),
            "description" => submission.description = Some(field.text().await?),
            "incident_type" => submission.incident_type = Some(field.text().await?),
            "location" => submission.location = Some(field.text().await?),
            IMAGE_FIELD if seen_image => return Err(UploadError::UnexpectedField.into()),
            IMAGE_FIELD => {
                seen_image = true;
                image = read_image(field).await?;
            }
            _ => {}
        }
    }

    Ok((submission, image))
}

async fn read_image(mut field: Field<'_>) -> Result<Option<ImageUpload>, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_owned);

    // Browsers send an empty part when no file was picked
    if !file_name.is_empty() {
        check_content_type(content_type.as_deref())?;
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge.into());
        }
        bytes.extend_from_slice(&chunk);
    }

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }

    let upload = ImageUpload {
        field: IMAGE_FIELD.to_string(),
        file_name,
        content_type,
        bytes,
    };
    upload.check(MAX_IMAGE_BYTES)?;
    Ok(Some(upload))
}

async fn image_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = state
        .uploads
        .resolve(&filename)
        .ok_or(ApiError::ImageNotFound)?;

    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(response.into_response())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.uptime_seconds(),
        incident_count: state.store.load().len(),
    })
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed\n").into_response(),
    }
}
