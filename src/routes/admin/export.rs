use crate::{
    app_state::AppState,
    export::{export, ExportError, ExportFormat, ExportScope},
    utils::{e400, e404, e500, HttpError},
};
use anyhow::{anyhow, Context, Error};
use askama_axum::Template;
use axum::{
    body::Body,
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[tracing::instrument(name = "Get export form", skip(app_state))]
pub(super) async fn export_form(
    State(app_state): State<AppState>,
) -> Result<ExportForm<'static>, HttpError<Error>> {
    let countries = app_state
        .store
        .distinct_countries()
        .await
        .map_err(e500)?;

    Ok(ExportForm {
        page_title: "Export Emails",
        action: "/export-emails",
        countries,
    })
}

#[derive(Template)]
#[template(path = "web/export_form.html")]
pub(super) struct ExportForm<'a> {
    page_title: &'a str,
    action: &'a str,
    countries: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExportQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    country: Option<String>,
    format: Option<String>,
}

#[tracing::instrument(name = "Download subscriber export", skip(app_state))]
pub(super) async fn export_emails(
    State(app_state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, HttpError<Error>> {
    let scope = ExportScope::parse(query.kind.as_deref(), query.country.as_deref())
        .map_err(|e| e400(anyhow!(e)))?;
    let format = ExportFormat::parse_or_default(query.format.as_deref());

    let file = export(
        app_state.store.as_ref(),
        &scope,
        format,
        app_state.export_dir.as_path(),
    )
    .await
    .map_err(|e| match e {
        ExportError::NothingToExport => e404(anyhow!(e)),
        ExportError::UnexpectedError(e) => e500(e),
    })?;

    let content_disposition = format!("attachment; filename=\"{}\"", file.filename);
    let content_type = file.content_type;
    let stream = file
        .file
        .into_stream()
        .await
        .context("Failed to open export file for streaming")
        .map_err(e500)?;

    Ok((
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CONTENT_DISPOSITION, content_disposition),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
