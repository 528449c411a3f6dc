//! Route handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::error::ApiError;
use super::AppState;
use crate::contact::{ContactError, ContactForm, EmailMessage};
use crate::content::{
    filter_projects, CategoryFilter, ContentStore, Faq, FaqPage, Project, ProjectSummary,
    ServiceTier,
};
use crate::gallery::{layout_gallery, GalleryLayout};

/// A project page: the document, its laid-out gallery and related work.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub project: Project,
    pub gallery: GalleryLayout,
    pub related: Vec<ProjectSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IndexQuery {
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FaqQuery {
    page: Option<FaqPage>,
}

pub(crate) async fn healthz() -> &'static str {
    "ok"
}

async fn load_project(state: &AppState, slug: &str) -> Result<Project, ApiError> {
    state
        .content
        .project_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project".to_string()))
}

#[instrument(skip(state))]
pub(crate) async fn portfolio(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let project = load_project(&state, &slug).await?;
    let gallery = layout_gallery(&project.title, &project.gallery);
    let related = state
        .content
        .related_projects(&project.category, &slug, state.related_limit)
        .await?;

    debug!(
        images = gallery.image_count(),
        rows = gallery.rows.len(),
        related = related.len(),
        "Project page assembled"
    );

    Ok(Json(PortfolioResponse {
        project,
        gallery,
        related,
    }))
}

#[instrument(skip(state))]
pub(crate) async fn gallery(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GalleryLayout>, ApiError> {
    let project = load_project(&state, &slug).await?;
    Ok(Json(layout_gallery(&project.title, &project.gallery)))
}

#[instrument(skip(state))]
pub(crate) async fn portfolio_index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let filter = CategoryFilter::parse(query.category.as_deref());
    let projects = state.content.projects().await?;
    Ok(Json(filter_projects(projects, &filter, &state.main_categories)))
}

pub(crate) async fn services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceTier>>, ApiError> {
    Ok(Json(state.content.service_tiers().await?))
}

pub(crate) async fn faqs(
    State(state): State<AppState>,
    query: Result<Query<FaqQuery>, QueryRejection>,
) -> Result<Json<Vec<Faq>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        debug!(error = %rejection, "Unreadable FAQ query");
        ApiError::BadRequest("page must be one of services, contact or both".to_string())
    })?;
    Ok(Json(state.content.faqs(query.page).await?))
}

pub(crate) async fn featured(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    Ok(Json(state.content.featured_projects().await?))
}

pub(crate) async fn contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Some(mailer) = state.mailer.as_ref() else {
        warn!("Contact form submitted but no mailer is configured");
        return Err(ApiError::MailNotConfigured);
    };

    let Json(form) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Unreadable contact payload");
        ApiError::InvalidContact(ContactError::MissingFields)
    })?;
    let enquiry = form.validate()?;

    let message = EmailMessage::enquiry(
        &enquiry,
        &state.contact.from,
        &state.contact.to,
        Utc::now(),
    );
    if let Err(err) = mailer.send(&message).await {
        warn!(error = %err, "Failed to deliver enquiry");
        return Err(ApiError::MailFailed);
    }

    info!(service = enquiry.service.as_deref().unwrap_or("-"), "Enquiry delivered");
    Ok(Json(json!({ "success": true })))
}
