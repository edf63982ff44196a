//! Link route handlers.
//!
//! Create/update accept multipart form data (the UI submits either an icon
//! image or a favicon URL alongside the text fields); everything else is
//! JSON. Icon uploads and cleanup happen against the storage collaborator
//! outside the database lock.

use std::sync::{Arc, MutexGuard};

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::app::App;
use crate::database::seed;
use crate::managers::link_manager::{LinkManager, LinkManagerTrait};
use crate::tree;
use crate::types::link::{ChildLink, ChildLinkPatch, LinkKind, LinkPatch, NewChildLink, NewLink};

use super::auth::Owner;
use super::error::ApiError;
use super::AppState;

fn lock(state: &AppState) -> Result<MutexGuard<'_, App>, ApiError> {
    state
        .app
        .lock()
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// Fields the link/child forms may carry.
#[derive(Default)]
struct LinkForm {
    id: Option<String>,
    parent_id: Option<String>,
    label: Option<String>,
    href: Option<String>,
    kind: Option<String>,
    favicon_url: Option<String>,
    icon_bytes: Option<Vec<u8>>,
    icon_filename: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<LinkForm, ApiError> {
    let mut form = LinkForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "icon" => {
                form.icon_filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid icon upload: {}", e)))?;
                if !bytes.is_empty() {
                    form.icon_bytes = Some(bytes.to_vec());
                }
            }
            other => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid form field: {}", e)))?;
                match other {
                    "id" => form.id = Some(text),
                    "parentId" => form.parent_id = Some(text),
                    "label" => form.label = Some(text),
                    "href" => form.href = Some(text),
                    "kind" => form.kind = Some(text),
                    "faviconUrl" => form.favicon_url = Some(text),
                    _ => {}
                }
            }
        }
    }
    Ok(form)
}

/// Resolves the form's icon source: an uploaded image (stored via the icon
/// service, yielding a deletion handle), an explicit favicon URL used as-is,
/// or, on create only, a favicon derived from the link's href.
async fn resolve_icon(
    state: &AppState,
    form: &LinkForm,
    derive_from_href: bool,
) -> Result<Option<(String, Option<String>)>, ApiError> {
    if let Some(bytes) = &form.icon_bytes {
        let filename = form.icon_filename.as_deref().unwrap_or("icon.png");
        let uploaded = state.icons.upload(bytes.clone(), filename).await?;
        return Ok(Some((uploaded.url, Some(uploaded.handle))));
    }
    if let Some(url) = form.favicon_url.as_deref() {
        if !url.trim().is_empty() {
            return Ok(Some((url.trim().to_string(), None)));
        }
    }
    // No icon supplied at all: derive one from the target site when possible.
    if derive_from_href {
        if let Some(href) = form.href.as_deref() {
            if let Ok(url) = state.favicons.favicon_url(href) {
                return Ok(Some((url, None)));
            }
        }
    }
    Ok(None)
}

fn parse_kind(kind: Option<&str>) -> Option<LinkKind> {
    kind.map(LinkKind::from_db)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
}

/// GET /links — the owner's links as an ordered two-level tree.
pub async fn list_links(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let app = lock(&state)?;

    // First sight of a new owner: give them their own copy of the defaults.
    let copied = seed::seed_owner_links(app.db.connection(), &owner.0)?;
    if copied > 0 {
        tracing::info!(owner = %owner.0, links = copied, "copied default links to new owner");
    }

    let mgr = LinkManager::new(app.db.connection());

    let nodes = if query.sort.as_deref() == Some("most-visited") {
        let links = mgr.list_most_visited(Some(&owner.0))?;
        let mut children_by_parent = std::collections::HashMap::new();
        for link in &links {
            let children = mgr.children_of(&link.id)?;
            if !children.is_empty() {
                children_by_parent.insert(link.id.clone(), children);
            }
        }
        tree::assemble(links, children_by_parent)
    } else {
        mgr.list_tree(Some(&owner.0))?
    };

    Ok(Json(json!({ "links": nodes })))
}

/// POST /links — create a link from multipart form data.
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(multipart).await?;

    let Some(label) = non_empty(form.label.clone()) else {
        return Err(ApiError::bad_request("Label is required"));
    };
    let Some((icon, icon_handle)) = resolve_icon(&state, &form, true).await? else {
        return Err(ApiError::bad_request("Icon is required"));
    };

    let app = lock(&state)?;
    let mut mgr = LinkManager::new(app.db.connection());
    let link = mgr.create(NewLink {
        owner_id: Some(owner.0),
        href: non_empty(form.href),
        label,
        icon,
        icon_handle,
        kind: parse_kind(form.kind.as_deref()),
        position: None,
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "link": link }))))
}

/// PUT /links — partial update from multipart form data. Replacing the icon
/// deletes the previously stored image out-of-band.
pub async fn update_link(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(multipart).await?;

    let Some(id) = non_empty(form.id.clone()) else {
        return Err(ApiError::bad_request("Link ID is required"));
    };

    let new_icon = resolve_icon(&state, &form, false).await?;

    let mut patch = LinkPatch {
        label: non_empty(form.label.clone()),
        kind: parse_kind(form.kind.as_deref()),
        ..Default::default()
    };
    // A provided-but-empty href clears the field (folder parents have none).
    if let Some(href) = form.href.clone() {
        patch.href = Some(non_empty(Some(href)));
    }

    let (old_handle, link) = {
        let app = lock(&state)?;
        let mut mgr = LinkManager::new(app.db.connection());

        let old_handle = match &new_icon {
            Some((url, handle)) => {
                let previous = mgr.get(&id)?;
                patch.icon = Some(url.clone());
                patch.icon_handle = Some(handle.clone());
                previous.icon_handle
            }
            None => None,
        };

        let link = mgr.update(&id, patch)?;
        (old_handle, link)
    };

    if let Some(handle) = old_handle {
        state.icons.cleanup(&[handle]).await;
    }
    Ok(Json(json!({ "link": link })))
}

#[derive(Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// DELETE /links?id= — delete a link and its children; stored icons are
/// cleaned up out-of-band after the database commit.
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    Query(query): Query<IdQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(id) = non_empty(query.id) else {
        return Err(ApiError::bad_request("Link ID is required"));
    };

    let handles = {
        let app = lock(&state)?;
        let mut mgr = LinkManager::new(app.db.connection());
        mgr.delete(&id)?
    };

    state.icons.cleanup(&handles).await;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBody {
    pub ordered_ids: Vec<String>,
}

/// PATCH /links/reorder — rewrite the owner's link positions to the given
/// ordering. Idempotent.
pub async fn reorder_links(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(body): Json<ReorderBody>,
) -> Result<impl IntoResponse, ApiError> {
    let app = lock(&state)?;
    let mut mgr = LinkManager::new(app.db.connection());
    mgr.reorder(Some(&owner.0), &body.ordered_ids)?;
    Ok(Json(json!({ "success": true })))
}

/// POST /links/children — create a child link; the parent is promoted to a
/// folder as part of the same operation.
pub async fn create_child(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(multipart).await?;

    let Some(parent_id) = non_empty(form.parent_id.clone()) else {
        return Err(ApiError::bad_request("Parent ID is required"));
    };
    let Some(label) = non_empty(form.label.clone()) else {
        return Err(ApiError::bad_request("Label is required"));
    };
    let Some(href) = non_empty(form.href.clone()) else {
        return Err(ApiError::bad_request("Href is required"));
    };
    let Some((icon, icon_handle)) = resolve_icon(&state, &form, true).await? else {
        return Err(ApiError::bad_request("Icon is required"));
    };

    let app = lock(&state)?;
    let mut mgr = LinkManager::new(app.db.connection());
    let child = mgr.add_child(NewChildLink {
        parent_id,
        href,
        label,
        icon,
        icon_handle,
        position: None,
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "childLink": child }))))
}

/// PUT /links/children — partial update of a child link.
pub async fn update_child(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(multipart).await?;

    let Some(id) = non_empty(form.id.clone()) else {
        return Err(ApiError::bad_request("Child link ID is required"));
    };

    let new_icon = resolve_icon(&state, &form, false).await?;

    let mut patch = ChildLinkPatch {
        label: non_empty(form.label.clone()),
        href: non_empty(form.href.clone()),
        ..Default::default()
    };

    let (old_handle, child): (Option<String>, ChildLink) = {
        let app = lock(&state)?;
        let mut mgr = LinkManager::new(app.db.connection());

        let old_handle = match &new_icon {
            Some((url, handle)) => {
                let previous = mgr.get_child(&id)?;
                patch.icon = Some(url.clone());
                patch.icon_handle = Some(handle.clone());
                previous.icon_handle
            }
            None => None,
        };

        let child = mgr.update_child(&id, patch)?;
        (old_handle, child)
    };

    if let Some(handle) = old_handle {
        state.icons.cleanup(&[handle]).await;
    }
    Ok(Json(json!({ "childLink": child })))
}

/// DELETE /links/children?id= — delete a child link.
pub async fn delete_child(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    Query(query): Query<IdQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(id) = non_empty(query.id) else {
        return Err(ApiError::bad_request("Child link ID is required"));
    };

    let handle = {
        let app = lock(&state)?;
        let mut mgr = LinkManager::new(app.db.connection());
        mgr.delete_child(&id)?
    };

    if let Some(handle) = handle {
        state.icons.cleanup(&[handle]).await;
    }
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderChildrenBody {
    pub parent_id: String,
    pub ordered_ids: Vec<String>,
}

/// PATCH /links/children/reorder — rewrite one parent's child positions.
pub async fn reorder_children(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    Json(body): Json<ReorderChildrenBody>,
) -> Result<impl IntoResponse, ApiError> {
    let app = lock(&state)?;
    let mut mgr = LinkManager::new(app.db.connection());
    mgr.reorder_children(&body.parent_id, &body.ordered_ids)?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPositionBody {
    pub link_id: String,
    pub grid_row: i32,
    pub grid_column: i32,
}

/// PATCH /links/grid-position — store a link's free-grid placement.
pub async fn set_grid_position(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    Json(body): Json<GridPositionBody>,
) -> Result<impl IntoResponse, ApiError> {
    let app = lock(&state)?;
    let mut mgr = LinkManager::new(app.db.connection());
    mgr.set_grid_position(&body.link_id, body.grid_row, body.grid_column)?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitBody {
    pub link_id: String,
}

/// POST /links/visit — increment a link's visit count on click-through.
pub async fn record_visit(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    Json(body): Json<VisitBody>,
) -> Result<impl IntoResponse, ApiError> {
    let app = lock(&state)?;
    let mut mgr = LinkManager::new(app.db.connection());
    mgr.record_visit(&body.link_id)?;
    Ok(Json(json!({ "success": true })))
}
