//! Default links: the ownerless template seeded on first run, and the
//! per-owner copy made the first time an owner lists their links.
//!
//! The ownerless rows (`owner_id IS NULL`) are never served directly; they
//! are the template each new owner's starting links are copied from, so the
//! copies are the owner's to edit and delete. Both entry points are
//! idempotent and safe to call repeatedly.

use rusqlite::{params, Connection};

use crate::managers::link_manager::{LinkManager, LinkManagerTrait};
use crate::types::errors::LinkError;
use crate::types::link::{LinkKind, NewChildLink, NewLink};

const FAVICON_BASE: &str = "https://favicon.vemetric.com";

/// Seeds the ownerless default link template if it does not exist yet.
///
/// Returns the number of top-level links created (0 when already seeded).
pub fn seed_global_links(conn: &Connection) -> Result<usize, LinkError> {
    let existing: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM links WHERE owner_id IS NULL",
            [],
            |row| row.get(0),
        )
        .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

    if existing > 0 {
        return Ok(0);
    }

    let mut mgr = LinkManager::new(conn);

    let defaults = [
        ("GitHub", "https://github.com"),
        ("YouTube", "https://www.youtube.com"),
        ("ChatGPT", "https://chatgpt.com"),
    ];

    for (label, href) in defaults {
        mgr.create(NewLink {
            owner_id: None,
            href: Some(href.to_string()),
            label: label.to_string(),
            icon: favicon_for(href),
            ..Default::default()
        })?;
    }

    // One folder-style link with children, demonstrating the List kind.
    let google = mgr.create(NewLink {
        owner_id: None,
        href: None,
        label: "Google".to_string(),
        icon: favicon_for("https://google.com"),
        kind: Some(LinkKind::List),
        ..Default::default()
    })?;

    let children = [
        ("Gmail", "https://mail.google.com"),
        ("Drive", "https://drive.google.com"),
        ("Maps", "https://maps.google.com"),
    ];

    for (label, href) in children {
        mgr.add_child(NewChildLink {
            parent_id: google.id.clone(),
            href: href.to_string(),
            label: label.to_string(),
            icon: favicon_for(href),
            ..Default::default()
        })?;
    }

    Ok(defaults.len() + 1)
}

/// Copies the default link template to an owner who has no links yet.
///
/// The copies get fresh ids and belong entirely to the owner; later edits to
/// them never touch the template. Icon handles are not copied — the template
/// only carries favicon URLs, and a handle is a deletion token that must
/// stay unique to one row. Returns the number of top-level links copied
/// (0 when the owner already has links).
pub fn seed_owner_links(conn: &Connection, owner: &str) -> Result<usize, LinkError> {
    let existing: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM links WHERE owner_id = ?1",
            params![owner],
            |row| row.get(0),
        )
        .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

    if existing > 0 {
        return Ok(0);
    }

    let mut mgr = LinkManager::new(conn);
    let template = mgr.list_tree(None)?;
    let copied = template.len();

    for node in template {
        let link = mgr.create(NewLink {
            owner_id: Some(owner.to_string()),
            href: node.link.href,
            label: node.link.label,
            icon: node.link.icon,
            kind: Some(node.link.kind),
            position: Some(node.link.position),
            ..Default::default()
        })?;

        for child in node.children.unwrap_or_default() {
            mgr.add_child(NewChildLink {
                parent_id: link.id.clone(),
                href: child.href,
                label: child.label,
                icon: child.icon,
                position: Some(child.position),
                ..Default::default()
            })?;
        }
    }

    Ok(copied)
}

fn favicon_for(href: &str) -> String {
    match crate::services::favicon::extract_domain(href) {
        Some(domain) => format!("{}/{}", FAVICON_BASE, domain),
        None => format!("{}/example.com", FAVICON_BASE),
    }
}
