//! Link store for the newtab dashboard.
//!
//! Implements `LinkManagerTrait` — position-aware CRUD for top-level links
//! and their child links, reorder batches, visit tracking, and free-grid
//! placement, backed by SQLite via `rusqlite`.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, ToSql};
use uuid::Uuid;

use crate::tree;
use crate::types::errors::LinkError;
use crate::types::link::{
    ChildLink, ChildLinkPatch, Link, LinkKind, LinkNode, LinkPatch, NewChildLink, NewLink,
};

const LINK_COLUMNS: &str = "id, owner_id, href, label, icon, icon_handle, kind, position, \
                            visit_count, grid_row, grid_column, created_at, updated_at";

const CHILD_COLUMNS: &str =
    "id, parent_id, href, label, icon, icon_handle, position, created_at, updated_at";

/// Trait defining link store operations.
pub trait LinkManagerTrait {
    fn list(&self, owner: Option<&str>) -> Result<Vec<Link>, LinkError>;
    fn list_most_visited(&self, owner: Option<&str>) -> Result<Vec<Link>, LinkError>;
    fn list_tree(&self, owner: Option<&str>) -> Result<Vec<LinkNode>, LinkError>;
    fn get(&self, id: &str) -> Result<Link, LinkError>;
    fn create(&mut self, link: NewLink) -> Result<Link, LinkError>;
    fn update(&mut self, id: &str, patch: LinkPatch) -> Result<Link, LinkError>;
    /// Deletes a link (children cascade). Returns the icon-storage handles of
    /// the link and its children for out-of-band cleanup.
    fn delete(&mut self, id: &str) -> Result<Vec<String>, LinkError>;
    fn reorder(&mut self, owner: Option<&str>, ordered_ids: &[String]) -> Result<(), LinkError>;
    fn children_of(&self, parent_id: &str) -> Result<Vec<ChildLink>, LinkError>;
    fn get_child(&self, id: &str) -> Result<ChildLink, LinkError>;
    fn add_child(&mut self, child: NewChildLink) -> Result<ChildLink, LinkError>;
    fn update_child(&mut self, id: &str, patch: ChildLinkPatch) -> Result<ChildLink, LinkError>;
    /// Deletes a child link. Returns its icon-storage handle, if any.
    fn delete_child(&mut self, id: &str) -> Result<Option<String>, LinkError>;
    fn reorder_children(
        &mut self,
        parent_id: &str,
        ordered_child_ids: &[String],
    ) -> Result<(), LinkError>;
    fn record_visit(&mut self, id: &str) -> Result<(), LinkError>;
    fn set_grid_position(&mut self, id: &str, row: i32, column: i32) -> Result<(), LinkError>;
}

/// Link manager backed by a SQLite connection.
pub struct LinkManager<'a> {
    conn: &'a Connection,
}

impl<'a> LinkManager<'a> {
    /// Creates a new `LinkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Computes the next position value among an owner's top-level links.
    fn next_position(&self, owner: Option<&str>) -> Result<i32, LinkError> {
        let pos: i32 = match owner {
            Some(o) => self.conn.query_row(
                "SELECT COALESCE(MAX(position), -1) + 1 FROM links WHERE owner_id = ?1",
                params![o],
                |row| row.get(0),
            ),
            None => self.conn.query_row(
                "SELECT COALESCE(MAX(position), -1) + 1 FROM links WHERE owner_id IS NULL",
                [],
                |row| row.get(0),
            ),
        }
        .map_err(|e| LinkError::DatabaseError(e.to_string()))?;
        Ok(pos)
    }

    /// Computes the next position value among one parent's children.
    fn next_child_position(&self, parent_id: &str) -> Result<i32, LinkError> {
        self.conn
            .query_row(
                "SELECT COALESCE(MAX(position), -1) + 1 FROM link_children WHERE parent_id = ?1",
                params![parent_id],
                |row| row.get(0),
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))
    }

    fn link_exists(&self, id: &str) -> Result<bool, LinkError> {
        let count: i32 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM links WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;
        Ok(count > 0)
    }

    /// Reads a single `Link` row into a struct.
    fn row_to_link(row: &rusqlite::Row) -> rusqlite::Result<Link> {
        let kind: String = row.get(6)?;
        Ok(Link {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            href: row.get(2)?,
            label: row.get(3)?,
            icon: row.get(4)?,
            icon_handle: row.get(5)?,
            kind: LinkKind::from_db(&kind),
            position: row.get(7)?,
            visit_count: row.get(8)?,
            grid_row: row.get(9)?,
            grid_column: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    /// Reads a single `ChildLink` row into a struct.
    fn row_to_child(row: &rusqlite::Row) -> rusqlite::Result<ChildLink> {
        Ok(ChildLink {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            href: row.get(2)?,
            label: row.get(3)?,
            icon: row.get(4)?,
            icon_handle: row.get(5)?,
            position: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn collect_links(&self, sql: &str, owner: Option<&str>) -> Result<Vec<Link>, LinkError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let rows = match owner {
            Some(o) => stmt.query_map(params![o], Self::row_to_link),
            None => stmt.query_map([], Self::row_to_link),
        }
        .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| LinkError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }
}

impl<'a> LinkManagerTrait for LinkManager<'a> {
    /// Lists an owner's top-level links ordered by position (insertion order
    /// breaks ties). `owner = None` selects the global default links.
    fn list(&self, owner: Option<&str>) -> Result<Vec<Link>, LinkError> {
        let sql = match owner {
            Some(_) => format!(
                "SELECT {} FROM links WHERE owner_id = ?1 ORDER BY position, rowid",
                LINK_COLUMNS
            ),
            None => format!(
                "SELECT {} FROM links WHERE owner_id IS NULL ORDER BY position, rowid",
                LINK_COLUMNS
            ),
        };
        self.collect_links(&sql, owner)
    }

    /// Lists an owner's top-level links ordered by descending visit count,
    /// for the most-visited sort mode.
    fn list_most_visited(&self, owner: Option<&str>) -> Result<Vec<Link>, LinkError> {
        let sql = match owner {
            Some(_) => format!(
                "SELECT {} FROM links WHERE owner_id = ?1 ORDER BY visit_count DESC, position, rowid",
                LINK_COLUMNS
            ),
            None => format!(
                "SELECT {} FROM links WHERE owner_id IS NULL ORDER BY visit_count DESC, position, rowid",
                LINK_COLUMNS
            ),
        };
        self.collect_links(&sql, owner)
    }

    /// Lists an owner's links with children assembled into the two-level
    /// tree the UI consumes. Recomputed on every call; no caching.
    fn list_tree(&self, owner: Option<&str>) -> Result<Vec<LinkNode>, LinkError> {
        let links = self.list(owner)?;

        let mut children_by_parent: HashMap<String, Vec<ChildLink>> = HashMap::new();
        for link in &links {
            let children = self.children_of(&link.id)?;
            if !children.is_empty() {
                children_by_parent.insert(link.id.clone(), children);
            }
        }

        Ok(tree::assemble(links, children_by_parent))
    }

    /// Fetches a single link by ID.
    fn get(&self, id: &str) -> Result<Link, LinkError> {
        let sql = format!("SELECT {} FROM links WHERE id = ?1", LINK_COLUMNS);
        self.conn
            .query_row(&sql, params![id], Self::row_to_link)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LinkError::NotFound(id.to_string()),
                other => LinkError::DatabaseError(other.to_string()),
            })
    }

    /// Creates a new top-level link. Appends to the end of the owner's grid
    /// unless an explicit position is supplied.
    fn create(&mut self, link: NewLink) -> Result<Link, LinkError> {
        if link.label.trim().is_empty() {
            return Err(LinkError::MissingField("label"));
        }
        if link.icon.trim().is_empty() {
            return Err(LinkError::MissingField("icon"));
        }

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        let kind = link.kind.unwrap_or(LinkKind::Icon);
        let position = match link.position {
            Some(p) => p,
            None => self.next_position(link.owner_id.as_deref())?,
        };

        self.conn
            .execute(
                "INSERT INTO links (id, owner_id, href, label, icon, icon_handle, kind, position, \
                 visit_count, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10)",
                params![
                    id,
                    link.owner_id,
                    link.href,
                    link.label,
                    link.icon,
                    link.icon_handle,
                    kind.as_str(),
                    position,
                    now,
                    now
                ],
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        self.get(&id)
    }

    /// Patches only the supplied fields of an existing link and bumps its
    /// modification timestamp.
    fn update(&mut self, id: &str, patch: LinkPatch) -> Result<Link, LinkError> {
        let now = Self::now();

        let mut sets: Vec<String> = vec!["updated_at = ?".to_string()];
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(now)];

        if let Some(href) = patch.href {
            sets.push("href = ?".to_string());
            values.push(Box::new(href));
        }
        if let Some(label) = patch.label {
            if label.trim().is_empty() {
                return Err(LinkError::MissingField("label"));
            }
            sets.push("label = ?".to_string());
            values.push(Box::new(label));
        }
        if let Some(icon) = patch.icon {
            if icon.trim().is_empty() {
                return Err(LinkError::MissingField("icon"));
            }
            sets.push("icon = ?".to_string());
            values.push(Box::new(icon));
        }
        if let Some(handle) = patch.icon_handle {
            sets.push("icon_handle = ?".to_string());
            values.push(Box::new(handle));
        }
        if let Some(kind) = patch.kind {
            sets.push("kind = ?".to_string());
            values.push(Box::new(kind.as_str().to_string()));
        }

        let sql = format!("UPDATE links SET {} WHERE id = ?", sets.join(", "));
        values.push(Box::new(id.to_string()));

        let affected = self
            .conn
            .execute(
                &sql,
                rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(LinkError::NotFound(id.to_string()));
        }
        self.get(id)
    }

    /// Deletes a link; child links cascade via the foreign key. Returns the
    /// icon-storage handles of the link and its children so the caller can
    /// clean up the stored images.
    fn delete(&mut self, id: &str) -> Result<Vec<String>, LinkError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let mut handles: Vec<String> = Vec::new();

        let own_handle: Option<Option<String>> = tx
            .query_row(
                "SELECT icon_handle FROM links WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(LinkError::DatabaseError(other.to_string())),
            })?;

        let Some(own_handle) = own_handle else {
            return Err(LinkError::NotFound(id.to_string()));
        };
        handles.extend(own_handle);

        let mut stmt = tx
            .prepare("SELECT icon_handle FROM link_children WHERE parent_id = ?1")
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;
        let child_handles = stmt
            .query_map(params![id], |row| row.get::<_, Option<String>>(0))
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;
        for handle in child_handles {
            let handle = handle.map_err(|e| LinkError::DatabaseError(e.to_string()))?;
            handles.extend(handle);
        }
        drop(stmt);

        tx.execute("DELETE FROM links WHERE id = ?1", params![id])
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        tx.commit()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        Ok(handles)
    }

    /// Rewrites the positions of an owner's links to match the given ordering:
    /// each id gets `position = index`. Applied in a single transaction so a
    /// concurrent batch never observes a half-applied ordering. Ids that do
    /// not belong to the owner are ignored. Idempotent.
    fn reorder(&mut self, owner: Option<&str>, ordered_ids: &[String]) -> Result<(), LinkError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let now = Self::now();
        for (index, id) in ordered_ids.iter().enumerate() {
            let result = match owner {
                Some(o) => tx.execute(
                    "UPDATE links SET position = ?1, updated_at = ?2 \
                     WHERE id = ?3 AND owner_id = ?4",
                    params![index as i32, now, id, o],
                ),
                None => tx.execute(
                    "UPDATE links SET position = ?1, updated_at = ?2 \
                     WHERE id = ?3 AND owner_id IS NULL",
                    params![index as i32, now, id],
                ),
            };
            result.map_err(|e| LinkError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))
    }

    /// Lists a parent's child links ordered by position.
    fn children_of(&self, parent_id: &str) -> Result<Vec<ChildLink>, LinkError> {
        let sql = format!(
            "SELECT {} FROM link_children WHERE parent_id = ?1 ORDER BY position, rowid",
            CHILD_COLUMNS
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map(params![parent_id], Self::row_to_child)
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| LinkError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }

    /// Fetches a single child link by ID.
    fn get_child(&self, id: &str) -> Result<ChildLink, LinkError> {
        let sql = format!("SELECT {} FROM link_children WHERE id = ?1", CHILD_COLUMNS);
        self.conn
            .query_row(&sql, params![id], Self::row_to_child)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LinkError::ChildNotFound(id.to_string()),
                other => LinkError::DatabaseError(other.to_string()),
            })
    }

    /// Creates a child link under an existing parent and promotes the parent
    /// to List kind in the same transaction.
    fn add_child(&mut self, child: NewChildLink) -> Result<ChildLink, LinkError> {
        if child.label.trim().is_empty() {
            return Err(LinkError::MissingField("label"));
        }
        if child.href.trim().is_empty() {
            return Err(LinkError::MissingField("href"));
        }
        if child.icon.trim().is_empty() {
            return Err(LinkError::MissingField("icon"));
        }
        if !self.link_exists(&child.parent_id)? {
            return Err(LinkError::ParentNotFound(child.parent_id));
        }

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        let position = match child.position {
            Some(p) => p,
            None => self.next_child_position(&child.parent_id)?,
        };

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        tx.execute(
            "INSERT INTO link_children (id, parent_id, href, label, icon, icon_handle, position, \
             created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                child.parent_id,
                child.href,
                child.label,
                child.icon,
                child.icon_handle,
                position,
                now,
                now
            ],
        )
        .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        // Having a child makes the parent a folder.
        tx.execute(
            "UPDATE links SET kind = 'list', updated_at = ?1 WHERE id = ?2",
            params![now, child.parent_id],
        )
        .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        tx.commit()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        self.get_child(&id)
    }

    /// Patches only the supplied fields of an existing child link.
    fn update_child(&mut self, id: &str, patch: ChildLinkPatch) -> Result<ChildLink, LinkError> {
        let now = Self::now();

        let mut sets: Vec<String> = vec!["updated_at = ?".to_string()];
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(now)];

        if let Some(href) = patch.href {
            if href.trim().is_empty() {
                return Err(LinkError::MissingField("href"));
            }
            sets.push("href = ?".to_string());
            values.push(Box::new(href));
        }
        if let Some(label) = patch.label {
            if label.trim().is_empty() {
                return Err(LinkError::MissingField("label"));
            }
            sets.push("label = ?".to_string());
            values.push(Box::new(label));
        }
        if let Some(icon) = patch.icon {
            if icon.trim().is_empty() {
                return Err(LinkError::MissingField("icon"));
            }
            sets.push("icon = ?".to_string());
            values.push(Box::new(icon));
        }
        if let Some(handle) = patch.icon_handle {
            sets.push("icon_handle = ?".to_string());
            values.push(Box::new(handle));
        }

        let sql = format!("UPDATE link_children SET {} WHERE id = ?", sets.join(", "));
        values.push(Box::new(id.to_string()));

        let affected = self
            .conn
            .execute(
                &sql,
                rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(LinkError::ChildNotFound(id.to_string()));
        }
        self.get_child(id)
    }

    /// Deletes a child link by ID. Returns its icon-storage handle, if any.
    fn delete_child(&mut self, id: &str) -> Result<Option<String>, LinkError> {
        let handle: Option<String> = match self.conn.query_row(
            "SELECT icon_handle FROM link_children WHERE id = ?1",
            params![id],
            |row| row.get(0),
        ) {
            Ok(h) => h,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(LinkError::ChildNotFound(id.to_string()))
            }
            Err(e) => return Err(LinkError::DatabaseError(e.to_string())),
        };

        self.conn
            .execute("DELETE FROM link_children WHERE id = ?1", params![id])
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        Ok(handle)
    }

    /// Rewrites the positions of one parent's children to match the given
    /// ordering. Same contract as [`reorder`](LinkManagerTrait::reorder),
    /// scoped to the parent.
    fn reorder_children(
        &mut self,
        parent_id: &str,
        ordered_child_ids: &[String],
    ) -> Result<(), LinkError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        let now = Self::now();
        for (index, id) in ordered_child_ids.iter().enumerate() {
            tx.execute(
                "UPDATE link_children SET position = ?1, updated_at = ?2 \
                 WHERE id = ?3 AND parent_id = ?4",
                params![index as i32, now, id, parent_id],
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .map_err(|e| LinkError::DatabaseError(e.to_string()))
    }

    /// Increments a link's visit count on click-through.
    fn record_visit(&mut self, id: &str) -> Result<(), LinkError> {
        let now = Self::now();
        let affected = self
            .conn
            .execute(
                "UPDATE links SET visit_count = visit_count + 1, updated_at = ?1 WHERE id = ?2",
                params![now, id],
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(LinkError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Stores a link's free-grid placement.
    fn set_grid_position(&mut self, id: &str, row: i32, column: i32) -> Result<(), LinkError> {
        let now = Self::now();
        let affected = self
            .conn
            .execute(
                "UPDATE links SET grid_row = ?1, grid_column = ?2, updated_at = ?3 WHERE id = ?4",
                params![row, column, now, id],
            )
            .map_err(|e| LinkError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(LinkError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
