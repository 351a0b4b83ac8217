//! SQLite implementation of the catalog repository.
//!
//! The repository borrows a connection, so the same code runs against a
//! plain connection for reads and against an open transaction for writes.

use std::collections::{BTreeSet, HashMap};

use log::debug;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};

use crate::catalog::models::{
    Artifact, ArtifactId, ArtifactRef, Associations, NewArtifact, User, UserId, VocabularyEntry,
    VocabularyId, VocabularyKind,
};
use crate::catalog::repository::{ArtifactFilter, Repository};
use crate::error::{CatalogError, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    fullname TEXT NOT NULL,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS artifacts (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    name TEXT NOT NULL UNIQUE,
    data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS labels (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS supported_os (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS sources (
    id INTEGER PRIMARY KEY,
    type TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS artifact_labels (
    artifact_id INTEGER NOT NULL REFERENCES artifacts(id) ON DELETE CASCADE,
    label_id INTEGER NOT NULL REFERENCES labels(id),
    PRIMARY KEY (artifact_id, label_id)
);

CREATE TABLE IF NOT EXISTS artifact_os (
    artifact_id INTEGER NOT NULL REFERENCES artifacts(id) ON DELETE CASCADE,
    os_id INTEGER NOT NULL REFERENCES supported_os(id),
    PRIMARY KEY (artifact_id, os_id)
);

CREATE TABLE IF NOT EXISTS artifact_sources (
    artifact_id INTEGER NOT NULL REFERENCES artifacts(id) ON DELETE CASCADE,
    source_id INTEGER NOT NULL REFERENCES sources(id),
    PRIMARY KEY (artifact_id, source_id)
);

CREATE INDEX IF NOT EXISTS idx_artifact_author ON artifacts(user_id);
CREATE INDEX IF NOT EXISTS idx_artifact_labels_label ON artifact_labels(label_id);
CREATE INDEX IF NOT EXISTS idx_artifact_os_os ON artifact_os(os_id);
CREATE INDEX IF NOT EXISTS idx_artifact_sources_source ON artifact_sources(source_id);
"#;

/// Enable foreign keys and create the catalog tables if they are missing.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    debug!("Catalog schema ready");
    Ok(())
}

/// Table layout of one vocabulary
struct VocabularyTable {
    table: &'static str,
    key_column: &'static str,
    description_column: &'static str,
    link_table: &'static str,
    link_column: &'static str,
}

fn vocabulary_table(kind: VocabularyKind) -> VocabularyTable {
    match kind {
        VocabularyKind::Label => VocabularyTable {
            table: "labels",
            key_column: "name",
            description_column: "description",
            link_table: "artifact_labels",
            link_column: "label_id",
        },
        VocabularyKind::SupportedOs => VocabularyTable {
            table: "supported_os",
            key_column: "name",
            description_column: "NULL",
            link_table: "artifact_os",
            link_column: "os_id",
        },
        VocabularyKind::Source => VocabularyTable {
            table: "sources",
            key_column: "type",
            description_column: "NULL",
            link_table: "artifact_sources",
            link_column: "source_id",
        },
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

type ArtifactRow = (ArtifactId, String, String, UserId);

fn artifact_row(row: &Row<'_>) -> rusqlite::Result<ArtifactRow> {
    Ok((
        ArtifactId(row.get(0)?),
        row.get(1)?,
        row.get(2)?,
        UserId(row.get(3)?),
    ))
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get(0)?),
        name: row.get(1)?,
        fullname: row.get(2)?,
        password: row.get(3)?,
    })
}

pub struct SqliteRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn load_associations(&self, id: ArtifactId) -> Result<Associations> {
        let mut associations = Associations::default();

        for kind in VocabularyKind::ALL {
            let table = vocabulary_table(kind);
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {} FROM {} WHERE artifact_id = ?1",
                table.link_column, table.link_table
            ))?;
            let ids = stmt
                .query_map(params![id.0], |row| row.get(0).map(VocabularyId))?
                .collect::<rusqlite::Result<BTreeSet<_>>>()?;
            *associations.get_mut(kind) = ids;
        }

        Ok(associations)
    }

    fn write_associations(&self, id: ArtifactId, associations: &Associations) -> Result<()> {
        for kind in VocabularyKind::ALL {
            let table = vocabulary_table(kind);
            self.conn.execute(
                &format!("DELETE FROM {} WHERE artifact_id = ?1", table.link_table),
                params![id.0],
            )?;

            let mut stmt = self.conn.prepare(&format!(
                "INSERT INTO {} (artifact_id, {}) VALUES (?1, ?2)",
                table.link_table, table.link_column
            ))?;
            for entry_id in associations.get(kind) {
                stmt.execute(params![id.0, entry_id.0])?;
            }
        }

        Ok(())
    }

    fn complete(&self, (id, name, data, author): ArtifactRow) -> Result<Artifact> {
        Ok(Artifact {
            id,
            name,
            data,
            author,
            associations: self.load_associations(id)?,
        })
    }

    fn find_artifact_where(
        &self,
        column: &str,
        value: &dyn rusqlite::ToSql,
    ) -> Result<Option<Artifact>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT id, name, data, user_id FROM artifacts WHERE {} = ?1", column),
                [value],
                artifact_row,
            )
            .optional()?;

        row.map(|row| self.complete(row)).transpose()
    }
}

impl Repository for SqliteRepository<'_> {
    fn find_artifact_by_name(&self, name: &str) -> Result<Option<Artifact>> {
        self.find_artifact_where("name", &name)
    }

    fn find_artifact_by_id(&self, id: ArtifactId) -> Result<Option<Artifact>> {
        self.find_artifact_where("id", &id.0)
    }

    fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, fullname, password FROM users WHERE name = ?1",
                params![name],
                user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_or_create(
        &self,
        kind: VocabularyKind,
        identifier: &str,
        description: Option<&str>,
    ) -> Result<VocabularyEntry> {
        let table = vocabulary_table(kind);

        let inserted = match kind {
            VocabularyKind::Label => self.conn.execute(
                "INSERT INTO labels (name, description) VALUES (?1, ?2) \
                 ON CONFLICT(name) DO NOTHING",
                params![identifier, description],
            )?,
            _ => self.conn.execute(
                &format!(
                    "INSERT INTO {} ({}) VALUES (?1) ON CONFLICT({}) DO NOTHING",
                    table.table, table.key_column, table.key_column
                ),
                params![identifier],
            )?,
        };
        if inserted > 0 {
            debug!("Created {} {}", kind, identifier);
        }

        let entry = self.conn.query_row(
            &format!(
                "SELECT id, {}, {} FROM {} WHERE {} = ?1",
                table.key_column, table.description_column, table.table, table.key_column
            ),
            params![identifier],
            |row| {
                Ok(VocabularyEntry {
                    id: VocabularyId(row.get(0)?),
                    kind,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            },
        )?;
        Ok(entry)
    }

    fn insert_artifact(&self, artifact: NewArtifact) -> Result<Artifact> {
        self.conn
            .execute(
                "INSERT INTO artifacts (user_id, name, data) VALUES (?1, ?2, ?3)",
                params![artifact.author.0, artifact.name, artifact.data],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CatalogError::ArtifactAlreadyExists(artifact.name.clone())
                } else {
                    e.into()
                }
            })?;

        let id = ArtifactId(self.conn.last_insert_rowid());
        self.write_associations(id, &artifact.associations)?;
        Ok(artifact.into_artifact(id))
    }

    fn update_artifact(&self, artifact: &Artifact) -> Result<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE artifacts SET user_id = ?1, name = ?2, data = ?3 WHERE id = ?4",
                params![artifact.author.0, artifact.name, artifact.data, artifact.id.0],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CatalogError::ArtifactAlreadyExists(artifact.name.clone())
                } else {
                    e.into()
                }
            })?;
        if updated == 0 {
            return Err(CatalogError::not_found("Artifact", artifact.id));
        }

        self.write_associations(artifact.id, &artifact.associations)
    }

    fn delete_artifact(&self, id: ArtifactId) -> Result<()> {
        self.write_associations(id, &Associations::default())?;
        let deleted = self
            .conn
            .execute("DELETE FROM artifacts WHERE id = ?1", params![id.0])?;
        if deleted == 0 {
            return Err(CatalogError::not_found("Artifact", id));
        }
        Ok(())
    }

    fn query_artifacts(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>> {
        let mut clauses = Vec::new();
        let mut args: Vec<&str> = Vec::new();

        for kind in VocabularyKind::ALL {
            let names = filter.vocabulary(kind);
            if names.is_empty() {
                continue;
            }
            let table = vocabulary_table(kind);
            clauses.push(format!(
                "EXISTS (SELECT 1 FROM {link} l JOIN {vocab} v ON v.id = l.{column} \
                 WHERE l.artifact_id = a.id AND v.{key} IN ({values}))",
                link = table.link_table,
                vocab = table.table,
                column = table.link_column,
                key = table.key_column,
                values = placeholders(names.len()),
            ));
            args.extend(names.iter().map(String::as_str));
        }

        if !filter.authors.is_empty() {
            clauses.push(format!(
                "a.user_id IN (SELECT id FROM users WHERE name IN ({}))",
                placeholders(filter.authors.len())
            ));
            args.extend(filter.authors.iter().map(String::as_str));
        }

        let where_sql = if filter.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT a.id, a.name, a.data, a.user_id FROM artifacts a{} ORDER BY a.id",
            where_sql
        ))?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), artifact_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // One query per vocabulary for the links of every selected artifact.
        let mut associations: HashMap<ArtifactId, Associations> = rows
            .iter()
            .map(|(id, ..)| (*id, Associations::default()))
            .collect();
        for kind in VocabularyKind::ALL {
            let table = vocabulary_table(kind);
            let mut stmt = self.conn.prepare(&format!(
                "SELECT al.artifact_id, al.{} FROM {} al \
                 JOIN artifacts a ON a.id = al.artifact_id{}",
                table.link_column, table.link_table, where_sql
            ))?;
            let links = stmt.query_map(params_from_iter(args.iter()), |row| {
                Ok((ArtifactId(row.get(0)?), VocabularyId(row.get(1)?)))
            })?;
            for link in links {
                let (artifact_id, entry_id) = link?;
                if let Some(linked) = associations.get_mut(&artifact_id) {
                    linked.get_mut(kind).insert(entry_id);
                }
            }
        }

        let artifacts = rows
            .into_iter()
            .map(|(id, name, data, author)| Artifact {
                id,
                name,
                data,
                author,
                associations: associations.remove(&id).unwrap_or_default(),
            })
            .collect();
        Ok(artifacts)
    }

    fn create_user(&self, name: &str, fullname: &str, password: &str) -> Result<User> {
        self.conn
            .execute(
                "INSERT INTO users (name, fullname, password) VALUES (?1, ?2, ?3)",
                params![name, fullname, password],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CatalogError::UserAlreadyExists(name.to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(User {
            id: UserId(self.conn.last_insert_rowid()),
            name: name.to_string(),
            fullname: fullname.to_string(),
            password: password.to_string(),
        })
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, fullname, password FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], user_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    fn list_vocabulary(&self, kind: VocabularyKind) -> Result<Vec<VocabularyEntry>> {
        let table = vocabulary_table(kind);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, {}, {} FROM {} ORDER BY id",
            table.key_column, table.description_column, table.table
        ))?;
        let entries = stmt
            .query_map([], |row| {
                Ok(VocabularyEntry {
                    id: VocabularyId(row.get(0)?),
                    kind,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn list_links(&self, kind: VocabularyKind) -> Result<Vec<(VocabularyId, ArtifactRef)>> {
        let table = vocabulary_table(kind);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT al.{column}, a.id, a.name FROM {link} al \
             JOIN artifacts a ON a.id = al.artifact_id ORDER BY a.id, al.{column}",
            column = table.link_column,
            link = table.link_table,
        ))?;
        let links = stmt
            .query_map([], |row| {
                Ok((
                    VocabularyId(row.get(0)?),
                    ArtifactRef {
                        id: ArtifactId(row.get(1)?),
                        name: row.get(2)?,
                    },
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(links)
    }

    fn list_authored(&self) -> Result<Vec<(UserId, ArtifactRef)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, id, name FROM artifacts ORDER BY id")?;
        let authored = stmt
            .query_map([], |row| {
                Ok((
                    UserId(row.get(0)?),
                    ArtifactRef {
                        id: ArtifactId(row.get(1)?),
                        name: row.get(2)?,
                    },
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(authored)
    }
}
