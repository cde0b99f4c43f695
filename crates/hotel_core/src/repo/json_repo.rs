//! JSON-file repository backend.
//!
//! # Responsibility
//! - Persist one collection as `{ "<collection>": [ ... ] }` in one file.
//! - Rewrite the whole document, pretty-printed, on every mutation.
//!
//! # Invariants
//! - Every write is a full read-modify-write; there is no append path.
//! - `list` returns records in insertion order.
//! - A missing file reads as an empty collection.
//! - Other top-level keys of the document survive a rewrite.
//! - `last_id` records the largest id ever assigned, so deleted ids stay
//!   retired even when the file was written by hand without it.
//!
//! There is no file lock. Two writers interleaving on the same file lose the
//! earlier write (last writer wins).

use super::{next_id, RepoError, RepoResult, Repository};
use crate::model::{Entity, EntityId};
use log::{debug, error, info};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

const LAST_ID_KEY: &str = "last_id";

/// File-backed repository for one entity collection.
pub struct JsonFileRepository<E> {
    path: PathBuf,
    _entity: PhantomData<fn() -> E>,
}

/// Decoded collection document.
struct Document<E> {
    root: Map<String, Value>,
    records: Vec<E>,
    /// Largest id ever assigned, at least the largest id present.
    last_id: EntityId,
}

impl<E: Entity> JsonFileRepository<E> {
    /// Uses the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entity: PhantomData,
        }
    }

    /// Uses `<data_dir>/<collection>.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(format!("{}.json", E::COLLECTION)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> RepoResult<Document<E>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Document {
                    root: Map::new(),
                    records: Vec::new(),
                    last_id: 0,
                });
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let parsed: Value = serde_json::from_str(&raw).map_err(|source| self.json_error(source))?;
        let mut root = match parsed {
            Value::Object(root) => root,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "{} must hold a JSON object, found {}",
                    self.path.display(),
                    json_type_name(&other)
                )));
            }
        };

        let records = match root.remove(E::COLLECTION) {
            None | Some(Value::Null) => Vec::new(),
            Some(items @ Value::Array(_)) => {
                serde_json::from_value::<Vec<E>>(items).map_err(|source| self.json_error(source))?
            }
            Some(other) => {
                return Err(RepoError::InvalidData(format!(
                    "`{}` in {} must be an array, found {}",
                    E::COLLECTION,
                    self.path.display(),
                    json_type_name(&other)
                )));
            }
        };

        let stored_last_id = match root.remove(LAST_ID_KEY) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_i64().ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "`{LAST_ID_KEY}` in {} must be an integer, found {}",
                    self.path.display(),
                    json_type_name(&value)
                ))
            })?,
        };
        let last_id = records
            .iter()
            .map(|record| record.id())
            .fold(stored_last_id, EntityId::max);

        Ok(Document {
            root,
            records,
            last_id,
        })
    }

    fn write_document(&self, document: Document<E>) -> RepoResult<()> {
        let Document {
            mut root,
            records,
            last_id,
        } = document;
        let items = serde_json::to_value(&records).map_err(|source| self.json_error(source))?;
        root.insert(E::COLLECTION.to_string(), items);
        root.insert(LAST_ID_KEY.to_string(), Value::from(last_id));
        let rendered = serde_json::to_string_pretty(&Value::Object(root))
            .map_err(|source| self.json_error(source))?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        std::fs::write(&self.path, rendered).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> RepoError {
        error!(
            "event=repo_io module=repo backend=json entity={} status=error path={} error={}",
            E::NAME,
            self.path.display(),
            source
        );
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> RepoError {
        error!(
            "event=repo_decode module=repo backend=json entity={} status=error path={} error={}",
            E::NAME,
            self.path.display(),
            source
        );
        RepoError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl<E: Entity> Repository<E> for JsonFileRepository<E> {
    fn list(&self) -> RepoResult<Vec<E>> {
        let records = self.read_document()?.records;
        debug!(
            "event=repo_list module=repo backend=json entity={} status=ok count={}",
            E::NAME,
            records.len()
        );
        Ok(records)
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        let found = self
            .read_document()?
            .records
            .into_iter()
            .find(|record| record.id() == id);
        debug!(
            "event=repo_get module=repo backend=json entity={} status=ok id={} found={}",
            E::NAME,
            id,
            found.is_some()
        );
        Ok(found)
    }

    fn create(&self, draft: &E::Draft) -> RepoResult<E> {
        let mut document = self.read_document()?;
        let id = next_id(document.last_id)?;
        let record = E::from_draft(id, draft.clone());
        document.records.push(record.clone());
        document.last_id = id;
        self.write_document(document)?;

        info!(
            "event=repo_create module=repo backend=json entity={} status=ok id={}",
            E::NAME,
            id
        );
        Ok(record)
    }

    fn update(&self, id: EntityId, patch: &E::Patch) -> RepoResult<Option<E>> {
        let mut document = self.read_document()?;
        let Some(record) = document.records.iter_mut().find(|record| record.id() == id) else {
            debug!(
                "event=repo_update module=repo backend=json entity={} status=absent id={}",
                E::NAME,
                id
            );
            return Ok(None);
        };

        record.apply_patch(patch);
        let merged = record.clone();
        self.write_document(document)?;

        info!(
            "event=repo_update module=repo backend=json entity={} status=ok id={}",
            E::NAME,
            id
        );
        Ok(Some(merged))
    }

    fn delete(&self, id: EntityId) -> RepoResult<bool> {
        let mut document = self.read_document()?;
        let Some(index) = document.records.iter().position(|record| record.id() == id) else {
            debug!(
                "event=repo_delete module=repo backend=json entity={} status=absent id={}",
                E::NAME,
                id
            );
            return Ok(false);
        };

        document.records.remove(index);
        self.write_document(document)?;

        info!(
            "event=repo_delete module=repo backend=json entity={} status=ok id={}",
            E::NAME,
            id
        );
        Ok(true)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
