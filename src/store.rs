//! On-disk cache entries: one pretty-printed JSON file per fingerprint

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::request::{CallParameters, ResponsePayload};

/// Persisted pairing of a call and its response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry
{   pub call: CallParameters
  , pub response: ResponsePayload
}

/// Result of reading a cache file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome
{   Hit(CacheEntry)
  , NotFound
  , /// The file exists but does not parse. Callers treat it as a miss.
    Corrupt(String)
}

impl LoadOutcome
{   pub fn into_entry(self) -> Option<CacheEntry>
    {   match self
        {   LoadOutcome::Hit(entry) => Some(entry)
          , _ => None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStore;

impl CacheStore
{   pub fn new() -> Self
    {   CacheStore
    }

    pub fn exists(&self, path: &Path) -> bool
    {   path.is_file()
    }

    pub fn load(&self, path: &Path) -> LoadOutcome
    {   let bytes = match fs::read(path)
        {   Ok(bytes) => bytes
          , Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
              return LoadOutcome::NotFound;
            }
          , Err(e) => {
              warn!("Failed to read cache file {}: {}", path.display(), e);
              return LoadOutcome::Corrupt(e.to_string());
            }
        };
        match serde_json::from_slice::<CacheEntry>(&bytes)
        {   Ok(entry) => LoadOutcome::Hit(entry)
          , Err(e) => {
              warn!("Failed to parse cache file {}: {}", path.display(), e);
              LoadOutcome::Corrupt(e.to_string())
            }
        }
    }

    /// Write `entry` to `path` with sorted keys and four-space indent.
    /// The file is written to a sibling temp file and renamed into place,
    /// so readers never see a partial entry.
    pub fn save(&self, path: &Path, entry: &CacheEntry) -> crate::Result<()>
    {   let dir = path.parent().ok_or_else(|| {
          crate::Error::CacheWrite(
            format!("{} has no parent directory", path.display())
          )
        })?;
        if !dir.is_dir()
        {   debug!("Creating cache directory {}", dir.display());
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let bytes = to_sorted_pretty_json(entry)?;
        let mut tmp = tempfile::Builder::new()
          .prefix(".entry-")
          .suffix(".tmp")
          .tempfile_in(dir)
          .map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!("Saved cache entry to {}", path.display());
        Ok(())
    }
}

fn to_sorted_pretty_json(entry: &CacheEntry) -> crate::Result<Vec<u8>>
{   let value = sort_keys(
      serde_json::to_value(entry)
        .map_err(|e| crate::Error::CacheWrite(e.to_string()))?
    );
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(
      &mut out,
      PrettyFormatter::with_indent(b"    ")
    );
    value.serialize(&mut ser)
      .map_err(|e| crate::Error::CacheWrite(e.to_string()))?;
    Ok(out)
}

/// Rebuild objects in key order at every depth. Holds whether or not
/// serde_json keeps insertion order.
fn sort_keys(value: Value) -> Value
{   match value
    {   Value::Object(map) => {
          let mut entries: Vec<(String, Value)> = map.into_iter().collect();
          entries.sort_by(|a, b| a.0.cmp(&b.0));
          Value::Object(
            entries
              .into_iter()
              .map(|(k, v)| (k, sort_keys(v)))
              .collect()
          )
        }
      , Value::Array(items) => {
          Value::Array(items.into_iter().map(sort_keys).collect())
        }
      , scalar => scalar
    }
}

fn write_err(e: std::io::Error) -> crate::Error
{   crate::Error::CacheWrite(e.to_string())
}
