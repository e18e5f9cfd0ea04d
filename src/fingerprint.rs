//! Cache keys and storage paths for call parameters

use std::fmt;
use std::path::{Component, Path, PathBuf};

use log::trace;
use sha2::{Digest, Sha256};

use crate::canonical::canonicalize;
use crate::request::CallParameters;

/// Hex SHA-256 digest of a canonicalized `CallParameters`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint
{   pub fn as_str(&self) -> &str
    {   &self.0
    }
}

impl fmt::Display for Fingerprint
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(&self.0)
    }
}

pub fn fingerprint(params: &CallParameters) -> Fingerprint
{   let canonical = canonicalize(&params.to_value());
    trace!("Canonical call parameters: {}", canonical);
    let digest = Sha256::digest(canonical.as_bytes());
    Fingerprint(hex::encode(digest))
}

/// Maps call parameters to `{cache_root}/{model}/[{prefix}_]{fingerprint}.json`
#[derive(Debug, Clone)]
pub struct FingerprintHasher
{   cache_root: PathBuf
}

impl FingerprintHasher
{   pub fn new(cache_root: impl Into<PathBuf>) -> Self
    {   FingerprintHasher
        {   cache_root: cache_root.into()
        }
    }

    pub fn cache_root(&self) -> &Path
    {   &self.cache_root
    }

    pub fn fingerprint(&self, params: &CallParameters) -> Fingerprint
    {   fingerprint(params)
    }

    /// Fails when the model or prefix would place the entry outside
    /// the cache root. Models may name nested directories
    /// (`org/model`); prefixes may not contain separators at all.
    pub fn path_for(
      &self
    , params: &CallParameters
    , prefix: Option<&str>
    ) -> crate::Result<PathBuf>
    {   check_model(&params.model)?;
        let digest = fingerprint(params);
        let file_name = match prefix
        {   Some(prefix) => {
              check_prefix(prefix)?;
              format!("{}_{}.json", prefix, digest)
            }
          , None => format!("{}.json", digest)
        };
        Ok(self.cache_root.join(&params.model).join(file_name))
    }
}

fn check_model(model: &str) -> crate::Result<()>
{   let nested_only = !model.is_empty()
      && Path::new(model)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !nested_only || model.contains("..") || model.contains('\\')
    {   return Err(crate::Error::InvalidArgument(
          format!("model {:?} cannot be used as a cache directory", model)
        ));
    }
    Ok(())
}

fn check_prefix(prefix: &str) -> crate::Result<()>
{   if prefix.contains("..") || prefix.contains(['/', '\\'])
    {   return Err(crate::Error::InvalidArgument(
          format!("prefix {:?} must be a plain file-name fragment", prefix)
        ));
    }
    Ok(())
}
