// Property store module: string-keyed get/set/delete over the places
// credentials can live. The Pocket client receives a store as an explicit
// dependency, which keeps the backends swappable and the client testable
// with an in-memory substitute.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Property keys the Pocket client reads and writes. Kept in one place so
/// the store backends, the client and the tests all agree on them.
pub const CONSUMER_KEY: &str = "POCKET_CONSUMER_KEY";
pub const REQUEST_TOKEN: &str = "POCKET_REQUEST_TOKEN";
pub const ACCESS_TOKEN: &str = "POCKET_ACCESS_TOKEN";

/// String-keyed persistent property store. `get` returns `None` for a
/// missing key and `delete` of a missing key is a no-op, so callers only
/// see errors for real I/O failures.
pub trait PropertyStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Pick the store once at startup: a truthy `IS_LOCAL` selects the
/// environment-backed store, everything else gets the file-backed one.
pub fn from_env() -> Box<dyn PropertyStore> {
    if is_truthy(std::env::var("IS_LOCAL").ok().as_deref()) {
        log::debug!("using environment-backed property store");
        Box::new(EnvStore)
    } else {
        log::debug!("using file-backed property store");
        Box::new(FileStore::in_home_dir())
    }
}

fn is_truthy(val: Option<&str>) -> bool {
    matches!(
        val.map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes")
    )
}

/// "Local" deployment path: properties are process environment variables.
/// Writes only last for the lifetime of the process, which is all the
/// manual authorization dance needs when run from a shell with a `.env`.
pub struct EnvStore;

impl PropertyStore for EnvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::env::var(key) {
            Ok(val) => Ok(Some(val)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Reading environment variable {}", key)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::env::set_var(key, value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        std::env::remove_var(key);
        Ok(())
    }
}

/// Default deployment path: properties are a JSON string map in a dotfile
/// under the user's home directory. The file is read and rewritten on each
/// operation; fine for a handful of keys touched by a human.
#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        FileStore { path }
    }

    /// Store file in the user's home directory, falling back to the
    /// current directory when no home dir exists.
    pub fn in_home_dir() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        FileStore::new(dir.join(".pocketctl_properties.json"))
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Reading property file {}", self.path.display()))
            }
        };
        serde_json::from_str(&data)
            .with_context(|| format!("Parsing property file {}", self.path.display()))
    }

    fn save(&self, props: &BTreeMap<String, String>) -> Result<()> {
        let data = serde_json::to_string_pretty(props)?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("Writing property file {}", self.path.display()))
    }
}

impl PropertyStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut props = self.load()?;
        props.insert(key.to_string(), value.to_string());
        self.save(&props)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut props = self.load()?;
        if props.remove(key).is_some() {
            self.save(&props)?;
        }
        Ok(())
    }
}
