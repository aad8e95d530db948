//! ledgerdesk-session-json
//!
//! File-backed [`SessionStore`]: the session keys live in one `session.json`
//! that is rewritten atomically on every change.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use ledgerdesk_core::{CoreError, CoreResult, SessionStore};

pub const SESSION_FILE: &str = "session.json";
const TMP_SUFFIX: &str = "tmp";

type SessionMap = BTreeMap<String, String>;

pub struct JsonSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl JsonSessionStore {
    /// Store at `<dir>/session.json`; the directory is created if needed.
    pub fn new(dir: impl AsRef<Path>) -> CoreResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(SESSION_FILE),
            guard: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes every key by deleting the file.
    pub fn clear(&self) -> CoreResult<()> {
        let _lock = self.lock()?;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| CoreError::Session("session file lock poisoned".into()))
    }

    fn read(&self) -> CoreResult<SessionMap> {
        if !self.path.exists() {
            return Ok(SessionMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(SessionMap::new());
        }
        match serde_json::from_str(&data) {
            Ok(map) => Ok(map),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable session file");
                Ok(SessionMap::new())
            }
        }
    }

    fn write(&self, map: &SessionMap) -> CoreResult<()> {
        if map.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        let json = serde_json::to_string_pretty(map)?;
        let tmp = tmp_path(&self.path);
        write_private(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for JsonSessionStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let _lock = self.lock()?;
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let _lock = self.lock()?;
        let mut map = self.read()?;
        map.insert(key.to_string(), value.to_string());
        self.write(&map)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let _lock = self.lock()?;
        let mut map = self.read()?;
        if map.remove(key).is_some() {
            self.write(&map)?;
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("json.{}", TMP_SUFFIX));
    tmp
}

/// The file holds a bearer token, so it is readable by the owner only.
fn write_private(path: &Path, data: &str) -> CoreResult<()> {
    let mut file = File::create(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
