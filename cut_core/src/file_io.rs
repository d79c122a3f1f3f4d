//! # File I/O Module
//!
//! Shop file operations:
//! - **Atomic saves**: write to `<file>.tmp`, fsync, rename over the target
//! - **File locking**: keep two counters from editing the same shop at once
//! - **Version validation**: refuse files written by a newer schema
//!
//! ## File Format
//!
//! Shops are saved as `.cuts` files containing pretty-printed JSON.
//! Lock files sit next to them as `.cuts.lock` and record who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cut_core::file_io::{save_shop, load_shop, FileLock};
//! use cut_core::shop::Shop;
//! use std::path::Path;
//!
//! let path = Path::new("main-st.cuts");
//! let lock = FileLock::acquire(path, "counter-1")?;
//!
//! let shop = Shop::new("Main St Hardware");
//! save_shop(&shop, path)?;
//!
//! // Lock is released when dropped
//! drop(lock);
//! # Ok::<(), cut_core::errors::CutError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CutError, CutResult};
use crate::shop::{Shop, SCHEMA_VERSION};

/// Locks older than this are taken over regardless of owner.
const STALE_LOCK_HOURS: i64 = 24;

/// Lock file metadata stored in .cuts.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (user or counter name)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Check if the process that took this lock is gone, or the lock is too old
    pub fn is_stale(&self) -> bool {
        if hostname().as_deref() == Some(self.machine.as_str()) && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(windows)]
fn process_alive(pid: u32) -> bool {
    use std::process::Command;
    Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()))
        .unwrap_or(true)
}

#[cfg(not(any(unix, windows)))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Exclusive lock on a shop file, released on drop.
///
/// Combines an OS-level lock (fs2) with a `.lock` metadata file so other
/// users can see who has the shop open.
pub struct FileLock {
    shop_path: PathBuf,
    lock_path: PathBuf,
    /// Holds the OS lock while alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a shop file.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired
    /// * `Err(CutError::FileLocked)` - Another live process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CutResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(CutError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            warn!(
                path = %path.display(),
                holder = %existing.user_id,
                "taking over stale lock"
            );
        }

        let lock_err = |op: &str, e: std::io::Error| {
            CutError::file_error(op, lock_path.display().to_string(), e.to_string())
        };

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| lock_err("create lock", e))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CutError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| CutError::SerializationError {
            reason: e.to_string(),
        })?;
        lock_file
            .write_all(lock_json.as_bytes())
            .map_err(|e| lock_err("write lock", e))?;
        lock_file.sync_all().map_err(|e| lock_err("sync lock", e))?;

        debug!(path = %path.display(), user = %info.user_id, "acquired shop lock");

        Ok(FileLock {
            shop_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a shop is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if a live lock exists.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !info.is_stale())
    }

    /// Path of the locked shop file
    pub fn shop_path(&self) -> &Path {
        &self.shop_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `shop.cuts` → `shop.cuts.<suffix>`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let extension = path
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_extension(extension);
    sibling
}

fn lock_path_for(shop_path: &Path) -> PathBuf {
    sibling_path(shop_path, "lock")
}

fn read_lock_info(lock_path: &Path) -> CutResult<LockInfo> {
    let contents = fs::read_to_string(lock_path).map_err(|e| {
        CutError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;
    serde_json::from_str(&contents).map_err(|e| CutError::SerializationError {
        reason: e.to_string(),
    })
}

/// Save a shop with atomic write semantics.
///
/// 1. Serialize to pretty JSON
/// 2. Write to `<path>.tmp` and fsync
/// 3. Rename over `path`
///
/// An interrupted save leaves the previous file intact.
pub fn save_shop(shop: &Shop, path: &Path) -> CutResult<()> {
    let json = serde_json::to_string_pretty(shop).map_err(|e| CutError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = sibling_path(path, "tmp");
    let tmp_err = |op: &str, e: std::io::Error| {
        CutError::file_error(op, tmp_path.display().to_string(), e.to_string())
    };

    let mut tmp_file = File::create(&tmp_path).map_err(|e| tmp_err("create temp file", e))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| tmp_err("write temp file", e))?;
    tmp_file.sync_all().map_err(|e| tmp_err("sync temp file", e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CutError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(
        path = %path.display(),
        materials = shop.materials.len(),
        jobs = shop.jobs.len(),
        "saved shop"
    );
    Ok(())
}

/// Create a new shop file, refusing to overwrite an existing one.
pub fn create_shop_file(shop: &Shop, path: &Path) -> CutResult<()> {
    if path.exists() {
        return Err(CutError::file_error(
            "create",
            path.display().to_string(),
            "file already exists",
        ));
    }
    save_shop(shop, path)
}

/// Load a shop from a file.
///
/// # Returns
///
/// * `Ok(Shop)` - Loaded shop
/// * `Err(CutError::VersionMismatch)` - Written by an incompatible schema
/// * `Err(CutError::InvalidInput)` - Pricing policy or a material is invalid
/// * `Err(CutError::SerializationError)` - Invalid JSON
/// * `Err(CutError::FileError)` - I/O error
pub fn load_shop(path: &Path) -> CutResult<Shop> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CutError::file_error("read", path.display().to_string(), e.to_string()))?;

    let shop: Shop = serde_json::from_str(&contents).map_err(|e| CutError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&shop.meta.version)?;
    shop.validate()?;

    debug!(
        path = %path.display(),
        materials = shop.materials.len(),
        jobs = shop.jobs.len(),
        "loaded shop"
    );
    Ok(shop)
}

/// Load a shop and report whether someone else holds its lock.
pub fn load_shop_with_lock_check(path: &Path) -> CutResult<(Shop, Option<LockInfo>)> {
    let shop = load_shop(path)?;
    Ok((shop, FileLock::check(path)))
}

/// Major versions must match; within 0.x a newer minor is also rejected.
fn validate_version(file_version: &str) -> CutResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CutError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if current_major == 0 {
        if let (Some(&file_minor), Some(&current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{Material, MaterialType};
    use crate::units::MeasurementUnit;
    use tempfile::TempDir;

    fn shop_path(dir: &TempDir) -> PathBuf {
        dir.path().join("test.cuts")
    }

    #[test]
    fn test_sibling_paths() {
        let path = Path::new("/srv/shops/main.cuts");
        assert_eq!(lock_path_for(path), Path::new("/srv/shops/main.cuts.lock"));
        assert_eq!(sibling_path(path, "tmp"), Path::new("/srv/shops/main.cuts.tmp"));
        assert_eq!(lock_path_for(Path::new("shop")), Path::new("shop.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("counter-1");
        assert_eq!(info.user_id, "counter-1");
        assert!(info.pid > 0);
        assert!(!info.is_stale());
    }

    #[test]
    fn test_old_lock_is_stale() {
        let mut info = LockInfo::new("counter-1");
        info.machine = "some-other-host".to_string();
        info.locked_at = Utc::now() - chrono::Duration::hours(STALE_LOCK_HOURS + 1);
        assert!(info.is_stale());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = shop_path(&dir);

        let shop = Shop::new("Main St Hardware");
        save_shop(&shop, &path).unwrap();

        let loaded = load_shop(&path).unwrap();
        assert_eq!(loaded.meta.shop_name, "Main St Hardware");
        assert_eq!(loaded.meta.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = shop_path(&dir);

        save_shop(&Shop::new("Test"), &path).unwrap();

        assert!(path.exists());
        assert!(!sibling_path(&path, "tmp").exists());
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = shop_path(&dir);

        create_shop_file(&Shop::new("First"), &path).unwrap();
        let err = create_shop_file(&Shop::new("Second"), &path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert_eq!(load_shop(&path).unwrap().meta.shop_name, "First");
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = shop_path(&dir);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_shop(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_rejects_invalid_pricing() {
        let dir = TempDir::new().unwrap();
        let path = shop_path(&dir);
        let mut shop = Shop::new("Main St Hardware");
        shop.settings.pricing.labor_rate_per_cut = -3.0;
        save_shop(&shop, &path).unwrap();

        let err = load_shop(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_load_rejects_invalid_material() {
        let dir = TempDir::new().unwrap();
        let path = shop_path(&dir);
        let mut shop = Shop::new("Main St Hardware");
        let oak = Material::new("Oak", MaterialType::Wood, MeasurementUnit::Imperial).with_unit_cost(-1.0);
        shop.materials.insert(oak.id, oak);
        save_shop(&shop, &path).unwrap();

        assert_eq!(load_shop(&path).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_shop(&shop_path(&dir)).unwrap_err().error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let path = shop_path(&dir);
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "counter-1").unwrap();
        assert_eq!(lock.info.user_id, "counter-1");
        assert_eq!(lock.shop_path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_load_with_lock_check() {
        let dir = TempDir::new().unwrap();
        let path = shop_path(&dir);
        save_shop(&Shop::new("Test"), &path).unwrap();

        let (loaded, lock_info) = load_shop_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.shop_name, "Test");
        assert!(lock_info.is_none());
    }
}
