//! pooltix-storage-json
//!
//! Filesystem-backed [`KeyValueStore`]: one JSON document per key, written
//! atomically, with rotating backups of removed documents.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use pooltix_core::{CoreError, KeyValueStore};

const ENTRY_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Directories used by [`JsonFileStore`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<root>/data` and `<root>/backups`.
    pub fn under(root: &Path) -> Self {
        Self {
            data_root: root.join("data"),
            backup_root: root.join("backups"),
        }
    }
}

/// Describes a backup copy of a removed entry.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub key: String,
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonFileStore {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.data_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            data_dir: paths.data_root,
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_name(key), ENTRY_EXTENSION))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Backups for `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                key: slug.clone(),
                id: file_name.to_string(),
                created_at: parse_backup_timestamp(file_name),
                size_bytes,
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| {
            Reverse((info.created_at, backup_attempt(&info.id), info.id.clone()))
        });
        Ok(entries)
    }

    /// Contents of one backup of `key`. The live entry is left alone.
    pub fn read_backup(&self, key: &str, backup_id: &str) -> Result<(BackupInfo, String), CoreError> {
        let backup = self
            .list_backups(key)?
            .into_iter()
            .find(|info| info.id == backup_id)
            .ok_or_else(|| CoreError::Storage(format!("backup `{}` not found", backup_id)))?;
        let data = fs::read_to_string(&backup.path)?;
        Ok((backup, data))
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(key))
    }

    fn backup_existing(&self, key: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let stem = format!("{}_{}", canonical_name(key), timestamp);
        let mut target = dir.join(format!("{}.{}", stem, ENTRY_EXTENSION));
        let mut attempt = 1;
        while target.exists() {
            target = dir.join(format!("{}-{}.{}", stem, attempt, ENTRY_EXTENSION));
            attempt += 1;
        }
        fs::copy(path, target)?;
        self.prune_backups(key)
    }

    fn prune_backups(&self, key: &str) -> Result<(), CoreError> {
        for entry in self.list_backups(key)?.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(());
        }
        self.backup_existing(key, &path)?;
        fs::remove_file(path)?;
        Ok(())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "entry".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", ENTRY_EXTENSION))?;
    // `-N` marks a second backup taken in the same millisecond.
    let trimmed = trimmed.split_once('-').map_or(trimmed, |(head, _)| head);
    let mut segments = trimmed.rsplit('_');
    let millis = segments.next()?;
    let time = segments.next()?;
    let date = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) || !is_digits(millis, 3) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(&format!("{}{}", date, time), "%Y%m%d%H%M%S").ok()?;
    let millis: i64 = millis.parse().ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        naive + Duration::milliseconds(millis),
        Utc,
    ))
}

fn backup_attempt(name: &str) -> u32 {
    name.strip_suffix(&format!(".{}", ENTRY_EXTENSION))
        .and_then(|stem| stem.split_once('-'))
        .and_then(|(_, attempt)| attempt.parse().ok())
        .unwrap_or(0)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_are_filesystem_safe() {
        assert_eq!(canonical_name("Tickets"), "tickets");
        assert_eq!(canonical_name("buffet/cash"), "buffet_cash");
        assert_eq!(canonical_name("  "), "entry");
    }

    #[test]
    fn backup_timestamps_parse_from_file_names() {
        let parsed = parse_backup_timestamp("tickets_20240320_101500_123.json").unwrap();
        assert_eq!(
            parsed.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "2024-03-20 10:15:00.123"
        );
        assert_eq!(
            parse_backup_timestamp("tickets_20240320_101500_123-2.json"),
            Some(parsed)
        );
        assert!(parse_backup_timestamp("tickets.json").is_none());
        assert!(parse_backup_timestamp("tickets_2024_1015_1.json").is_none());
    }
}
