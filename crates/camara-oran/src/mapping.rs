// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device IP to serving-cell mapping.
//!
//! The table is published through an [`ArcSwap`], so lookups never block and
//! always see either the previous table or the new one in full. Reloading
//! reads a JSON object of the form
//!
//! ```json
//! {
//!   "192.168.1.10": {
//!     "mcc": "001", "mnc": "01", "gnb_length": 28, "gnb_id": 12345,
//!     "ran_ue_id": "0000000000000001"
//!   }
//! }
//! ```
//!
//! Numeric and string values are coerced; entries that still do not fit are
//! skipped. An unreadable, malformed or empty file leaves the built-in table
//! in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::refresh::Refreshable;

/// PLMN, gNB and RAN UE identity of the cell serving a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellScope {
    pub mcc: String,
    pub mnc: String,
    pub gnb_length: u32,
    pub gnb_id: u64,
    pub ran_ue_id: String,
}

pub type ScopeTable = HashMap<String, CellScope>;

/// Table used until a mapping file provides one.
pub fn builtin_table() -> ScopeTable {
    HashMap::from([
        (
            "192.168.1.10".to_string(),
            CellScope {
                mcc: "001".into(),
                mnc: "01".into(),
                gnb_length: 28,
                gnb_id: 12345,
                ran_ue_id: "0000000000000001".into(),
            },
        ),
        (
            "10.10.45.1".to_string(),
            CellScope {
                mcc: "214".into(),
                mnc: "07".into(),
                gnb_length: 28,
                gnb_id: 67890,
                ran_ue_id: "0000000000000033".into(),
            },
        ),
    ])
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_int(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_entry(entry: &Value) -> Option<CellScope> {
    Some(CellScope {
        mcc: as_text(entry.get("mcc")?)?,
        mnc: as_text(entry.get("mnc")?)?,
        gnb_length: u32::try_from(as_int(entry.get("gnb_length")?)?).ok()?,
        gnb_id: as_int(entry.get("gnb_id")?)?,
        ran_ue_id: as_text(entry.get("ran_ue_id")?)?,
    })
}

/// Parses a mapping document. Invalid entries are dropped.
pub fn parse_table(raw: &str) -> Result<ScopeTable, String> {
    let root: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let Value::Object(entries) = root else {
        return Err("mapping root must be a JSON object".to_string());
    };

    let mut table = ScopeTable::with_capacity(entries.len());
    for (ip, entry) in &entries {
        match parse_entry(entry) {
            Some(scope) => {
                table.insert(ip.clone(), scope);
            }
            None => debug!(ip = %ip, "skipping invalid mapping entry"),
        }
    }
    Ok(table)
}

/// Hot-swappable IP to cell table.
pub struct IpScopeMap {
    current: ArcSwap<ScopeTable>,
    source: Option<PathBuf>,
}

impl IpScopeMap {
    /// A map serving the built-in table only.
    pub fn builtin() -> Self {
        Self {
            current: ArcSwap::from_pointee(builtin_table()),
            source: None,
        }
    }

    /// A map backed by `path`, loaded once immediately.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let map = Self {
            current: ArcSwap::from_pointee(builtin_table()),
            source: Some(path.into()),
        };
        map.reload();
        map
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn lookup(&self, ip: &str) -> Option<CellScope> {
        self.current.load().get(ip).cloned()
    }

    /// The first candidate with a known cell.
    pub fn resolve<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> Option<CellScope> {
        let table = self.current.load();
        candidates.into_iter().find_map(|ip| table.get(ip).cloned())
    }

    pub fn snapshot(&self) -> Arc<ScopeTable> {
        self.current.load_full()
    }

    /// Publishes `table`, replacing the current one.
    pub fn replace(&self, table: ScopeTable) {
        self.current.store(Arc::new(table));
    }

    /// Re-reads the source file and publishes the result.
    ///
    /// Returns the number of entries now being served.
    pub fn reload(&self) -> usize {
        let Some(path) = &self.source else {
            return self.current.load().len();
        };

        let loaded = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| parse_table(&raw));

        let table = match loaded {
            Ok(table) if !table.is_empty() => {
                info!(path = %path.display(), entries = table.len(), "loaded IP mapping");
                table
            }
            Ok(_) => {
                warn!(
                    path = %path.display(),
                    "IP mapping file has no valid entries, using built-in table"
                );
                builtin_table()
            }
            Err(reason) => {
                warn!(
                    path = %path.display(),
                    %reason,
                    "failed to read IP mapping, using built-in table"
                );
                builtin_table()
            }
        };
        let entries = table.len();
        self.replace(table);
        entries
    }
}

impl Refreshable for IpScopeMap {
    fn refresh(&self) {
        self.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_test::traced_test;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn builtin_entries_resolve() {
        let map = IpScopeMap::builtin();
        assert_eq!(map.lookup("10.10.45.1").unwrap().gnb_id, 67890);
        assert!(map.lookup("1.2.3.4").is_none());
    }

    #[test]
    fn values_are_coerced() {
        let table = parse_table(
            r#"{"12.1.0.2": {"mcc": 1, "mnc": "01", "gnb_length": "28", "gnb_id": 7, "ran_ue_id": 33}}"#,
        )
        .unwrap();
        let scope = &table["12.1.0.2"];
        assert_eq!(scope.mcc, "1");
        assert_eq!(scope.gnb_length, 28);
        assert_eq!(scope.ran_ue_id, "33");
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let table = parse_table(
            r#"{
                "12.1.0.2": {"mcc": "001", "mnc": "01", "gnb_length": 28, "gnb_id": 1, "ran_ue_id": "1"},
                "12.1.0.3": {"mcc": "001", "mnc": "01", "gnb_length": "wide", "gnb_id": 1, "ran_ue_id": "1"},
                "12.1.0.4": {"mcc": "001"},
                "12.1.0.5": "not an object"
            }"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains_key("12.1.0.2"));
    }

    #[test]
    fn file_replaces_builtin_table() {
        let file = write_file(
            r#"{"12.1.0.9": {"mcc": "214", "mnc": "07", "gnb_length": 22, "gnb_id": 5, "ran_ue_id": "9"}}"#,
        );
        let map = IpScopeMap::from_file(file.path());
        assert!(map.lookup("12.1.0.9").is_some());
        assert!(map.lookup("192.168.1.10").is_none());
    }

    #[test]
    #[traced_test]
    fn malformed_file_keeps_builtin_table() {
        let file = write_file("[1, 2, 3]");
        let map = IpScopeMap::from_file(file.path());
        assert_eq!(map.snapshot().len(), 2);
        assert!(logs_contain("using built-in table"));
    }

    #[test]
    fn missing_file_keeps_builtin_table() {
        let dir = tempfile::tempdir().unwrap();
        let map = IpScopeMap::from_file(dir.path().join("absent.json"));
        assert!(map.lookup("192.168.1.10").is_some());
    }

    #[test]
    fn reload_picks_up_changes() {
        let file = write_file(
            r#"{"12.1.0.9": {"mcc": "214", "mnc": "07", "gnb_length": 22, "gnb_id": 5, "ran_ue_id": "9"}}"#,
        );
        let map = IpScopeMap::from_file(file.path());
        let before = map.snapshot();

        std::fs::write(
            file.path(),
            r#"{"12.1.0.10": {"mcc": "214", "mnc": "07", "gnb_length": 22, "gnb_id": 6, "ran_ue_id": "10"}}"#,
        )
        .unwrap();
        assert_eq!(map.reload(), 1);

        assert!(map.lookup("12.1.0.10").is_some());
        // Readers holding the old snapshot keep a complete table.
        assert!(before.contains_key("12.1.0.9"));
    }

    #[test]
    fn resolve_takes_first_known_candidate() {
        let map = IpScopeMap::builtin();
        let scope = map.resolve(["8.8.8.8", "10.10.45.1", "192.168.1.10"]).unwrap();
        assert_eq!(scope.gnb_id, 67890);
    }
}
