use anyhow::{Context, Result};
use itertools::Itertools;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A snapshot line has at least `USER PID PPID VSIZE RSS WCHAN PC STATE NAME`;
/// everything from NAME onwards belongs to the command.
const MIN_SNAPSHOT_FIELDS: usize = 9;

/// One row of the process snapshot.
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub pid: String,
    pub ppid: String,
    pub command: String,
}

impl ProcessEntry {
    /// Final path component of the command, used for display.
    /// Commands without a path separator (kernel threads, named binder
    /// threads) come back unchanged.
    pub fn display_name(&self) -> &str {
        Path::new(&self.command)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.command)
    }
}

/// Lookup from pid/tid token to snapshot entry, built once from a
/// `ps -t -P -x` dump and read-only afterwards.
#[derive(Debug, Default)]
pub struct ProcessTable {
    entries: HashMap<String, ProcessEntry>,
}

impl ProcessTable {
    /// Parse the text of a process snapshot.
    ///
    /// The first line is the column header and is discarded. Lines with
    /// fewer than nine whitespace-delimited fields are dropped; dumps cut
    /// off mid-write produce such rows. When a pid repeats, the last
    /// occurrence wins.
    pub fn parse(snapshot: &str) -> Self {
        let mut entries = HashMap::new();
        let mut dropped = 0usize;

        for line in snapshot.lines().skip(1) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < MIN_SNAPSHOT_FIELDS {
                dropped += 1;
                continue;
            }

            let entry = ProcessEntry {
                pid: fields[1].to_string(),
                ppid: fields[2].to_string(),
                command: fields.iter().skip(8).join(" "),
            };
            entries.insert(entry.pid.clone(), entry);
        }

        debug!(
            "process table: {} entries ({} short lines dropped)",
            entries.len(),
            dropped
        );
        Self { entries }
    }

    /// Read a snapshot file and parse it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = fs::read_to_string(path)
            .with_context(|| format!("Failed to read process snapshot {}", path.display()))?;
        Ok(Self::parse(&snapshot))
    }

    pub fn get(&self, pid: &str) -> Option<&ProcessEntry> {
        self.entries.get(pid)
    }

    /// Display name for a pid key: the entry's command basename when the
    /// key is known, the raw key otherwise. Never fails.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map_or(key, ProcessEntry::display_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
