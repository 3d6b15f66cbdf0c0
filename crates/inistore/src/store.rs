//! File-backed config store with write-through edits and full reload.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::{IniError, IniResult};
use crate::parse::{composite_key, parse_lines};

/// In-memory view of one config file.
///
/// The file is the source of truth; the mapping held here is a derived cache.
/// Reads are served from the mapping, writes go to the file first and the
/// mapping is then rebuilt from the file wholesale, never patched in place.
///
/// Instances are single-owner: reads borrow `&self`, writes take `&mut self`,
/// and no internal locking is performed. Writers racing on the same path from
/// several threads or processes must serialize externally.
///
/// # Example
///
/// ```no_run
/// use inistore::IniStore;
///
/// let mut store = IniStore::open("app.ini")?;
/// let port = store.read_value("Server", "Port", "8080")?;
/// store.write_value("Server", "Port", "9090")?;
/// # Ok::<(), inistore::IniError>(())
/// ```
#[derive(Debug)]
pub struct IniStore {
    path: PathBuf,
    items: HashMap<String, String>,
}

impl IniStore {
    /// Opens `path` and loads it into memory.
    ///
    /// The file must already exist; a missing file is [`IniError::NotFound`]
    /// rather than an empty store. Any other read failure is wrapped with
    /// the underlying `std::io::Error` kept as the source.
    pub fn open(path: impl Into<PathBuf>) -> IniResult<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(IniError::NotFound { path });
        }

        let mut store = Self {
            path,
            items: HashMap::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the value stored under `section`/`key`, trimmed of surrounding
    /// whitespace. Returns `default` unchanged when the pair is absent.
    /// Section and key matching is case-insensitive; brackets on `section`
    /// are stripped if present.
    pub fn read_value(&self, section: &str, key: &str, default: &str) -> IniResult<String> {
        require_non_empty(section, "section")?;
        require_non_empty(key, "key")?;

        let token = composite_key(section, key);
        match self.items.get(&token) {
            Some(value) => Ok(value.trim().to_string()),
            None => Ok(default.to_string()),
        }
    }

    /// Writes `key=value` under `section`, then reloads the whole file back
    /// into memory.
    ///
    /// When the pair already exists, the first line after the section header
    /// that *contains* the key (case-insensitive substring, not an exact
    /// match) is replaced with `key=value`. The scan runs to the end of the
    /// file rather than stopping at the next section header, and a line for
    /// a different key whose text merely contains this key can be hit
    /// instead. Both quirks match the files this format grew up with and are
    /// kept as-is.
    ///
    /// When the pair is new, a fresh section header (uppercased, bracketed)
    /// is appended at the end of the file behind a blank line and a `##`
    /// marker line, followed by the entry. This happens even when a header
    /// for the section already exists earlier in the file.
    ///
    /// The file edit is persisted before the reload; a reload failure leaves
    /// the file edited and the in-memory mapping stale.
    pub fn write_value(&mut self, section: &str, key: &str, value: &str) -> IniResult<()> {
        require_non_empty(section, "section")?;
        require_non_empty(key, "key")?;
        require_non_empty(value, "value")?;

        let header = normalize_header(section);
        let token = composite_key(section, key);
        let entry = format!("{key}={value}");
        let mut lines = self.read_file_lines()?;

        if self.items.contains_key(&token) {
            debug!("updating `{token}` in {}", self.path.display());
            self.update_existing(&header, key, entry, lines)?;
        } else {
            debug!("appending `{token}` to {}", self.path.display());
            push_section(&mut lines, &header, entry);
            self.persist(&lines)?;
        }

        self.reload()
    }

    /// Update path: the key is present in the mapping, so a line for it is
    /// expected somewhere after the section header.
    fn update_existing(
        &self,
        header: &str,
        key: &str,
        entry: String,
        mut lines: Vec<String>,
    ) -> IniResult<()> {
        let header_lower = header.to_lowercase();
        let key_lower = key.to_lowercase();
        let mut found_section = false;
        let mut key_found = false;

        for i in 0..lines.len() {
            if lines[i].to_lowercase() == header_lower {
                found_section = true;
                continue;
            }
            if found_section && lines[i].to_lowercase().contains(&key_lower) {
                lines[i] = entry.clone();
                key_found = true;
                self.persist(&lines)?;
                break;
            }
        }

        let mut pending: Vec<String> = Vec::new();
        if !found_section {
            // The mapping knew the key but the file no longer carries the
            // header in its written form; start the section over at the end.
            pending = lines;
            push_section(&mut pending, header, entry.clone());
            key_found = true;
        }
        if !key_found {
            // Header matched but no line contained the key. The pending list
            // holds only the new entry at this point; persisting it clobbers
            // the rest of the file. Inherited sharp edge, kept deliberately.
            pending.push(entry);
        }
        if !pending.is_empty() {
            self.persist(&pending)?;
        }

        Ok(())
    }

    /// Rebuilds the mapping from the file. The previous mapping is replaced
    /// wholesale on success and kept (stale) on failure.
    fn reload(&mut self) -> IniResult<()> {
        let lines = self.read_file_lines()?;
        self.items = parse_lines(lines.iter().map(String::as_str))?;
        trace!(
            "loaded {} entries from {}",
            self.items.len(),
            self.path.display()
        );
        Ok(())
    }

    fn read_file_lines(&self) -> IniResult<Vec<String>> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn persist(&self, lines: &[String]) -> IniResult<()> {
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: io::Error) -> IniError {
        IniError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Section header as written to the file: uppercased, wrapped in brackets
/// unless the caller already supplied a bracketed string, which is reused
/// verbatim apart from the uppercasing.
fn normalize_header(section: &str) -> String {
    if section.contains('[') && section.contains(']') {
        section.to_uppercase()
    } else {
        format!("[{}]", section.to_uppercase())
    }
}

/// Appends a fresh section at the end of the line list: blank separator,
/// `##` marker, header, entry. The marker line is inert on read since it
/// contains neither brackets nor `=`.
fn push_section(lines: &mut Vec<String>, header: &str, entry: String) {
    lines.push(String::new());
    lines.push("##".to_string());
    lines.push(header.to_string());
    lines.push(entry);
}

fn require_non_empty(text: &str, param: &'static str) -> IniResult<()> {
    if text.is_empty() {
        return Err(IniError::InvalidArgument { param });
    }
    Ok(())
}
