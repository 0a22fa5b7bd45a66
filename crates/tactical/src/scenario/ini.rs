//! Sectioned `key=value` text store used for scenario files.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Characters of encoded blob data stored per numbered line.
const BLOB_LINE_LEN: usize = 70;

#[derive(Debug, Error)]
pub enum IniError {
    #[error("failed to read/write ini file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: malformed section header `{text}`")]
    SectionHeader { line: usize, text: String },
    #[error("line {line}: expected `key=value` inside a section, found `{text}`")]
    MalformedLine { line: usize, text: String },
    #[error("[{section}] {key}: `{value}` is not an integer")]
    InvalidInt {
        section: String,
        key: String,
        value: String,
    },
    #[error("[{section}]: data block is not valid base64: {source}")]
    InvalidBlob {
        section: String,
        #[source]
        source: base64::DecodeError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

/// Sections keep the order they were first seen in, entries the order they
/// were first written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniStore {
    sections: Vec<Section>,
}

impl IniStore {
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut store = IniStore::default();
        let mut current: Option<usize> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split(';').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            if let Some(rest) = content.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| IniError::SectionHeader {
                        line,
                        text: content.to_string(),
                    })?;
                current = Some(store.section_index_or_insert(name));
                continue;
            }
            let (Some(section), Some((key, value))) = (current, content.split_once('=')) else {
                return Err(IniError::MalformedLine {
                    line,
                    text: content.to_string(),
                });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(IniError::MalformedLine {
                    line,
                    text: content.to_string(),
                });
            }
            store.sections[section].put(key, value.trim());
        }
        Ok(store)
    }

    pub fn load(path: &Path) -> Result<Self, IniError> {
        let text = fs::read_to_string(path).map_err(|source| IniError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Writes through a temporary file so a failed save leaves the old file.
    pub fn save(&self, path: &Path) -> Result<(), IniError> {
        let io_error = |source| IniError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);
        fs::write(&tmp_path, self.to_string()).map_err(io_error)?;
        if let Err(source) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_error(source));
        }
        Ok(())
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(index) = self.sections.iter().position(|section| section.name == name) {
            return index;
        }
        self.sections.push(Section {
            name: name.to_string(),
            entries: Vec::new(),
        });
        self.sections.len() - 1
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|section| section.name.as_str())
    }

    /// Entries of a section in file order; empty when the section is absent.
    pub fn entries<'a>(&'a self, section: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.section(section)
            .into_iter()
            .flat_map(|section| section.entries.iter())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn get_string(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Missing keys yield `default`; present ones must parse.
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> Result<i32, IniError> {
        let Some(value) = self.get_string(section, key) else {
            return Ok(default);
        };
        value.parse().map_err(|_| IniError::InvalidInt {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn put_string(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let index = self.section_index_or_insert(section);
        self.sections[index].put(key, value);
    }

    pub fn put_int(&mut self, section: &str, key: &str, value: i32) {
        self.put_string(section, key, value.to_string());
    }

    /// Empties a section, keeping its place in the file.
    pub fn clear_section(&mut self, section: &str) {
        if let Some(found) = self.sections.iter_mut().find(|found| found.name == section) {
            found.entries.clear();
        }
    }

    /// Stores binary data as base64 spread over numbered lines `1=`, `2=`,
    /// ... replacing whatever the section held.
    pub fn put_blob(&mut self, section: &str, data: &[u8]) {
        self.clear_section(section);
        let encoded = STANDARD.encode(data);
        let index = self.section_index_or_insert(section);
        for (number, chunk) in encoded.as_bytes().chunks(BLOB_LINE_LEN).enumerate() {
            let line = String::from_utf8_lossy(chunk).into_owned();
            self.sections[index].put(&(number + 1).to_string(), line);
        }
    }

    /// Reassembles a block written by [`IniStore::put_blob`]. Lines are
    /// joined in numeric order; an absent section is an empty block.
    pub fn get_blob(&self, section: &str) -> Result<Vec<u8>, IniError> {
        let Some(found) = self.section(section) else {
            return Ok(Vec::new());
        };
        let mut lines: Vec<(u32, &str)> = found
            .entries
            .iter()
            .filter_map(|(key, value)| key.parse().ok().map(|number| (number, value.as_str())))
            .collect();
        lines.sort_by_key(|(number, _)| *number);
        let joined: String = lines.into_iter().map(|(_, value)| value).collect();
        STANDARD
            .decode(joined.as_bytes())
            .map_err(|source| IniError::InvalidBlob {
                section: section.to_string(),
                source,
            })
    }
}

impl Section {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    fn put(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }
}

impl fmt::Display for IniStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{key}={value}")?;
            }
        }
        Ok(())
    }
}
