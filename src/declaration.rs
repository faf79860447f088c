//! Declaration store for the `depends.cfg` manifest
//!
//! The manifest is line-oriented: blank lines and `#` comments are kept
//! verbatim, and each dependency is declared as
//!
//! ```text
//! name = ">=1.2,<2.0"   # optional trailing comment
//! ```
//!
//! Rewriting one entry replaces only the quoted value of that entry's line;
//! indentation, spacing around `=`, trailing comments and every other line
//! survive byte-for-byte. That keeps the rewrite safe to run repeatedly over
//! a file humans also edit.

use crate::error::DeclarationError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File name the store looks for
pub const DECLARATION_FILE_NAME: &str = "depends.cfg";

#[derive(Debug, Clone)]
enum Line {
    /// Blank line or comment, reproduced untouched
    Verbatim(String),
    /// A dependency entry, reassembled around the current value
    Entry(Entry),
}

#[derive(Debug, Clone)]
struct Entry {
    indent: String,
    name: String,
    separator: String,
    value: String,
    trailing: String,
}

impl Entry {
    fn render(&self) -> String {
        format!(
            "{}{}{}\"{}\"{}",
            self.indent, self.name, self.separator, self.value, self.trailing
        )
    }
}

fn entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(\s*)([A-Za-z0-9._\[\]-]+)(\s*=\s*)"([^"]*)"(.*)$"#).unwrap()
    })
}

/// The parsed declaration file, able to rewrite single entries in place
#[derive(Debug)]
pub struct DeclarationFile {
    path: PathBuf,
    lines: Vec<Line>,
}

impl DeclarationFile {
    /// Find the declaration file in `dir` or one of its immediate
    /// subdirectories
    pub fn discover(dir: &Path) -> Result<PathBuf, DeclarationError> {
        let direct = dir.join(DECLARATION_FILE_NAME);
        if direct.is_file() {
            return Ok(direct);
        }

        let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|source| DeclarationError::read(dir, source))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        subdirs.sort();

        for subdir in subdirs {
            let candidate = subdir.join(DECLARATION_FILE_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        Err(DeclarationError::not_found(dir))
    }

    /// Load and parse the declaration file
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, DeclarationError> {
        let path = path.into();
        let content =
            fs::read_to_string(&path).map_err(|source| DeclarationError::read(&path, source))?;

        let mut lines = Vec::new();
        for (number, raw) in content.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                lines.push(Line::Verbatim(raw.to_string()));
                continue;
            }

            let captures =
                entry_regex()
                    .captures(raw)
                    .ok_or_else(|| DeclarationError::MalformedEntry {
                        path: path.clone(),
                        line: number + 1,
                        content: raw.to_string(),
                    })?;

            lines.push(Line::Entry(Entry {
                indent: captures[1].to_string(),
                name: captures[2].to_string(),
                separator: captures[3].to_string(),
                value: captures[4].to_string(),
                trailing: captures[5].to_string(),
            }));
        }

        Ok(Self { path, lines })
    }

    /// The file this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every declared entry as `(name, constraint expression)`, in file order
    pub fn entries(&self) -> Vec<(String, String)> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Line::Entry(entry) => Some((entry.name.clone(), entry.value.clone())),
                Line::Verbatim(_) => None,
            })
            .collect()
    }

    /// The current constraint expression of one entry
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry(entry) if entry.name == name => Some(entry.value.as_str()),
            _ => None,
        })
    }

    /// Replace the value of one entry and persist the whole file
    ///
    /// Only the quoted value changes; all other bytes are written back as
    /// they were read.
    pub fn write_entry(&mut self, name: &str, new_value: &str) -> Result<(), DeclarationError> {
        let entry = self
            .lines
            .iter_mut()
            .find_map(|line| match line {
                Line::Entry(entry) if entry.name == name => Some(entry),
                _ => None,
            })
            .ok_or_else(|| DeclarationError::unknown_entry(&self.path, name))?;

        entry.value = new_value.to_string();
        self.persist()
    }

    fn persist(&self) -> Result<(), DeclarationError> {
        fs::write(&self.path, self.render())
            .map_err(|source| DeclarationError::write(&self.path, source))
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Verbatim(raw) => out.push_str(raw),
                Line::Entry(entry) => out.push_str(&entry.render()),
            }
            out.push('\n');
        }
        out
    }
}
