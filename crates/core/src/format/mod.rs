//! Rendering of entries into manifest fragments.
//!
//! Each entry contributes up to three fragments:
//! - a declaration (`PBXFileReference`) for its file identifier,
//! - a build association (`PBXBuildFile`) tying its build identifier to the file,
//! - a group membership line for its category's group, when it has one.
//!
//! Every fragment is one complete line ending in `\n`. Values outside the
//! manifest's bare-word set are quoted, and `*/` never appears inside a comment.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Category, Entry};

/// Default `lastKnownFileType` for declarations.
pub const DEFAULT_FILE_TYPE: &str = "sourcecode.swift";

/// Renders entries with fixed templates.
#[derive(Debug, Clone)]
pub struct EntryFormatter {
    file_type: String,
}

impl EntryFormatter {
    pub fn new(file_type: impl Into<String>) -> Self {
        Self { file_type: file_type.into() }
    }

    pub fn declaration(&self, entry: &Entry) -> String {
        format!(
            "\t\t{id} /* {comment} */ = {{isa = PBXFileReference; lastKnownFileType = {file_type}; name = {name}; path = {path}; sourceTree = \"<group>\"; }};\n",
            id = entry.id,
            comment = comment(entry.path.as_str()),
            file_type = self.file_type,
            name = quoted(entry.path.file_name()),
            path = quoted(entry.path.as_str()),
        )
    }

    pub fn build_association(&self, entry: &Entry) -> String {
        format!(
            "\t\t{build_id} /* {comment} in Sources */ = {{isa = PBXBuildFile; fileRef = {id} /* {comment} */; }};\n",
            build_id = entry.build_id,
            comment = comment(entry.path.as_str()),
            id = entry.id,
        )
    }

    pub fn group_membership(&self, entry: &Entry) -> String {
        format!("\t\t\t\t{id} /* {comment} */,\n", id = entry.id, comment = comment(entry.path.as_str()))
    }

    /// Render all entries, keeping their relative order within every list.
    pub fn render(&self, entries: &[Entry]) -> FragmentSet {
        let mut set = FragmentSet::default();
        for entry in entries {
            set.declarations.push(self.declaration(entry));
            set.build_associations.push(self.build_association(entry));
            if entry.category.is_grouped() {
                set.groups.entry(entry.category).or_default().push(self.group_membership(entry));
            }
        }
        set
    }
}

/// Whether `value` can be written without quotes.
fn is_bare(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_alphanumeric() || b"_$+/:.-".contains(&b))
}

/// `value` as a manifest value, quoted and escaped when it is not a bare word.
fn quoted(value: &str) -> Cow<'_, str> {
    if is_bare(value) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

/// `value` made safe to embed in a `/* */` comment.
fn comment(value: &str) -> Cow<'_, str> {
    if value.contains("*/") {
        Cow::Owned(value.replace("*/", "* /"))
    } else {
        Cow::Borrowed(value)
    }
}

impl Default for EntryFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_TYPE)
    }
}

/// Rendered fragments grouped by the section they go into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSet {
    pub declarations: Vec<String>,
    pub build_associations: Vec<String>,
    pub groups: BTreeMap<Category, Vec<String>>,
}

impl FragmentSet {
    /// Group membership fragments for `category`, empty when it has none.
    pub fn group(&self, category: Category) -> &[String] {
        self.groups.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}
