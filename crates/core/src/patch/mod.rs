//! Positional patching of raw manifest text.
//!
//! The patcher never parses the manifest. It locates anchors by text search,
//! resolves each to the closing delimiter of its block, and splices rendered
//! fragments in right before that delimiter. Passes run in a fixed order
//! (declarations, build phase, then each group) and every pass re-locates its
//! anchor in the output of the previous one.
//!
//! Only the declarations sentinel is mandatory. A missing build-phase or group
//! anchor skips that pass and is recorded in the `PatchReport`.

mod scan;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::format::FragmentSet;
use crate::model::Category;

use scan::ScanMiss;

/// Error type for manifest patching.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    /// The marker ending the declarations section is absent. Without it no
    /// identifier can be declared, so nothing else may be inserted either.
    #[error("Manifest has no declarations sentinel `{sentinel}`")]
    MissingSentinel { sentinel: String },
}

/// Anchor tokens the patcher uses to find its insertion points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorMap {
    /// Marker text ending the declarations section.
    pub declarations_sentinel: String,
    /// Identifier of the sources build-phase block.
    pub build_phase: String,
    /// Identifier of each category's group block. Entries read from a config
    /// are merged over the defaults; an empty token turns a group off.
    #[serde(deserialize_with = "merge_default_groups")]
    pub groups: BTreeMap<Category, String>,
    /// Key of the member list inside a group block.
    pub member_list_key: String,
}

fn merge_default_groups<'de, D>(deserializer: D) -> Result<BTreeMap<Category, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<Category, String>::deserialize(deserializer)?;
    let mut groups = AnchorMap::default().groups;
    groups.extend(overrides);
    Ok(groups)
}

fn default_member_list_key() -> String {
    "children".to_string()
}

impl AnchorMap {
    /// Anchor for `category`, or `None` when it is absent or blank.
    pub fn group(&self, category: Category) -> Option<&str> {
        self.groups.get(&category).map(|a| a.trim()).filter(|a| !a.is_empty())
    }
}

impl Default for AnchorMap {
    fn default() -> Self {
        let groups = [
            (Category::Model, "1A1A1A0C1A1A1A1A1A1A1A0C"),
            (Category::View, "1A1A1A0D1A1A1A1A1A1A1A0D"),
            (Category::ViewModel, "1A1A1A0E1A1A1A1A1A1A0E"),
            (Category::Service, "1A1A1A0F1A1A1A1A1A1A0F"),
            (Category::Utility, "1A1A1A101A1A1A1A1A1A10"),
            (Category::PersistenceLayer, "1A1A1A111A1A1A1A1A1A11"),
        ]
        .into_iter()
        .map(|(category, anchor)| (category, anchor.to_string()))
        .collect();

        Self {
            declarations_sentinel: "/* End PBXFileReference section */".to_string(),
            build_phase: "1A1A1A051A1A1A1A1A1A1A05".to_string(),
            groups,
            member_list_key: default_member_list_key(),
        }
    }
}

/// One insertion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum Section {
    Declarations,
    BuildPhase,
    Group(Category),
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Declarations => f.write_str("declarations"),
            Section::BuildPhase => f.write_str("build phase"),
            Section::Group(category) => write!(f, "{category} group"),
        }
    }
}

/// Why a best-effort pass inserted nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No anchor configured for the section.
    NoAnchor,
    AnchorNotFound,
    /// The anchor is defined more than once.
    AmbiguousAnchor,
    UnbalancedBlock,
    /// The group block has no member list.
    MissingMemberList,
}

impl From<ScanMiss> for SkipReason {
    fn from(miss: ScanMiss) -> Self {
        match miss {
            ScanMiss::NotFound => SkipReason::AnchorNotFound,
            ScanMiss::Ambiguous => SkipReason::AmbiguousAnchor,
            ScanMiss::Unbalanced => SkipReason::UnbalancedBlock,
            ScanMiss::MissingMemberList => SkipReason::MissingMemberList,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoAnchor => "no anchor configured",
            SkipReason::AnchorNotFound => "anchor not found",
            SkipReason::AmbiguousAnchor => "anchor defined more than once",
            SkipReason::UnbalancedBlock => "anchor block is unbalanced",
            SkipReason::MissingMemberList => "anchor block has no member list",
        };
        f.write_str(text)
    }
}

/// Result of a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SectionResult {
    Inserted(usize),
    /// No fragments for this section.
    Empty,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOutcome {
    pub section: Section,
    pub result: SectionResult,
}

/// Per-section results of a patch, in pass order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchReport {
    pub sections: Vec<SectionOutcome>,
}

impl PatchReport {
    fn record(&mut self, section: Section, result: SectionResult) {
        self.sections.push(SectionOutcome { section, result });
    }

    pub fn result(&self, section: Section) -> Option<SectionResult> {
        self.sections.iter().find(|o| o.section == section).map(|o| o.result)
    }

    /// Number of fragments inserted into `section`.
    pub fn inserted(&self, section: Section) -> usize {
        match self.result(section) {
            Some(SectionResult::Inserted(n)) => n,
            _ => 0,
        }
    }

    /// Sections whose fragments were dropped.
    pub fn skipped(&self) -> impl Iterator<Item = (Section, SkipReason)> + '_ {
        self.sections.iter().filter_map(|o| match o.result {
            SectionResult::Skipped(reason) => Some((o.section, reason)),
            _ => None,
        })
    }
}

/// Patched manifest text together with what happened to each section.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub text: String,
    pub report: PatchReport,
}

/// Splices rendered fragments into manifest text.
#[derive(Debug, Clone)]
pub struct ManifestPatcher<'a> {
    anchors: &'a AnchorMap,
}

impl<'a> ManifestPatcher<'a> {
    pub fn new(anchors: &'a AnchorMap) -> Self {
        Self { anchors }
    }

    /// Apply every pass to `manifest` and return the updated text.
    ///
    /// Fails only when the declarations sentinel is missing, in which case no
    /// text is produced at all.
    pub fn patch(&self, manifest: &str, fragments: &FragmentSet) -> Result<PatchOutcome, PatchError> {
        let sentinel = self.anchors.declarations_sentinel.as_str();
        let found = if sentinel.is_empty() { None } else { manifest.find(sentinel) };
        let sentinel_at =
            found.ok_or_else(|| PatchError::MissingSentinel { sentinel: sentinel.to_string() })?;

        let mut text = manifest.to_string();
        let mut report = PatchReport::default();

        let declared = self.insert_at(&mut text, sentinel_at, &fragments.declarations);
        info!(count = declared, "inserted file declarations");
        report.record(Section::Declarations, section_result(declared));

        let build = self.build_phase_pass(&mut text, &fragments.build_associations);
        report.record(Section::BuildPhase, build);

        for category in Category::GROUPED {
            let result = self.group_pass(&mut text, category, fragments.group(category));
            report.record(Section::Group(category), result);
        }

        Ok(PatchOutcome { text, report })
    }

    fn build_phase_pass(&self, text: &mut String, fragments: &[String]) -> SectionResult {
        if fragments.is_empty() {
            return SectionResult::Empty;
        }
        let current = text.as_str();
        let located = scan::find_definition(current, &self.anchors.build_phase)
            .and_then(|open| scan::matching_close(current, open));
        match located {
            Ok(close) => {
                let n = self.insert_at(text, close, fragments);
                info!(count = n, anchor = %self.anchors.build_phase, "inserted build associations");
                SectionResult::Inserted(n)
            }
            Err(miss) => skip(Section::BuildPhase, miss.into()),
        }
    }

    fn group_pass(&self, text: &mut String, category: Category, fragments: &[String]) -> SectionResult {
        let section = Section::Group(category);
        if fragments.is_empty() {
            return SectionResult::Empty;
        }
        let Some(anchor) = self.anchors.group(category) else {
            return skip(section, SkipReason::NoAnchor);
        };
        let current = text.as_str();
        let located = scan::find_definition(current, anchor).and_then(|open| {
            let close = scan::matching_close(current, open)?;
            scan::member_list_close(current, open, close, &self.anchors.member_list_key)
        });
        match located {
            Ok(list_close) => {
                let n = self.insert_at(text, list_close, fragments);
                info!(count = n, %anchor, %section, "inserted group members");
                SectionResult::Inserted(n)
            }
            Err(miss) => skip(section, miss.into()),
        }
    }

    /// Insert `fragments`, in order, right before the delimiter at `delim`.
    fn insert_at(&self, text: &mut String, delim: usize, fragments: &[String]) -> usize {
        if fragments.is_empty() {
            return 0;
        }
        let (at, needs_newline) = scan::insertion_point(text, delim);
        let mut payload = String::new();
        if needs_newline {
            payload.push('\n');
        }
        for fragment in fragments {
            payload.push_str(fragment);
            if !fragment.ends_with('\n') {
                payload.push('\n');
            }
        }
        debug!(offset = at, bytes = payload.len(), "splicing fragments");
        text.insert_str(at, &payload);
        fragments.len()
    }
}

fn section_result(inserted: usize) -> SectionResult {
    match inserted {
        0 => SectionResult::Empty,
        n => SectionResult::Inserted(n),
    }
}

fn skip(section: Section, reason: SkipReason) -> SectionResult {
    warn!(%section, %reason, "skipping insertion");
    SectionResult::Skipped(reason)
}
