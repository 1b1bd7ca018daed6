use pbxsync_core::classify::Classifier;
use pbxsync_core::format::{EntryFormatter, FragmentSet};
use pbxsync_core::model::{Category, Entry, SourcePath};
use pbxsync_core::patch::{
    AnchorMap, ManifestPatcher, PatchError, Section, SectionResult, SkipReason,
};

const FIXTURE: &str = include_str!("fixtures/project.pbxproj");

const MODELS_HEADER: &str = "\t\t1A1A1A0C1A1A1A1A1A1A1A0C /* Models */ = {";
const UTILITIES_HEADER: &str = "\t\t1A1A1A101A1A1A1A1A1A10 /* Utilities */ = {";
const SOURCES_HEADER: &str = "\t\t1A1A1A051A1A1A1A1A1A1A05 /* Sources */ = {";

fn entries(paths: &[&str]) -> Vec<Entry> {
    let classifier = Classifier::default();
    paths
        .iter()
        .map(|p| {
            let path = SourcePath::new(*p);
            let category = classifier.classify(&path);
            Entry::new(path, category)
        })
        .collect()
}

fn render(paths: &[&str]) -> (Vec<Entry>, FragmentSet) {
    let entries = entries(paths);
    let fragments = EntryFormatter::default().render(&entries);
    (entries, fragments)
}

/// Text of the block starting at `header`, up to and including its `};` line.
fn block<'a>(text: &'a str, header: &str) -> &'a str {
    let start = text.find(header).expect("block header");
    let end = start + text[start..].find("\n\t\t};").expect("block end") + "\n\t\t};".len();
    &text[start..end]
}

fn remove_block(text: &str, header: &str) -> String {
    let body = block(text, header).to_string();
    text.replacen(&format!("{body}\n"), "", 1)
}

fn is_line_subsequence(original: &str, patched: &str) -> bool {
    let mut patched_lines = patched.lines();
    original.lines().all(|line| patched_lines.any(|p| p == line))
}

#[test]
fn model_file_lands_only_in_model_group() {
    let anchors = AnchorMap::default();
    let (entries, fragments) = render(&["Models/Truck.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");

    let id = entries[0].id.as_str();
    let models = block(&outcome.text, MODELS_HEADER);
    assert!(models.contains(&format!("\t\t\t\t{id} /* Models/Truck.swift */,\n\t\t\t);")));

    // Declaration, build association, and one group membership.
    assert_eq!(outcome.text.matches(id).count(), 3);
    assert_eq!(outcome.report.inserted(Section::Group(Category::Model)), 1);
    assert_eq!(outcome.report.result(Section::Group(Category::View)), Some(SectionResult::Empty));
}

#[test]
fn uncategorized_file_gets_no_group_membership() {
    let anchors = AnchorMap::default();
    let (entries, fragments) = render(&["Unrelated/Thing.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");

    let id = entries[0].id.as_str();
    assert_eq!(outcome.text.matches(id).count(), 2, "declaration and build association only");
    assert!(!outcome.text.contains(&format!("{id} /* Unrelated/Thing.swift */,")));
    assert_eq!(outcome.report.inserted(Section::Declarations), 1);
    assert_eq!(outcome.report.inserted(Section::BuildPhase), 1);
    for category in Category::GROUPED {
        assert_eq!(outcome.report.result(Section::Group(category)), Some(SectionResult::Empty));
    }
}

#[test]
fn declarations_go_right_before_the_sentinel() {
    let anchors = AnchorMap::default();
    let (entries, fragments) = render(&["Views/LoginView.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");

    let expected = format!(
        "\t\t{} /* Views/LoginView.swift */ = {{isa = PBXFileReference; lastKnownFileType = sourcecode.swift; name = LoginView.swift; path = Views/LoginView.swift; sourceTree = \"<group>\"; }};\n/* End PBXFileReference section */",
        entries[0].id
    );
    assert!(outcome.text.contains(&expected));
}

#[test]
fn build_associations_close_the_sources_block() {
    let anchors = AnchorMap::default();
    let (entries, fragments) = render(&["Services/AuthService.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");

    let sources = block(&outcome.text, SOURCES_HEADER);
    let expected = format!(
        "\t\t\trunOnlyForDeploymentPostprocessing = 0;\n\t\t{} /* Services/AuthService.swift in Sources */ = {{isa = PBXBuildFile; fileRef = {} /* Services/AuthService.swift */; }};\n\t\t}};",
        entries[0].build_id, entries[0].id
    );
    assert!(sources.ends_with(&expected), "sources block was:\n{sources}");
}

#[test]
fn patching_is_strictly_additive() {
    let anchors = AnchorMap::default();
    let (_, fragments) = render(&[
        "Models/Truck.swift",
        "Views/JobListView.swift",
        "ViewModels/JobViewModel.swift",
        "Services/AuthService.swift",
        "Utilities/Formatters.swift",
        "CoreData/Persistence.swift",
        "Unrelated/Thing.swift",
    ]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");

    assert!(is_line_subsequence(FIXTURE, &outcome.text));
    let added = outcome.text.lines().count() - FIXTURE.lines().count();
    // 7 declarations + 7 build associations + 6 group memberships.
    assert_eq!(added, 20);
}

#[test]
fn every_reference_is_declared_earlier() {
    let anchors = AnchorMap::default();
    let (entries, fragments) = render(&["Models/Truck.swift", "Views/MapView.swift", "Misc/Extra.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");
    let text = &outcome.text;

    let sentinel = text.find("/* End PBXFileReference section */").expect("sentinel");
    for entry in &entries {
        let declaration = text
            .find(&format!("{} /* {} */ = {{isa = PBXFileReference;", entry.id, entry.path))
            .expect("declaration present");
        assert!(declaration < sentinel, "declaration lives in the declarations section");

        let build = text
            .find(&format!("fileRef = {} /*", entry.id))
            .expect("build association present");
        assert!(declaration < build);

        if let Some(member) = text.find(&format!("\t\t\t\t{} /* {} */,", entry.id, entry.path)) {
            assert!(declaration < member);
        }
    }
}

#[test]
fn missing_sentinel_aborts_before_any_output() {
    let anchors = AnchorMap::default();
    let broken = FIXTURE.replace("/* End PBXFileReference section */", "");
    let (_, fragments) = render(&["Models/Truck.swift"]);

    let err = ManifestPatcher::new(&anchors).patch(&broken, &fragments).unwrap_err();
    assert_eq!(
        err,
        PatchError::MissingSentinel { sentinel: "/* End PBXFileReference section */".into() }
    );
}

#[test]
fn empty_sentinel_is_treated_as_missing() {
    let anchors = AnchorMap { declarations_sentinel: String::new(), ..AnchorMap::default() };
    let (_, fragments) = render(&["Models/Truck.swift"]);
    let result = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments);
    assert!(matches!(result, Err(PatchError::MissingSentinel { .. })));
}

#[test]
fn missing_group_block_only_skips_that_group() {
    let anchors = AnchorMap::default();
    let manifest = remove_block(FIXTURE, UTILITIES_HEADER);
    let (entries, fragments) =
        render(&["Models/Truck.swift", "Utilities/Formatters.swift", "CoreData/Persistence.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(&manifest, &fragments).expect("patch");

    assert_eq!(
        outcome.report.result(Section::Group(Category::Utility)),
        Some(SectionResult::Skipped(SkipReason::AnchorNotFound))
    );
    assert_eq!(outcome.report.inserted(Section::Group(Category::Model)), 1);
    assert_eq!(outcome.report.inserted(Section::Group(Category::PersistenceLayer)), 1);

    let utility_id = entries[1].id.as_str();
    assert!(!outcome.text.contains(&format!("\t\t\t\t{utility_id} /* Utilities/Formatters.swift */,")));
    // Still declared and built.
    assert_eq!(outcome.text.matches(utility_id).count(), 2);
    assert_eq!(outcome.report.skipped().count(), 1);
}

#[test]
fn missing_build_phase_is_not_fatal() {
    let anchors = AnchorMap::default();
    let manifest = remove_block(FIXTURE, SOURCES_HEADER);
    let (_, fragments) = render(&["Models/Truck.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(&manifest, &fragments).expect("patch");

    assert_eq!(
        outcome.report.result(Section::BuildPhase),
        Some(SectionResult::Skipped(SkipReason::AnchorNotFound))
    );
    assert!(!outcome.text.contains("in Sources */ = {isa = PBXBuildFile; fileRef = 1B"));
    assert_eq!(outcome.report.inserted(Section::Group(Category::Model)), 1);
}

#[test]
fn unbalanced_group_block_is_left_alone() {
    let anchors = AnchorMap::default();
    let manifest = FIXTURE.replacen(
        "1A1A1A0C1A1A1A1A1A1A1A0C /* Models */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t);",
        "1A1A1A0C1A1A1A1A1A1A1A0C /* Models */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t};",
        1,
    );
    assert_ne!(manifest, FIXTURE);
    let (_, fragments) = render(&["Models/Truck.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(&manifest, &fragments).expect("patch");

    assert_eq!(
        outcome.report.result(Section::Group(Category::Model)),
        Some(SectionResult::Skipped(SkipReason::UnbalancedBlock))
    );
    assert!(block(&outcome.text, MODELS_HEADER).starts_with(block(&manifest, MODELS_HEADER)));
}

#[test]
fn group_members_keep_discovery_order() {
    let anchors = AnchorMap::default();
    let (entries, fragments) =
        render(&["Models/Zeppelin.swift", "Models/Anchor.swift", "Models/Mango.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");

    let models = block(&outcome.text, MODELS_HEADER);
    let positions: Vec<usize> = entries
        .iter()
        .map(|e| models.find(&format!("{} /* {} */,", e.id, e.path)).expect("member"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "positions {positions:?}");
}

#[test]
fn inline_member_list_receives_fragments_on_new_lines() {
    let anchors = AnchorMap::default();
    let manifest = FIXTURE.replacen(
        "isa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t);\n\t\t\tpath = Views;",
        "isa = PBXGroup;\n\t\t\tchildren = ();\n\t\t\tpath = Views;",
        1,
    );
    let (entries, fragments) = render(&["Views/MapView.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(&manifest, &fragments).expect("patch");

    let expected = format!("children = (\n\t\t\t\t{} /* Views/MapView.swift */,\n);", entries[0].id);
    assert!(outcome.text.contains(&expected));
}

#[test]
fn configured_anchors_replace_the_defaults() {
    let mut anchors = AnchorMap::default();
    anchors.groups.insert(Category::Model, "1A1A1A0D1A1A1A1A1A1A1A0D".into());
    let (entries, fragments) = render(&["Models/Truck.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");

    let views = block(&outcome.text, "\t\t1A1A1A0D1A1A1A1A1A1A1A0D /* Views */ = {");
    assert!(views.contains(entries[0].id.as_str()));
    assert!(!block(&outcome.text, MODELS_HEADER).contains(entries[0].id.as_str()));
}

#[test]
fn group_without_configured_anchor_is_skipped() {
    let mut anchors = AnchorMap::default();
    anchors.groups.remove(&Category::Service);
    let (_, fragments) = render(&["Services/AuthService.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");
    assert_eq!(
        outcome.report.result(Section::Group(Category::Service)),
        Some(SectionResult::Skipped(SkipReason::NoAnchor))
    );
}

#[test]
fn blank_group_anchor_is_treated_as_unconfigured() {
    let mut anchors = AnchorMap::default();
    anchors.groups.insert(Category::Service, "  ".into());
    let (_, fragments) = render(&["Services/AuthService.swift"]);
    let outcome = ManifestPatcher::new(&anchors).patch(FIXTURE, &fragments).expect("patch");
    assert_eq!(
        outcome.report.result(Section::Group(Category::Service)),
        Some(SectionResult::Skipped(SkipReason::NoAnchor))
    );
}

#[test]
fn empty_fragment_set_leaves_text_untouched() {
    let anchors = AnchorMap::default();
    let outcome =
        ManifestPatcher::new(&anchors).patch(FIXTURE, &FragmentSet::default()).expect("patch");
    assert_eq!(outcome.text, FIXTURE);
    assert_eq!(outcome.report.skipped().count(), 0);
}
