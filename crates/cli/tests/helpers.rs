use pbxsync::commands::identifier_for;
use pbxsync::default_log_filter;
use pbxsync_core::ident::Identifier;

#[test]
fn identifier_for_applies_role_prefix() {
    assert_eq!(identifier_for("Models/Truck.swift", None), Identifier::for_seed("Models/Truck.swift"));
    assert_eq!(
        identifier_for("Models/Truck.swift", Some("build")),
        Identifier::for_seed("build-Models/Truck.swift")
    );
}

#[test]
fn default_log_filter_tracks_verbosity() {
    assert_eq!(default_log_filter(false), "pbxsync=info,pbxsync_core=info");
    assert_eq!(default_log_filter(true), "pbxsync=debug,pbxsync_core=debug");
}
