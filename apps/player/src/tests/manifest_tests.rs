use super::*;

use shared::StepId;
use story_core::LoadState;

const STORYBOARD: &str = r#"
[[step]]
source = "Assets/Data/Title.txt"
kind = "title"

[[step]]
source = "Assets/Data/Viz1.csv"
kind = "circle_hierarchy"
caption = "Religious Makeup of the USA"

[[step]]

[[step]]
source = "Assets/Data/Viz1.csv"
kind = "circle_hierarchy"
"#;

#[test]
fn steps_keep_manifest_order_and_placeholders() {
    let table = parse_storyboard(STORYBOARD).expect("parse");
    assert_eq!(table.len(), 4);

    let title = table.resource(StepId(0)).expect("title");
    assert_eq!(title.source(), "Assets/Data/Title.txt");
    assert_eq!(title.kind(), RenderKind::Title);
    assert_eq!(title.caption(), None);

    let chart = table.resource(StepId(1)).expect("chart");
    assert_eq!(chart.caption(), Some("Religious Makeup of the USA"));

    assert!(matches!(table.slot(StepId(2)), Some(Slot::Empty)));
    assert_eq!(
        table.states(),
        vec![
            Some(LoadState::Unloaded),
            Some(LoadState::Unloaded),
            None,
            Some(LoadState::Unloaded)
        ]
    );
}

#[test]
fn repeated_sources_get_their_own_resources() {
    let table = parse_storyboard(STORYBOARD).expect("parse");
    let first = table.resource(StepId(1)).expect("first");
    let again = table.resource(StepId(3)).expect("again");
    assert_eq!(first.source(), again.source());
    assert!(!std::sync::Arc::ptr_eq(first, again));
}

#[test]
fn empty_manifest_is_an_empty_presentation() {
    let table = parse_storyboard("").expect("parse");
    assert!(table.is_empty());
}

#[test]
fn source_without_kind_is_rejected() {
    let err = parse_storyboard("[[step]]\n[[step]]\nsource = \"Viz2.csv\"\n").expect_err("no kind");
    assert!(matches!(err, ManifestError::MissingKind { step: 1 }));
}

#[test]
fn caption_on_placeholder_is_rejected() {
    let err = parse_storyboard("[[step]]\ncaption = \"Lonely\"\n").expect_err("orphan");
    assert!(matches!(
        err,
        ManifestError::OrphanField {
            step: 0,
            field: "caption"
        }
    ));
}

#[test]
fn unknown_kind_is_a_toml_error() {
    let err = parse_storyboard("[[step]]\nsource = \"a.csv\"\nkind = \"scatter\"\n")
        .expect_err("unknown kind");
    assert!(matches!(err, ManifestError::Toml(_)));
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storyboard.toml");
    let err = load_storyboard(&path).expect_err("missing");
    assert!(err.to_string().contains("storyboard.toml"));
}
