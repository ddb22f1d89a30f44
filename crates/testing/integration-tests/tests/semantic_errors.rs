//! End-to-end semantic error reporting
//!
//! Each test parses fixture text through the registry and checks the exact
//! rendered error list that `process()` returns.

use expect_test::expect;
use integration_tests::TestFixture;
use yg_driver::{Modules, ProcessOptions};

#[test]
fn test_bad_fixture_reports_every_defect_in_order() {
    let mut fixture = TestFixture::fixture("bad").unwrap();
    let errors = fixture.process_rendered();
    expect![[r#"
        bad.yang:9:3: invalid config value: bad
        bad.yang:14:5: invalid config value: incorrect
        bad.yang:17:7: unknown type: base:unknown
        bad.yang:20:5: duplicate key: bob
        bad.yang:22:5: unknown group: the-beatles
        bad.yang:25:3: augment element not found: nothing
        bad.yang:35:5: duplicate key: one
    "#]]
    .assert_eq(&errors);
}

#[test]
fn test_processing_is_repeatable() {
    let mut fixture = TestFixture::fixture("bad").unwrap();
    let first = fixture.process_rendered();
    let second = fixture.process_rendered();
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 7);
}

#[test]
fn test_clean_modules_report_nothing() {
    let mut fixture = TestFixture::fixture("clean").unwrap();
    let errors = fixture.process();
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn test_grouping_defects_reported_without_any_uses() {
    let mut fixture = TestFixture::new();
    fixture
        .add_source(
            "g.yang",
            "module g {\n  prefix g;\n  grouping unused {\n    leaf x { type string; }\n    leaf x { type string; }\n  }\n}\n",
        )
        .unwrap();
    expect![[r#"
        g.yang:5:5: duplicate key: x
    "#]]
    .assert_eq(&fixture.process_rendered());
}

#[test]
fn test_grouping_defects_reported_once_for_many_uses() {
    let mut fixture = TestFixture::new();
    fixture
        .add_source(
            "g.yang",
            "module g {\n  prefix g;\n  container a { uses pair; }\n  container b { uses pair; }\n  grouping pair {\n    leaf x { type bogus; }\n  }\n}\n",
        )
        .unwrap();
    expect![[r#"
        g.yang:6:14: unknown type: g:bogus
    "#]]
    .assert_eq(&fixture.process_rendered());
}

#[test]
fn test_grouping_built_by_earlier_uses_reports_at_definition() {
    let mut fixture = TestFixture::new();
    fixture
        .add_source(
            "f.yang",
            "module f {\n  prefix f;\n  container a { uses g; }\n  container b { config bad; }\n  grouping g {\n    leaf x { type string; }\n    leaf x { type string; }\n  }\n}\n",
        )
        .unwrap();
    expect![[r#"
        f.yang:4:3: invalid config value: bad
        f.yang:7:5: duplicate key: x
    "#]]
    .assert_eq(&fixture.process_rendered());
}

#[test]
fn test_unreachable_augment_body_is_never_checked() {
    let mut fixture = TestFixture::new();
    fixture
        .add_source(
            "a.yang",
            "module a {\n  prefix a;\n  augment /a:gone/a:away {\n    leaf x { type nothing; config maybe; }\n    leaf x { type string; }\n    uses nowhere;\n  }\n}\n",
        )
        .unwrap();
    expect![[r#"
        a.yang:3:3: augment element not found: /a:gone/a:away
    "#]]
    .assert_eq(&fixture.process_rendered());
}

#[test]
fn test_augment_collision_with_existing_child() {
    let mut fixture = TestFixture::new();
    fixture
        .add_source(
            "a.yang",
            "module a {\n  prefix a;\n  container c { leaf x { type string; } }\n  augment /a:c {\n    leaf x { type string; }\n  }\n}\n",
        )
        .unwrap();
    expect![[r#"
        a.yang:5:5: duplicate key: x
    "#]]
    .assert_eq(&fixture.process_rendered());
}

#[test]
fn test_errors_span_modules_in_registration_order() {
    let mut modules = Modules::new();
    modules
        .parse("module z {\n  prefix z;\n  uses missing;\n}\n", "z.yang")
        .unwrap();
    modules
        .parse("module a {\n  prefix a;\n  leaf l { config no; type string; }\n}\n", "a.yang")
        .unwrap();
    let rendered: Vec<String> = modules.process().iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "z.yang:3:3: unknown group: missing",
            "a.yang:3:3: invalid config value: no",
        ]
    );
}

#[test]
fn test_syntax_error_is_fatal_only_to_its_module() {
    let mut modules = Modules::new();
    let error = modules
        .parse("module broken {\n  leaf x {\n", "broken.yang")
        .unwrap_err();
    assert!(error.to_string().starts_with("broken.yang:"), "{error}");

    modules
        .parse("module fine {\n  prefix f;\n  container c { config sideways; }\n}\n", "fine.yang")
        .unwrap();
    let rendered: Vec<String> = modules.process().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["fine.yang:3:3: invalid config value: sideways"]);
    assert!(modules.entry_tree("broken.yang").is_none());
}

#[test]
fn test_strict_foreign_types() {
    let text = "module m {\n  prefix m;\n  import other { prefix o; }\n  leaf a {\n    type o:thing;\n  }\n}\n";

    let mut lenient = Modules::new();
    lenient.parse(text, "m.yang").unwrap();
    assert!(lenient.process().is_empty());

    let mut strict = Modules::with_options(ProcessOptions::new().with_strict_foreign_types(true));
    strict.parse(text, "m.yang").unwrap();
    let rendered: Vec<String> = strict.process().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["m.yang:5:5: unknown type: o:thing"]);
}
