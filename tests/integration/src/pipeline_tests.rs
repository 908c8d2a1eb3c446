//! End-to-end tests of the boot pipeline
//!
//! Each test starts from a YAML document, collects overrides from an
//! environment snapshot and flag values, merges, and checks the result.

use pretty_assertions::assert_eq;
use rk_boot::{BootLoader, LoadedTree, Node, OverrideSources, Rendered};
use rk_override::DiscardReason;
use rk_test_utils::{BootFixture, GIN_BOOT, env_vars};
use serde::Deserialize;

fn load(document: &str, env: &[(&str, &str)], flags: &[&str]) -> LoadedTree {
    let sources = OverrideSources::new()
        .with_env(env_vars(env))
        .with_flags(flags.iter().copied());
    BootLoader::new().load_tree(document, &sources).unwrap()
}

fn yaml(node: &Node) -> String {
    serde_yaml::to_string(&Rendered(node)).unwrap()
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_flag_beats_environment_beats_document() {
    let loaded = load("a: 1\n", &[("RK_A", "2")], &["a=3"]);

    assert_eq!(loaded.tree.get("a"), Some(&Node::scalar("3")));
    assert_eq!(loaded.env_report.replaced, 1);
    assert_eq!(loaded.flag_report.replaced, 1);
}

#[test]
fn test_environment_beats_document() {
    let loaded = load("a: 1\n", &[("RK_A", "2")], &[]);
    assert_eq!(loaded.tree.get("a"), Some(&Node::scalar("2")));
}

#[test]
fn test_later_flag_assignment_wins() {
    let loaded = load("a: 1\n", &[], &["a=2", "a=3,a=4"]);
    assert_eq!(loaded.tree.get("a"), Some(&Node::scalar("4")));
}

// ============================================================================
// Schema safety
// ============================================================================

#[test]
fn test_unknown_key_never_appears() {
    let loaded = load("a: 1\n", &[("RK_C", "3")], &["b=2"]);

    let expected: Node = [("a", Node::scalar("1"))].into_iter().collect();
    assert_eq!(loaded.tree, expected);
    assert_eq!(loaded.env_report.discarded[0].reason, DiscardReason::UnknownKey);
    assert_eq!(loaded.flag_report.discarded[0].path, "b");
}

#[test]
fn test_array_bounds_are_respected() {
    let loaded = load("list: [x, y]\n", &[], &["list[5]=z"]);

    let list = loaded.tree.get("list").and_then(Node::as_sequence).unwrap();
    assert_eq!(list, &[Node::scalar("x"), Node::scalar("y")]);
    assert!(
        loaded
            .flag_report
            .discarded
            .iter()
            .any(|d| d.path == "list[5]" && d.reason == DiscardReason::OutOfBounds)
    );
}

#[test]
fn test_kind_mismatch_is_discarded() {
    let loaded = load("a:\n  x: 1\n", &[], &["a=5"]);

    let expected: Node = [("x", Node::scalar("1"))].into_iter().collect();
    assert_eq!(loaded.tree.get("a"), Some(&expected));
    assert_eq!(loaded.flag_report.discarded[0].reason, DiscardReason::KindMismatch);
}

#[test]
fn test_identical_override_is_idempotent() {
    let document = "a:\n  b: [1, 2]\n  c: x\n";
    let before = load(document, &[], &[]).tree;
    let after = load(document, &[], &["a.b[0]=1,a.b[1]=2,a.c=x"]).tree;
    assert_eq!(before, after);
}

// ============================================================================
// Environment reformatting
// ============================================================================

#[test]
fn test_environment_index_reformatting() {
    let loaded = load("gin:\n  - port: 1949\n", &[("RK_GIN_0_PORT", "2008")], &[]);

    assert_eq!(loaded.env.assignments()[0].to_string(), "gin[0].port=2008");
    let port = loaded
        .tree
        .get("gin")
        .and_then(|g| g.get_index(0))
        .and_then(|g| g.get("port"));
    assert_eq!(port, Some(&Node::scalar("2008")));
}

#[test]
fn test_unprefixed_variables_are_ignored() {
    let loaded = load("a: 1\n", &[("A", "2"), ("RKA", "3"), ("PATH", "/bin")], &[]);
    assert!(loaded.env.is_empty());
    assert_eq!(loaded.tree.get("a"), Some(&Node::scalar("1")));
}

// ============================================================================
// Typed projection and rendering
// ============================================================================

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Gin {
    name: String,
    port: u16,
    common_service: CommonService,
}

#[derive(Debug, Deserialize, PartialEq)]
struct CommonService {
    enabled: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Boot {
    gin: Vec<Gin>,
}

#[test]
fn test_document_on_disk_to_typed_config() {
    let fixture = BootFixture::with_document("boot/app.yaml", GIN_BOOT);
    let raw = rk_boot::read_local_file(fixture.path("boot/app.yaml")).unwrap();
    let sources = OverrideSources::new()
        .with_env(env_vars(&[("RK_GIN_0_COMMONSERVICE_ENABLED", "false")]))
        .with_flags(["gin[1].name=console"]);

    let boot: Boot = BootLoader::new()
        .lowercase_keys(false)
        .unmarshal(&raw, &sources)
        .unwrap();

    // Environment paths are lower-case and do not reach `commonService`
    assert!(boot.gin[0].common_service.enabled);
    assert_eq!(boot.gin[1].name, "console");
    assert_eq!(boot.gin[1].port, 1950);
}

#[test]
fn test_env_override_reaches_camel_case_field() {
    let sources = OverrideSources::new()
        .with_env(env_vars(&[("RK_GIN_0_COMMONSERVICE_ENABLED", "false")]))
        .with_flags(["gin[1].commonService.enabled=true"]);

    let boot: Boot = BootLoader::new().unmarshal(GIN_BOOT, &sources).unwrap();

    assert!(!boot.gin[0].common_service.enabled);
    assert!(boot.gin[1].common_service.enabled);
}

#[test]
fn test_oversized_index_is_skipped() {
    let loaded = load(
        "list: [x, y]\n",
        &[("RK_LIST_99999999999", "z")],
        &["list[18446744073709551615]=z,list[1]=w"],
    );

    let list = loaded.tree.get("list").and_then(Node::as_sequence).unwrap();
    assert_eq!(list, &[Node::scalar("x"), Node::scalar("w")]);
    assert!(loaded.env.error().is_some());
    assert!(loaded.flags.error().is_some());
}

#[test]
fn test_rendered_yaml_after_overrides() {
    let loaded = load(
        "gin:\n  - name: greeter\n    port: 1949\nlogger:\n  level: info\n",
        &[("RK_GIN_0_PORT", "2008")],
        &["logger.level=debug"],
    );

    insta::assert_snapshot!(yaml(&loaded.tree), @r###"
    gin:
    - name: greeter
      port: 2008
    logger:
      level: debug
    "###);
}
