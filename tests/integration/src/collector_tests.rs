//! Tests for override collection across both sources

use pretty_assertions::assert_eq;
use rk_override::{EnvCollector, FlagCollector, Node, Source};
use rk_test_utils::env_vars;

#[test]
fn test_env_collection_is_sorted_by_name() {
    let collector = EnvCollector::new("RK");
    let overrides = collector.collect(env_vars(&[("RK_B", "2"), ("RK_A", "1")]));

    let paths: Vec<String> = overrides
        .assignments()
        .iter()
        .map(|a| a.path.to_string())
        .collect();
    assert_eq!(paths, vec!["a", "b"]);
    assert_eq!(overrides.source(), Source::Environment);
}

#[test]
fn test_env_prefix_is_case_insensitive() {
    let collector = EnvCollector::new("rk");
    let overrides = collector.collect(env_vars(&[("rk_logger_level", "debug")]));

    assert_eq!(overrides.assignments()[0].to_string(), "logger.level=debug");
}

#[test]
fn test_repeated_collection_is_consistent() {
    let collector = FlagCollector::new();
    let first = collector.collect(&["a=1", "b[0]=2"]);
    let second = collector.collect(&["a=1", "b[0]=2"]);

    assert_eq!(first, second);
}

#[test]
fn test_malformed_entries_are_isolated() {
    let collector = FlagCollector::new();
    let overrides = collector.collect(&["a[x]=1,b=2", "c", "d.e=3"]);

    assert_eq!(overrides.assignments().len(), 2);
    let error = overrides.error().unwrap();
    assert_eq!(error.origin, Source::Flag);
    assert_eq!(error.errors.len(), 2);

    let d: Node = [("e", Node::scalar("3"))].into_iter().collect();
    assert_eq!(overrides.tree().get("d"), Some(&d));
}

#[test]
fn test_no_values_yield_empty_tree() {
    let overrides = FlagCollector::new().collect::<&str>(&[]);

    assert!(overrides.is_empty());
    assert!(overrides.tree().is_empty_mapping());
    assert!(overrides.error().is_none());
}
