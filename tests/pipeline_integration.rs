//! Pipeline integration tests against monorepos on disk
//!
//! Covers the documented scenarios:
//! - an eligible `universal-*` package
//! - excluded tooling packages
//! - packages without an entry file
//! - one failing build among several concurrent ones

mod support;

use servicegen::progress::NoOpHandler;
use servicegen::{
    BuildDriver, MockBundler, PipelineError, RealFileSystem, ServicePipeline, SkipReason,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use support::Monorepo;

fn pipeline_for(repo: &Monorepo) -> ServicePipeline {
    ServicePipeline::new(
        Arc::new(RealFileSystem::new()),
        repo.root(),
        serde_json::json!({ "presets": ["babel-preset-rax"] }),
    )
}

fn driver_with(bundler: Arc<MockBundler>) -> BuildDriver {
    BuildDriver::new(bundler).with_progress(Arc::new(NoOpHandler))
}

#[test]
fn test_universal_foo_is_planned() {
    let repo = Monorepo::new();
    repo.add("packages", "universal-foo", "1.2.3", true);

    let plan = pipeline_for(&repo).plan();
    assert_eq!(plan.packages(), vec!["universal-foo"]);

    let config = &plan.configs[0];
    assert_eq!(config.identity.as_str(), "universal_foo_1_2_3");
    assert_eq!(
        config.expected_outputs(),
        vec!["foo.service.js", "foo.service.min.js"]
    );
    assert_eq!(
        config.output.path,
        repo.root().join("packages/universal-foo/dist")
    );
    assert!(config.output.path.is_absolute());
    assert_eq!(
        config.entry["foo.service"],
        repo.root().join("packages/universal-foo/src/index.js")
    );
}

#[test]
fn test_multi_segment_name_uses_second_segment() {
    let repo = Monorepo::new();
    repo.add("components", "rax-text-input", "0.2.0", true);

    let plan = pipeline_for(&repo).plan();
    let config = &plan.configs[0];
    assert_eq!(config.identity.as_str(), "rax_text_input_0_2_0");
    assert_eq!(
        config.expected_outputs(),
        vec!["text.service.js", "text.service.min.js"]
    );
    assert_eq!(config.module_options.global_name, "RaxTextInput");
}

#[test]
fn test_tooling_and_entryless_packages_are_skipped() {
    let repo = Monorepo::new();
    repo.add("packages", "rax-cli", "1.0.0", true);
    repo.add("packages", "mobx-store", "1.0.0", false);
    repo.add("components", "rax-view", "1.0.0", true);

    let plan = pipeline_for(&repo).plan();
    assert_eq!(plan.packages(), vec!["rax-view"]);

    let reasons: Vec<(&str, &SkipReason)> = plan
        .skipped
        .iter()
        .map(|s| (s.package.as_str(), &s.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("mobx-store", &SkipReason::MissingEntry),
            (
                "rax-cli",
                &SkipReason::Excluded {
                    keyword: "cli".to_string()
                }
            ),
        ]
    );
}

#[test]
fn test_plan_is_idempotent() {
    let repo = Monorepo::new();
    repo.add("packages", "universal-foo", "1.2.3", true);
    repo.add("components", "rax-view", "0.6.1", true);

    let first = pipeline_for(&repo).plan();
    let second = pipeline_for(&repo).plan();

    let wrappers = |plan: &servicegen::BuildPlan| {
        plan.configs
            .iter()
            .map(|c| c.wrapper_hooks.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(wrappers(&first), wrappers(&second));
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_one_failure_among_five_concurrent_builds() {
    let repo = Monorepo::new();
    let names = [
        "rax-view",
        "rax-text",
        "rax-image",
        "universal-env",
        "mobx-binding",
    ];
    for name in names {
        repo.add("packages", name, "1.0.0", true);
    }

    let bundler = Arc::new(MockBundler::new().with_delay(Duration::from_millis(25)));
    bundler.fail("rax-text", vec!["Module build failed: SyntaxError".to_string()]);

    let err = pipeline_for(&repo)
        .run(&driver_with(bundler.clone()))
        .await
        .unwrap_err();

    match err {
        PipelineError::BuildsFailed { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].package, "rax-text");
        }
        other => panic!("Expected BuildsFailed, got {:?}", other),
    }

    // every sibling still ran, all at the same time
    assert_eq!(bundler.invoked_packages().len(), 5);
    assert_eq!(bundler.max_in_flight(), 5);
}

#[tokio::test]
async fn test_run_uses_shared_registry() {
    let repo = Monorepo::new();
    repo.add("packages", "rax-view", "1.0.0", true);
    repo.add("components", "rax-picture", "1.0.0", true);
    repo.add("packages", "rax-webpack-plugin", "1.0.0", true);

    let bundler = Arc::new(MockBundler::new());
    let summary = pipeline_for(&repo)
        .run(&driver_with(bundler.clone()))
        .await
        .unwrap();
    assert_eq!(summary.built.len(), 2);

    for config in bundler.invocations() {
        let builtins = &config.module_options.builtin_modules;
        assert!(builtins.is_external("rax"));
        assert!(builtins.is_external("rax-webpack-plugin"));
        assert!(builtins.is_external("redux"));
    }
}

#[test]
fn test_missing_roots_yield_empty_plan() {
    let dir = tempfile::TempDir::new().unwrap();
    let pipeline = ServicePipeline::new(
        Arc::new(RealFileSystem::new()),
        PathBuf::from(dir.path()),
        serde_json::json!({}),
    );
    let plan = pipeline.plan();
    assert!(plan.configs.is_empty());
    assert!(plan.skipped.is_empty());
}
