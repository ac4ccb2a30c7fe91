//! Facts and configuration documents through to emitted artifacts

#[path = "../common/mod.rs"]
mod common;

use common::*;
use droidgraph_harness::config::{ConfigError, HarnessConfig};
use droidgraph_harness::features::driver::Severity;
use droidgraph_harness::features::facts::FactsError;
use droidgraph_harness::{
    ComponentKind, DriverSynthesizer, FactsDocument, HarnessError, JavaHarnessEmitter, TypeName,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const HOIST_TEST2_YAML: &str = r#"
version: 1
app: com.test.hoisttest2
identifiers:
  - id: 2131034112
    declared_type: android.view.SurfaceView
    name: mySurfaceView
  - id: 2131034113
    declared_type: android.widget.Button
    name: myBtn
handlers:
  - component: com.test.hoisttest2.MainActivity
    method: myOnClick
    identifier: 2131034113
components:
  - name: com.test.hoisttest2.MainActivity
    kind: activity
    lifecycle:
      - name: onCreate
        params: [android.os.Bundle]
      - name: onDestroy
    handlers: [myOnClick]
    methods:
      - name: myOnClick
        params: [android.view.View]
"#;

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_yaml_file_matches_builder_fixture() {
    let file = write_temp(".yaml", HOIST_TEST2_YAML);
    let loaded = FactsDocument::from_path(file.path()).unwrap();
    let built = hoist_test2();

    assert_eq!(loaded.components, built.components);
    assert_eq!(loaded.identifiers, built.identifiers);
    assert_eq!(loaded.handlers, built.handlers);
}

#[test]
fn test_json_file_by_extension() {
    let json = serde_json::to_string(&system_service()).unwrap();
    let file = write_temp(".json", &json);

    let loaded = FactsDocument::from_path(file.path()).unwrap();
    assert_eq!(loaded.app.as_deref(), Some("com.test.systemservice"));
    assert_eq!(loaded.services, vec!["account".to_string()]);
    assert_eq!(loaded.components[0].kind, ComponentKind::Activity);
}

#[test]
fn test_fixture_yaml_roundtrip() {
    for (name, doc) in all_fixtures() {
        let yaml = doc.to_yaml().unwrap();
        let reloaded = FactsDocument::from_yaml(&yaml).unwrap();
        assert_eq!(reloaded.components, doc.components, "{}", name);
        assert_eq!(reloaded.identifiers, doc.identifiers, "{}", name);
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FactsDocument::from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, FactsError::Io(_)));
}

#[test]
fn test_invalid_documents_rejected() {
    let bad_kind = "version: 1\ncomponents:\n  - name: com.test.A\n    kind: widget\n";
    assert!(matches!(
        FactsDocument::from_yaml(bad_kind),
        Err(FactsError::Syntax(_))
    ));

    let empty_service = "version: 1\nservices: [\"\"]\n";
    assert!(matches!(
        FactsDocument::from_yaml(empty_service),
        Err(FactsError::Validation(_))
    ));

    let empty_name = "version: 1\ncomponents:\n  - name: \"\"\n    kind: activity\n";
    assert!(matches!(
        FactsDocument::from_yaml(empty_name),
        Err(FactsError::Validation(_))
    ));
}

#[test]
fn test_errors_propagate_as_harness_errors() {
    fn load(yaml: &str, config: &str) -> droidgraph_harness::Result<usize> {
        let doc = FactsDocument::from_yaml(yaml)?;
        let config = HarnessConfig::from_yaml_str(config)?;
        Ok(DriverSynthesizer::new(config).synthesize_facts(&doc).step_count())
    }

    assert!(load(HOIST_TEST2_YAML, "version: 1\n").unwrap() > 0);
    assert!(matches!(
        load("version: 3\n", "version: 1\n"),
        Err(HarnessError::Facts(FactsError::UnsupportedVersion { found: 3 }))
    ));
    assert!(matches!(
        load(HOIST_TEST2_YAML, "preset: balanced\n"),
        Err(HarnessError::Config(ConfigError::MissingVersion))
    ));
}

#[test]
fn test_conflicting_identifier_keeps_first_declaration() {
    let yaml = r#"
version: 1
identifiers:
  - id: 7
    declared_type: android.view.SurfaceView
  - id: 7
    declared_type: android.widget.Button
components:
  - name: com.test.MainActivity
    kind: activity
    lifecycle:
      - name: onCreate
        params: [android.os.Bundle]
"#;
    let doc = FactsDocument::from_yaml(yaml).unwrap();
    let procedure = synthesize(&doc);

    let view = procedure.registry().find_view_by_id(7).unwrap();
    assert_eq!(
        procedure.registry().get(view).type_name,
        TypeName::new("android.view.SurfaceView")
    );
    let warnings: Vec<_> = procedure
        .diagnostics()
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("android.widget.Button"));
}

#[test]
fn test_unreached_handler_reported() {
    let mut doc = hoist_test2();
    doc.handlers.push(droidgraph_harness::HandlerBinding::new("onMissing", MY_BTN));

    let procedure = synthesize(&doc);
    assert!(procedure
        .diagnostics()
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("onMissing")));
    // Reachable handlers are still driven
    assert_called(&procedure, "com.test.hoisttest2.MainActivity", "myOnClick");
}

#[test]
fn test_custom_protocol_from_config_file() {
    let config = write_temp(
        ".yaml",
        r#"
version: 1
preset: balanced
overrides:
  lifecycle:
    protocols:
      - kind: service
        steps:
          - method: boot
            phase: create
          - method: serve
            phase: active
          - method: halt
            phase: teardown
        chains:
          - [boot, serve]
"#,
    );
    let config = HarnessConfig::from_yaml(config.path()).unwrap();

    let yaml = r#"
version: 1
components:
  - name: com.test.SyncService
    kind: service
    lifecycle:
      - name: halt
      - name: serve
      - name: boot
"#;
    let doc = FactsDocument::from_yaml(yaml).unwrap();
    let procedure = DriverSynthesizer::new(config).synthesize_facts(&doc);

    let order: Vec<&str> = procedure
        .ordered_steps()
        .map(|step| step.method.name.as_str())
        .collect();
    assert_eq!(order, vec!["boot", "serve", "halt"]);
}

#[test]
fn test_configured_service_and_class_names() {
    let config = HarnessConfig::default()
        .fabrication(|c| c.service("teleporter", "com.vendor.Teleporter"))
        .emit(|c| {
            c.harness_class("com.test.gen.Driver")
                .stubs_class("com.test.gen.Stubs")
                .entry_method("drive")
        })
        .build()
        .unwrap();

    let mut doc = system_service();
    doc.services.push("teleporter".to_string());
    let synth = DriverSynthesizer::new(config);
    let procedure = synth.synthesize_facts(&doc);

    let mut registry = procedure.registry().clone();
    let teleporter = registry.system_service("teleporter");
    assert_eq!(
        teleporter,
        registry.ambient(&TypeName::new("com.vendor.Teleporter"))
    );
    assert_eq!(registry.len(), procedure.allocations().len());

    let emitter = JavaHarnessEmitter::new(synth.config().emit().clone());
    let harness = emitter.emit_harness(&procedure);
    assert!(harness.starts_with("package com.test.gen;"));
    assert!(harness.contains("public class Driver {"));
    assert!(harness.contains("public static void drive() {"));
    assert!(harness.contains("ambientTeleporter = com.test.gen.Stubs.ambientTeleporter;"));

    let stubs = emitter.emit_stubs(&procedure);
    assert!(stubs.contains("case \"teleporter\": return ambientTeleporter;"));
}

#[test]
fn test_emit_json_artifact() {
    let procedure = synthesize(&hoist_test2());
    let emitter = JavaHarnessEmitter::new(Default::default());
    let json: serde_json::Value = serde_json::from_str(&emitter.emit_json(&procedure).unwrap()).unwrap();

    assert_eq!(json["name"], "androidMain");
    assert_eq!(
        json["stand_ins"].as_array().unwrap().len(),
        procedure.allocations().len()
    );
    let sections = json["sections"].as_array().unwrap();
    assert_eq!(sections.len(), procedure.sections().len());
    assert_eq!(sections[0]["kind"]["kind"], "ordered");
    assert_eq!(sections.last().unwrap()["kind"]["kind"], "unordered");
    assert_eq!(sections[0]["steps"][1]["method"]["name"], "myOnClick");
}

#[test]
fn test_write_sources_to_package_directories() {
    let procedure = synthesize(&support_fragment());
    let emitter = JavaHarnessEmitter::new(Default::default());
    let dir = tempfile::tempdir().unwrap();

    let written = emitter.write_sources(&procedure, dir.path()).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(
        written[0],
        dir.path().join("generatedHarness/GeneratedAndroidHarness.java")
    );
    assert_eq!(written[1], dir.path().join("stubs/GeneratedAndroidStubs.java"));

    let stubs = std::fs::read_to_string(&written[1]).unwrap();
    assert!(stubs.contains("public static android.view.View findViewById(int id)"));
    assert!(stubs.contains(&format!("case {}: return myBtn;", MY_BTN as i32)));
    // The layout fragment is reachable through its getter, not findViewById
    assert!(!stubs.contains(&format!("case {}: return mainFragment;", FRAGMENT_MAIN as i32)));
    assert!(stubs.contains("case \"com.test.supportfragment.MainFragment\": return mainFragment;"));
}
