//! End-to-end tests: trees and cloud assemblies through the facade

use std::fs;

use cdk_mentor::{
    check_assembly, check_assembly_with_config_file, check_tree, AnnotationLevel, ConstructTree,
    ConstructView, DiagnosticCode, MentorError, RulesConfig,
};

/// Normalize annotations to `path: level message` lines
fn annotations(tree: &ConstructTree) -> Vec<String> {
    tree.all_annotations()
        .map(|(path, a)| format!("{}: {} {}", path, a.level, a.message))
        .collect()
}

fn single_topic(id: &str) -> ConstructTree {
    let mut tree = ConstructTree::new();
    let stack = tree.add_stack(tree.root(), "Isolated").unwrap();
    let topic = tree.add_construct(stack, id).unwrap();
    tree.add_resource(topic, "Resource", "AWS::SNS::Topic").unwrap();
    tree
}

// ============================================================================
// Trees
// ============================================================================

#[test]
fn test_pascal_case_topic_is_clean() {
    let mut tree = single_topic("Test");
    let result = check_tree(&mut tree, &RulesConfig::default());
    assert!(result.diagnostics.is_empty());
    assert!(annotations(&tree).is_empty());
}

#[test]
fn test_camel_case_topic_is_annotated() {
    let mut tree = single_topic("testData");
    let result = check_tree(&mut tree, &RulesConfig::default());

    assert_eq!(result.error_count(), 1);
    let resource = tree.find("Isolated/testData/Resource").unwrap();
    let attached = tree.annotations(resource);
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].level, AnnotationLevel::Error);
    assert!(attached[0].message.starts_with("[ERR:001]"));
    assert!(attached[0].message.contains("\"testData\""));
}

#[test]
fn test_repeated_checks_do_not_accumulate() {
    let mut tree = single_topic("TestStackConstruct_x");
    let first = check_tree(&mut tree, &RulesConfig::default());
    let after_first = annotations(&tree);
    let second = check_tree(&mut tree, &RulesConfig::default());

    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(annotations(&tree), after_first);
    assert_eq!(after_first.len(), 3);
}

// ============================================================================
// Cloud assemblies
// ============================================================================

const TREE_JSON: &str = r#"{
    "version": "tree-0.1",
    "tree": {
        "id": "App",
        "path": "",
        "children": {
            "TestStack": {
                "id": "TestStack",
                "path": "TestStack",
                "children": {
                    "TestTopic": {
                        "id": "TestTopic",
                        "path": "TestStack/TestTopic",
                        "children": {
                            "Resource": {
                                "id": "Resource",
                                "path": "TestStack/TestTopic/Resource",
                                "attributes": { "aws:cdk:cloudformation:type": "AWS::SNS::Topic" }
                            }
                        }
                    }
                },
                "constructInfo": { "fqn": "aws-cdk-lib.Stack", "version": "2.1.0" }
            },
            "AnotherStack": {
                "id": "AnotherStack",
                "path": "AnotherStack",
                "children": {
                    "test_queue": {
                        "id": "test_queue",
                        "path": "AnotherStack/test_queue",
                        "children": {
                            "Resource": {
                                "id": "Resource",
                                "path": "AnotherStack/test_queue/Resource",
                                "attributes": { "aws:cdk:cloudformation:type": "AWS::SQS::Queue" }
                            }
                        }
                    }
                },
                "constructInfo": { "fqn": "aws-cdk-lib.Stack", "version": "2.1.0" }
            }
        }
    }
}"#;

const MANIFEST_JSON: &str = r#"{
    "version": "21.0.0",
    "artifacts": {
        "TestStack": { "type": "aws:cloudformation:stack", "displayName": "TestStack" },
        "AnotherStack": {
            "type": "aws:cloudformation:stack",
            "displayName": "AnotherStack",
            "dependencies": ["TestStack", "AnotherStack.assets"]
        },
        "AnotherStack.assets": { "type": "cdk:asset-manifest" }
    }
}"#;

fn write_assembly(with_manifest: bool) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tree.json"), TREE_JSON).unwrap();
    if with_manifest {
        fs::write(dir.path().join("manifest.json"), MANIFEST_JSON).unwrap();
    }
    dir
}

#[test]
fn test_assembly_with_cross_stack_reference() {
    let dir = write_assembly(true);
    let report = check_assembly(dir.path(), &RulesConfig::default()).unwrap();

    assert!(report.has_errors());
    let codes: Vec<_> = report.result.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::Warn003, DiagnosticCode::Err001]);
    assert_eq!(
        annotations(&report.tree),
        vec![
            "AnotherStack: warning [WARN:003]: This AnotherStack stack may cause CrossStack references.",
            "AnotherStack/test_queue/Resource: error [ERR:001]: Construct ID \"test_queue\" should be defined in PascalCase.",
        ]
    );
}

#[test]
fn test_assembly_without_manifest_has_independent_stacks() {
    let dir = write_assembly(false);
    let report = check_assembly(dir.path(), &RulesConfig::default()).unwrap();
    assert_eq!(report.result.by_code(DiagnosticCode::Warn003).count(), 0);
    assert_eq!(report.result.error_count(), 1);
}

#[test]
fn test_assembly_with_config_file() {
    let dir = write_assembly(true);
    let config = dir.path().join("mentor.json");
    fs::write(
        &config,
        r#"{ "crossStackReference": false, "pascalCaseConstructId": { "exclusions": { "prefixes": ["test_"] } } }"#,
    )
    .unwrap();

    let report = check_assembly_with_config_file(dir.path(), &config).unwrap();
    assert!(report.result.diagnostics.is_empty());
}

/// App with a `Prod` stage; its stacks are listed in the nested assembly
const STAGE_TREE_JSON: &str = r#"{
    "version": "tree-0.1",
    "tree": {
        "id": "App",
        "path": "",
        "children": {
            "Prod": {
                "id": "Prod",
                "path": "Prod",
                "children": {
                    "Producer": {
                        "id": "Producer",
                        "path": "Prod/Producer",
                        "children": {
                            "Topic": {
                                "id": "Topic",
                                "path": "Prod/Producer/Topic",
                                "attributes": { "aws:cdk:cloudformation:type": "AWS::SNS::Topic" }
                            }
                        },
                        "constructInfo": { "fqn": "aws-cdk-lib.Stack", "version": "2.1.0" }
                    },
                    "Consumer": {
                        "id": "Consumer",
                        "path": "Prod/Consumer",
                        "children": {
                            "Queue": {
                                "id": "Queue",
                                "path": "Prod/Consumer/Queue",
                                "attributes": { "aws:cdk:cloudformation:type": "AWS::SQS::Queue" }
                            }
                        },
                        "constructInfo": { "fqn": "aws-cdk-lib.Stack", "version": "2.1.0" }
                    }
                },
                "constructInfo": { "fqn": "aws-cdk-lib.Stage", "version": "2.1.0" }
            }
        }
    }
}"#;

const STAGE_MANIFEST_JSON: &str = r#"{
    "version": "21.0.0",
    "artifacts": {
        "assembly-Prod": {
            "type": "cdk:cloud-assembly",
            "properties": { "directoryName": "assembly-Prod", "displayName": "Prod" }
        },
        "Tree": { "type": "cdk:tree", "properties": { "file": "tree.json" } }
    }
}"#;

const NESTED_MANIFEST_JSON: &str = r#"{
    "version": "21.0.0",
    "artifacts": {
        "ProdProducer1A2B3C4D": {
            "type": "aws:cloudformation:stack",
            "displayName": "Prod/Producer"
        },
        "ProdConsumer5E6F7A8B": {
            "type": "aws:cloudformation:stack",
            "displayName": "Prod/Consumer",
            "dependencies": ["ProdProducer1A2B3C4D", "ProdConsumer5E6F7A8B.assets"]
        },
        "ProdConsumer5E6F7A8B.assets": { "type": "cdk:asset-manifest" }
    }
}"#;

#[test]
fn test_stage_assembly_dependencies() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tree.json"), STAGE_TREE_JSON).unwrap();
    fs::write(dir.path().join("manifest.json"), STAGE_MANIFEST_JSON).unwrap();
    let nested = dir.path().join("assembly-Prod");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("manifest.json"), NESTED_MANIFEST_JSON).unwrap();

    let report = check_assembly(dir.path(), &RulesConfig::default()).unwrap();
    let warnings: Vec<_> = report.result.by_code(DiagnosticCode::Warn003).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].path, "Prod/Consumer");

    // Keyed by construct id, without the stage prefix
    let consumer = report.tree.node(report.tree.find("Prod/Consumer").unwrap()).unwrap();
    assert_eq!(consumer.stack_dependencies().unwrap().first_key(), Some("Producer"));
    assert_eq!(
        annotations(&report.tree),
        vec!["Prod/Consumer: warning [WARN:003]: This Prod/Consumer stack may cause CrossStack references."]
    );
}

#[test]
fn test_missing_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let err = check_assembly(dir.path(), &RulesConfig::default()).unwrap_err();
    assert!(matches!(err, MentorError::Assembly(_)));
}

#[test]
fn test_bad_config_file() {
    let dir = write_assembly(false);
    let config = dir.path().join("mentor.json");
    fs::write(&config, r#"{ "unknownRule": true }"#).unwrap();

    let err = check_assembly_with_config_file(dir.path(), &config).unwrap_err();
    assert!(matches!(err, MentorError::Config(_)));

    let err = check_assembly_with_config_file(dir.path(), &dir.path().join("absent.json"))
        .unwrap_err();
    assert!(matches!(err, MentorError::Io { .. }));
}
