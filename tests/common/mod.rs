// Common test utilities
use std::fs;
use tempfile::TempDir;

/// A lesson directory with one YAML override, one new JSON workflow, a broken
/// file and a file with an unrelated extension.
pub fn setup_lesson_files() -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    let override_yaml = r#"
categories:
  - id: basics
    title: Basics (short)
    description: Just the one command.
    commands:
      - title: Check the version
        expected_input: docker version
        success_output: "Docker version 27.0.3"
"#;
    fs::write(temp_dir.path().join("basics.yaml"), override_yaml).unwrap();

    let nested = temp_dir.path().join("team");
    fs::create_dir(&nested).unwrap();
    let workflow_json = r#"{
  "workflows": [
    {
      "id": "cleanup",
      "title": "Clean up",
      "description": "Reclaim disk space.",
      "steps": [
        { "expected_input": "docker system df", "success_output": "TYPE  TOTAL  ACTIVE" },
        { "expected_input": "docker system prune", "success_output": "Total reclaimed space: 1.2GB" }
      ]
    }
  ]
}"#;
    fs::write(nested.join("cleanup.json"), workflow_json).unwrap();

    fs::write(temp_dir.path().join("broken.yaml"), "categories: [ {id: ").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not a lesson").unwrap();

    temp_dir
}
