use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const CATALOG: &str = r#"[
  { "id": "m_alg1", "name": "Algebra 1", "year": 1, "sem": 1, "specialization": "mate" },
  { "id": "m_alg2", "name": "Algebra 2", "year": 1, "sem": 2, "specialization": "mate", "pre": ["m_alg1"] },
  { "id": "m_geom", "name": "Geometrie", "year": 2, "sem": 1, "specialization": "mate", "pre": ["m_alg2"] },
  { "id": "m_topo", "name": "Topologie", "year": 2, "sem": 1, "specialization": "mate", "pre": ["nope"] },
  { "id": "i_alg1", "name": "Algebra 1", "year": 1, "sem": 1, "specialization": "info" },
  { "id": "i_prog", "name": "Programare", "year": 1, "sem": 2, "specialization": "info", "pre": ["i_alg1"] },
  { "id": "i_ai", "name": "Inteligenta artificiala", "year": 2, "sem": 2, "specialization": "info", "pre": ["i_prog", "m_alg2"] }
]
"#;

struct TestCatalog {
    root: PathBuf,
}

impl TestCatalog {
    fn new(prefix: &str) -> Self {
        let root = unique_temp_dir(prefix);
        fs::create_dir_all(root.join("data")).expect("create data dir");
        fs::write(root.join("data").join("courses.json"), CATALOG).expect("write catalog");
        Self { root }
    }

    fn run_coursegraph(&self, args: &[&str]) -> Output {
        Command::new(coursegraph_bin())
            .current_dir(&self.root)
            .env_remove("COURSEGRAPH_CONFIG")
            .env_remove("COURSEGRAPH_CATALOG")
            .env_remove("COURSEGRAPH_CATALOG_URL")
            .env_remove("COURSEGRAPH_TRACK")
            .env_remove("RUST_LOG")
            .arg("--no-color")
            .args(args)
            .output()
            .expect("run coursegraph")
    }

    fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run_coursegraph(args);
        assert_success(&output, &args.join(" "));
        serde_json::from_slice(&output.stdout).expect("parse json output")
    }
}

impl Drop for TestCatalog {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn coursegraph_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_coursegraph") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(|path| path.parent())
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) {
        "coursegraph.exe"
    } else {
        "coursegraph"
    };
    let fallback = target_dir.join(bin_name);

    if fallback.is_file() {
        fallback
    } else {
        panic!(
            "CARGO_BIN_EXE_coursegraph is not set and fallback binary not found at {}",
            fallback.display()
        );
    }
}

fn assert_success(output: &Output, context: &str) {
    assert!(
        output.status.success(),
        "{context} failed\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn ids(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("json array")
        .iter()
        .map(|id| id.as_str().expect("string id").to_string())
        .collect()
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("coursegraph-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}


#[test]
fn prereqs_lists_every_transitive_ancestor() {
    let catalog = TestCatalog::new("lineage-prereqs");
    let value = catalog.run_json(&["--catalog", "data/courses.json", "prereqs", "i_ai", "--json"]);
    assert_eq!(ids(&value), vec!["i_prog", "m_alg1", "m_alg2"]);
}

#[test]
fn direct_prereqs_stop_at_one_hop() {
    let catalog = TestCatalog::new("lineage-direct");
    let value = catalog.run_json(&[
        "--catalog",
        "data/courses.json",
        "prereqs",
        "i_ai",
        "--direct",
        "--json",
    ]);
    assert_eq!(ids(&value), vec!["i_prog", "m_alg2"]);
}

#[test]
fn dependents_follow_collapsed_titles_across_tracks() {
    let catalog = TestCatalog::new("lineage-dependents");
    let value = catalog.run_json(&[
        "--catalog",
        "data/courses.json",
        "dependents",
        "m_alg1",
        "--json",
    ]);
    assert_eq!(ids(&value), vec!["i_ai", "i_prog", "m_alg2", "m_geom"]);

    let via_alias = catalog.run_json(&[
        "--catalog",
        "data/courses.json",
        "dependents",
        "i_alg1",
        "--json",
    ]);
    assert_eq!(ids(&via_alias), ids(&value));
}

#[test]
fn track_view_keeps_duplicate_titles_apart() {
    let catalog = TestCatalog::new("lineage-track");
    let value = catalog.run_json(&[
        "--catalog",
        "data/courses.json",
        "dependents",
        "i_alg1",
        "--track",
        "info",
        "--json",
    ]);
    assert_eq!(ids(&value), vec!["i_ai", "i_prog"]);
}

#[test]
fn highlight_reports_both_directions() {
    let catalog = TestCatalog::new("lineage-highlight");
    let value = catalog.run_json(&[
        "--catalog",
        "data/courses.json",
        "highlight",
        "m_alg2",
        "--json",
    ]);
    assert_eq!(value["focus"], "m_alg2");
    assert_eq!(ids(&value["ancestors"]), vec!["m_alg1"]);
    assert_eq!(ids(&value["descendants"]), vec!["i_ai", "m_geom"]);
}

#[test]
fn highlight_text_prints_requires_and_unlocks() {
    let catalog = TestCatalog::new("lineage-highlight-text");
    let output = catalog.run_coursegraph(&["--catalog", "data/courses.json", "highlight", "m_geom"]);
    assert_success(&output, "highlight m_geom");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("focus Geometrie (m_geom)"), "stdout:\n{stdout}");
    assert!(stdout.contains("requires Algebra 1 (m_alg1), Algebra 2 (m_alg2)"));
    assert!(stdout.contains("unlocks -"));
    assert!(stdout.contains("year 2, semester 1, mandatory"));
    assert!(stdout.contains("prerequisites Algebra 2 (m_alg2)"));
}

#[test]
fn unknown_course_is_an_error() {
    let catalog = TestCatalog::new("lineage-unknown");
    let output = catalog.run_coursegraph(&["--catalog", "data/courses.json", "prereqs", "ghost"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown course ghost"), "stderr:\n{stderr}");
}
