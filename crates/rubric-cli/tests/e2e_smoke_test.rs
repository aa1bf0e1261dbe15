use std::{
    fs,
    path::{Path, PathBuf},
};

use rubric::{
    ConsoleErrorListener, DiagnosticEngine, MemorySink, RubricError, config::MessageConfig,
};
use rubric_cli::{RunSummary, replay};

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos")
}

fn formats_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../rubric/formats")
}

/// Collects all .toml files from a directory
fn collect_manifests(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
                })
                .collect()
        })
        .unwrap_or_default();

    // Sort for consistent test output
    files.sort();
    files
}

struct Replayed {
    result: Result<RunSummary, RubricError>,
    engine: DiagnosticEngine<MemorySink>,
    raw: String,
}

fn replay_demo(name: &str, config: MessageConfig) -> Replayed {
    let config = config.with_formats_dir(formats_dir());
    let mut engine = DiagnosticEngine::new(MemorySink::new(), &config).expect("Failed to create engine");
    let mut listener = ConsoleErrorListener::new(Vec::new());

    let result = replay(demos_dir().join(name), &mut engine, &mut listener);
    let raw = String::from_utf8(listener.into_inner()).expect("listener output is UTF-8");
    Replayed {
        result,
        engine,
        raw,
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let demos = collect_manifests(demos_dir());
    assert!(!demos.is_empty(), "No demo manifests found in demos/");

    let mut failed = Vec::new();
    for path in &demos {
        let config = MessageConfig::default().with_formats_dir(formats_dir());
        let mut engine = DiagnosticEngine::new(MemorySink::new(), &config).unwrap();
        let mut listener = ConsoleErrorListener::new(Vec::new());

        if let Err(e) = replay(path, &mut engine, &mut listener) {
            failed.push((path.clone(), e));
        }
    }

    if !failed.is_empty() {
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_invalid_demos() {
    let demos = collect_manifests(demos_dir().join("invalid"));
    assert!(!demos.is_empty(), "No invalid manifests found in demos/invalid/");

    for path in &demos {
        let config = MessageConfig::default().with_formats_dir(formats_dir());
        let mut engine = DiagnosticEngine::new(MemorySink::new(), &config).unwrap();
        let mut listener = ConsoleErrorListener::new(Vec::new());

        match replay(path, &mut engine, &mut listener) {
            Err(RubricError::Manifest { span: Some(_), .. }) => {}
            other => panic!(
                "{}: expected a manifest error with a span, got {other:?}",
                path.display()
            ),
        }
        assert!(engine.sink().records().is_empty());
    }
}

#[test]
fn e2e_grammar_errors() {
    let run = replay_demo("grammar_errors.toml", MessageConfig::default());

    assert_eq!(
        run.result.unwrap(),
        RunSummary {
            errors: 3,
            warnings: 1
        }
    );
    let sink = run.engine.sink();
    assert_eq!(
        sink.errors(),
        [
            "error(50): Expr.g4:3:14: syntax error: mismatched input ';' expecting ID",
            "error(56): Expr.g4:7:8: reference to undefined rule: atom",
            "error(119): Expr.g4::: The following sets of rules are mutually left-recursive [expr, term] and [atom]",
        ]
    );
    assert_eq!(
        sink.warnings(),
        ["warning(146): Expr.g4:12:0: non-fragment lexer rule WS can match the empty string"]
    );
    assert_eq!(sink.infos(), ["3 error(s), 1 warning(s)"]);
}

#[test]
fn e2e_tool_warnings_in_gnu_format() {
    let run = replay_demo(
        "tool_warnings.toml",
        MessageConfig::default().with_format("gnu"),
    );

    let summary = run.result.unwrap();
    assert!(!summary.failed());
    assert_eq!(summary.warnings, 3);
    assert_eq!(
        run.engine.sink().warnings(),
        [
            " warning: unsupported option superClass [error 83]",
            " warning: rule block contains an optional block with at least one alternative that can match an empty string; consider making the block non-optional [error 154]",
            " warning: cannot find or open file: Lexer.tokens; reason: No such file or directory [error 7]",
        ]
    );
}

#[test]
fn e2e_format_switch_and_raw_errors() {
    let run = replay_demo("format_switch.toml", MessageConfig::default());

    assert_eq!(run.result.unwrap().errors, 2);
    assert_eq!(run.raw, "line 1:0 token recognition error at: '#'\n");
    assert_eq!(
        run.engine.sink().errors(),
        [
            "error(50): <generated>:1:0: syntax error: extraneous input '#'",
            "<generated>(2,5) : error error 50 : syntax error: missing ';'",
        ]
    );
    assert_eq!(run.engine.format_name(), rubric::config::DEFAULT_FORMAT);
}

#[test]
fn e2e_missing_manifest_is_io_error() {
    let run = replay_demo("does_not_exist.toml", MessageConfig::default());
    assert!(matches!(run.result, Err(RubricError::Io(_))));
}
