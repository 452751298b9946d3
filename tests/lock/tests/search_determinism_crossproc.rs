//! Cross-process determinism: the `search_fixture` binary produces the
//! same report under different working directories and environments.

use std::path::Path;
use std::process::Command;

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, args: &[&str], env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_search_fixture");

    let mut command = Command::new(bin);
    command.current_dir(work_dir).args(args);

    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });

    assert!(
        output.status.success(),
        "search_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn assert_four_variants_agree(args: &[&str]) -> String {
    let root = workspace_root();
    let baseline = run_variant(&root, args, &[]);

    let tmp = std::env::temp_dir().to_string_lossy().to_string();
    let variants: [(&str, Vec<(&str, &str)>); 3] = [
        ("different cwd", vec![]),
        ("C locale", vec![("LC_ALL", "C")]),
        ("debug logging", vec![("RUST_LOG", "debug")]),
    ];
    for (label, overrides) in &variants {
        let dir = if *label == "different cwd" { &tmp } else { &root };
        let output = run_variant(dir, args, overrides);
        assert_eq!(baseline, output, "{label} variant diverged");
    }
    baseline
}

#[test]
fn detour_uniform_cost_is_deterministic() {
    let baseline = assert_four_variants_agree(&["detour"]);
    assert!(baseline.contains("status=SOLVED\n"), "baseline: {baseline}");
    assert!(baseline.contains("plan=s0-s2\n"), "baseline: {baseline}");
    assert!(baseline.contains("plan_cost=5\n"), "baseline: {baseline}");
    assert!(
        baseline.contains("plan_digest=sha256:"),
        "baseline output missing plan_digest"
    );
}

#[test]
fn lazy_alternation_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("lazy.json");
    std::fs::write(
        &config,
        r#"{
            "algorithm": "lazy",
            "evaluators": {"h": {"type": "goalcount"}},
            "open_list": {
                "type": "alternation",
                "sublists": [
                    {"type": "tiebreaking", "evaluators": [{"type": "ref", "name": "h"}]},
                    {"type": "tiebreaking", "evaluators": [{"type": "ref", "name": "h"}],
                     "pref_only": true}
                ]
            },
            "preferred": [{"type": "ref", "name": "h"}],
            "preferred_successors_first": true
        }"#,
    )
    .unwrap();
    let config = config.to_string_lossy().into_owned();

    let baseline = assert_four_variants_agree(&["line", &config]);
    assert!(baseline.contains("status=SOLVED\n"), "baseline: {baseline}");
    assert!(
        baseline.contains("plan=step-0,step-1,step-2,step-3,step-4\n"),
        "baseline: {baseline}"
    );
}
