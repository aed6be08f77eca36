use std::{fs, path::PathBuf};

use tempfile::tempdir;

use agx_cli::{Args, run};

/// Collects all .agx files from a directory
fn collect_agx_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("agx")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: PathBuf, format: &str) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        format: Some(format.to_string()),
        no_validate: false,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_agx_files(demos_path());

    assert!(!demos.is_empty(), "No demos found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let stem = demo.file_stem().unwrap().to_string_lossy().to_string();

        for format in ["xml", "text"] {
            let output_path = temp_dir.path().join(format!("{stem}.{format}"));
            let args = args_for(demo, output_path.clone(), format);

            match run(&args) {
                Ok(()) => {
                    let written = fs::read_to_string(&output_path).unwrap();
                    if format == "xml" {
                        assert!(written.starts_with("<?xml"), "{}", demo.display());
                        assert!(written.trim_end().ends_with("</Model>"), "{}", demo.display());
                    }
                }
                Err(e) => failed.push((demo.clone(), e)),
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo run(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_agx_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.xml",
            demo.file_stem().unwrap().to_string_lossy()
        ));
        let args = args_for(demo, output_path, "xml");

        if run(&args).is_ok() {
            unexpectedly_succeeded.push(demo.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_no_validate_builds_lowercase_type() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demo = demos_path().join("errors").join("lowercase_type.agx");
    let output_path = temp_dir.path().join("lowercase.xml");

    let mut args = args_for(&demo, output_path.clone(), "xml");
    args.no_validate = true;

    run(&args).expect("validation disabled");
    let xml = fs::read_to_string(&output_path).unwrap();
    assert!(xml.contains("<AType name=\"system\" />"));
    assert!(xml.contains("<ANode name=\"Server\" kind=\"system\" />"));
}

#[test]
fn e2e_config_file_controls_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("agx.toml");
    fs::write(&config_path, "[output]\nformat = \"text\"\n").unwrap();

    let demo = demos_path().join("people.agx");
    let output_path = temp_dir.path().join("people.txt");
    let args = Args {
        input: demo.to_string_lossy().to_string(),
        output: Some(output_path.to_string_lossy().to_string()),
        format: None,
        no_validate: false,
        config: Some(config_path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
    };

    run(&args).expect("people demo should render");
    let text = fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        text,
        "type Person\nPerson Alice\nPerson Bob\nAlice -> Bob\n"
    );
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.agx");

    let args = args_for(&missing, temp_dir.path().join("out.xml"), "xml");
    assert!(run(&args).is_err());
}
