use std::process::{Command, exit};

fn main() {
    // If we need more complex argument parsing, we can use "clap".

    let mut args = std::env::args().skip(1); // skip "xtask"
    let cmd = args.next().unwrap_or_else(|| "help".to_string());

    match cmd.as_str() {
        "test-all" => {
            if let Err(e) = test_all() {
                eprintln!("Error: {e}");
                exit(1);
            }
        }
        "help" | _ => {
            eprintln!("Usage:");
            eprintln!("  cargo xtask test-all");
            eprintln!("  cargo xtask help");
            exit(1);
        }
    }
}

/// Runs cargo test for default features, then for each special combination.
fn test_all() -> Result<(), Box<dyn std::error::Error>> {
    // 1) test default features
    run_cmd(&["test", "--release"])?;

    // 2) feature sets worth testing in isolation
    let feature_sets = ["parallel"];

    // 3) bare minimum build first, then each feature set on its own
    run_cmd(&["test", "--no-default-features", "--release"])?;
    for feat in &feature_sets {
        println!("\n=== Testing features: {feat}\n");
        run_cmd(&[
            "test",
            "--no-default-features",
            "--features",
            feat,
            "--release",
        ])?;
    }
    Ok(())
}

/// Helper to run a cargo command line, printing to stdout/stderr.
fn run_cmd(args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    // build a command
    let status = Command::new("cargo")
        .args(args)
        .spawn()?
        .wait()?;

    if !status.success() {
        // we convert the exit code or signal into an error
        return Err(format!("command `cargo {}` failed", args.join(" ")).into());
    }
    Ok(())
}
