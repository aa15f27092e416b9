// Spring Blessing - Build Task Runner
// Invoked as `cargo xtask <COMMAND>`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use xshell::{Shell, cmd};

const BINARY_NAME: &str = "spring-blessing";

fn main() -> Result<()> {
    let sh = Shell::new()?;
    let args: Vec<_> = std::env::args().skip(1).collect();

    match args.first().map(|s| s.as_str()) {
        Some("build") => build(&sh, args.iter().any(|a| a == "--release")),
        Some("test") => test(&sh),
        Some("format") => format(&sh, args.iter().any(|a| a == "--check")),
        Some("clippy") => clippy(&sh),
        Some("run") => run(&sh, &args[1..]),
        Some("clean") => clean(&sh),
        Some("ci") => ci(&sh),
        Some("dist") => dist(&sh),
        _ => {
            print_help();
            Ok(())
        },
    }
}

fn print_help() {
    println!("Spring Blessing - Build Commands:");
    println!();
    println!("Usage: cargo xtask <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  build [--release]   Build the service");
    println!("  test                Run all tests");
    println!("  format [--check]    Format code (check mode doesn't modify)");
    println!("  clippy              Run clippy checks");
    println!("  run [ARGS...]       Run the service, passing ARGS through");
    println!("  clean               Clean build artifacts");
    println!("  ci                  Run all CI checks (format + clippy + test)");
    println!("  dist                Create distribution package (tar.gz)");
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    let _dir = sh.push_dir(project_root());
    println!("🦀 Building {}{}...", BINARY_NAME, if release { " (release)" } else { "" });

    if release {
        cmd!(sh, "cargo build --release -p {BINARY_NAME}")
            .run()
            .context("Failed to build in release mode")?;
    } else {
        cmd!(sh, "cargo build -p {BINARY_NAME}").run().context("Failed to build")?;
    }

    println!("✅ Build complete");
    Ok(())
}

fn test(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root());
    println!("🧪 Running tests...");

    cmd!(sh, "cargo test --workspace").run().context("Tests failed")?;

    println!("✅ All tests passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    if check {
        cmd!(sh, "cargo fmt --all -- --check").run().context("Rust code is not formatted")?;
        println!("✅ Rust code is properly formatted");
    } else {
        cmd!(sh, "cargo fmt --all").run().context("Failed to format Rust code")?;
        println!("✅ Rust code formatted");
    }

    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    cmd!(sh, "cargo clippy --workspace --all-targets -- --deny warnings")
        .run()
        .context("Clippy checks failed")?;

    Ok(())
}

fn run(sh: &Shell, args: &[String]) -> Result<()> {
    let _dir = sh.push_dir(project_root());
    println!("▶️  Starting {}...", BINARY_NAME);

    cmd!(sh, "cargo run -p {BINARY_NAME} -- {args...}")
        .run()
        .context("Failed to run application")?;

    Ok(())
}

fn clean(sh: &Shell) -> Result<()> {
    let project = project_root();
    let _dir = sh.push_dir(&project);
    println!("🧹 Cleaning build artifacts...");

    cmd!(sh, "cargo clean").run()?;
    sh.remove_path(project.join("build"))?;

    println!("✅ Clean complete!");
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("📝 [1/3] Checking code format...");
    format(sh, true)?;

    println!("🔍 [2/3] Running clippy checks...");
    clippy(sh)?;

    println!("🧪 [3/3] Running tests...");
    test(sh)?;

    println!("🎉 CI pipeline completed successfully!");
    Ok(())
}

/// Release build laid out as bin/ conf/ logs/, packed into a tarball
fn dist(sh: &Shell) -> Result<()> {
    build(sh, true)?;

    let project = project_root();
    let dist_dir = project.join("build/dist");
    sh.create_dir(dist_dir.join("bin"))?;
    sh.create_dir(dist_dir.join("conf"))?;
    sh.create_dir(dist_dir.join("logs"))?;

    sh.copy_file(
        project.join("target/release").join(BINARY_NAME),
        dist_dir.join("bin").join(BINARY_NAME),
    )?;
    write_dist_config(&dist_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let package_name = format!("{}-{}.tar.gz", BINARY_NAME, timestamp);
    let _dir = sh.push_dir(&dist_dir);
    cmd!(sh, "tar czf {package_name} bin conf logs").run().context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", dist_dir.join(&package_name).display());
    Ok(())
}

/// Sample config with file logging enabled; LLM settings come from the environment
fn write_dist_config(dist_dir: &Path) -> Result<()> {
    let sample = std::fs::read_to_string(project_root().join("conf/config.toml"))
        .context("Failed to read conf/config.toml")?;
    let content =
        sample.replace("# file = \"logs/spring-blessing.log\"", "file = \"logs/spring-blessing.log\"");

    std::fs::write(dist_dir.join("conf/config.toml"), content)
        .context("Failed to create config file")?;
    Ok(())
}

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
