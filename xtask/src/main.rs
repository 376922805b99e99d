//! Build automation tasks for the assembly viewer
//!
//! Usage:
//!   cargo xtask build-web         # Build WASM bundle into dist/web
//!   cargo xtask package-native    # Release binary plus assets into dist/native

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

const BIN_NAME: &str = "assembly-viewer";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the assembly viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build WASM for web deployment
    BuildWeb {
        /// Mark as dev build (adds DEV to the page title)
        #[arg(long)]
        dev: bool,
    },
    /// Build a native release with its assets next to it
    PackageNative,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildWeb { dev } => build_web(dev),
        Commands::PackageNative => package_native(),
    }
}

/// Get the project root directory
fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Download a file from URL to destination
fn download_file(url: &str, dest: &Path) -> Result<()> {
    println!("Downloading {}...", url);
    run_cmd(
        Command::new("curl")
            .args(["-L", "-o"])
            .arg(dest)
            .arg(url),
    )
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src).with_context(|| format!("reading {}", src.display()))? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Copy `assets/` if the project has one; models can also be served elsewhere
fn copy_assets(root: &Path, dist: &Path) -> Result<()> {
    let assets = root.join("assets");
    if assets.exists() {
        copy_dir_recursive(&assets, &dist.join("assets"))?;
    } else {
        println!("No assets/ directory, skipping");
    }
    Ok(())
}

/// Minimal page that boots the macroquad loader full-window
fn index_html(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
html, body, canvas {{ margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; background: #020617; }}
</style>
</head>
<body>
<canvas id="glcanvas" tabindex="1"></canvas>
<script src="mq_js_bundle.js"></script>
<script>load("{bin}.wasm");</script>
</body>
</html>
"#,
        title = title,
        bin = BIN_NAME,
    )
}

/// Build WASM for web deployment
fn build_web(dev: bool) -> Result<()> {
    let root = project_root();
    let dist = root.join("dist/web");

    println!("Building WASM...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--target", "wasm32-unknown-unknown", "--bin", BIN_NAME]),
    )?;

    // Clean and create dist folder
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    println!("Copying files to dist/web...");
    let wasm = format!("{}.wasm", BIN_NAME);
    std::fs::copy(
        root.join("target/wasm32-unknown-unknown/release").join(&wasm),
        dist.join(&wasm),
    )
    .context("copying wasm binary")?;

    let title = if dev { "[DEV] Assembly Viewer" } else { "Assembly Viewer" };
    std::fs::write(dist.join("index.html"), index_html(title))?;

    // Download macroquad JS bundle
    let mq_js = dist.join("mq_js_bundle.js");
    if !mq_js.exists() {
        download_file(
            "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js",
            &mq_js,
        )?;
    }

    copy_assets(&root, &dist)?;

    println!("Web build complete: dist/web/");
    Ok(())
}

/// Build a native release for the host platform
fn package_native() -> Result<()> {
    let root = project_root();
    let dist = root.join("dist/native");

    println!("Building native release...");
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--bin", BIN_NAME]),
    )?;

    let binary_name = if cfg!(target_os = "windows") {
        format!("{}.exe", BIN_NAME)
    } else {
        BIN_NAME.to_string()
    };
    std::fs::copy(
        root.join("target/release").join(&binary_name),
        dist.join(&binary_name),
    )
    .context("copying native binary")?;

    copy_assets(&root, &dist)?;

    println!("Native build complete: dist/native/");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_loads_binary() {
        let html = index_html("[DEV] Assembly Viewer");
        assert!(html.contains("<title>[DEV] Assembly Viewer</title>"));
        assert!(html.contains(r#"load("assembly-viewer.wasm")"#));
    }
}
