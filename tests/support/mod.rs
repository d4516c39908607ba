use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// The F-16C catalog bundled under `catalogs/`.
pub fn bundled_catalog_path() -> PathBuf {
    repo_root().join("catalogs").join("F-16C_50.json")
}

pub fn write_catalog(dir: &Path, file: &str, value: &Value) -> Result<PathBuf> {
    let path = dir.join(file);
    fs::write(&path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn helper_binary(name: &str) -> PathBuf {
    match name {
        "payload-lint" => PathBuf::from(env!("CARGO_BIN_EXE_payload-lint")),
        "payload-query" => PathBuf::from(env!("CARGO_BIN_EXE_payload-query")),
        other => panic!("unknown helper binary {other}"),
    }
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn stdout_json(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).context("stdout was not JSON")
}
