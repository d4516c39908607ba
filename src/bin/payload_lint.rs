//! Lint payload catalog files.
//!
//! Loads each catalog, runs the validator, and prints one JSON report per file
//! (an array on stdout). With `--strict`, files are also checked against the
//! bundled JSON Schema so every shape error is listed, not just the first one
//! the loader trips over. Exits 1 when any file fails.

use anyhow::{Context, Result, bail};
use loadout_catalog::logging::init_tracing;
use loadout_catalog::{
    CatalogSchema, collect_violations, find_catalog_dir, list_catalog_files, load_catalog,
};
use serde::Serialize;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn main() {
    init_tracing();
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let args = CliArgs::parse()?;
    let files = args.resolve_files()?;
    let schema = if args.strict {
        Some(match &args.schema {
            Some(path) => CatalogSchema::load(path)?,
            None => CatalogSchema::bundled()?,
        })
    } else {
        None
    };

    let reports: Vec<FileReport> = files
        .iter()
        .map(|path| lint_file(path, schema.as_ref()))
        .collect();
    let all_ok = reports.iter().all(|report| report.status == Status::Ok);

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(all_ok)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Ok,
    Unreadable,
    SchemaMismatch,
    Malformed,
    Invalid,
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presets: Option<usize>,
    errors: Vec<String>,
}

impl FileReport {
    fn new(path: &Path, status: Status) -> Self {
        Self {
            file: path.display().to_string(),
            status,
            unit_type: None,
            presets: None,
            errors: Vec::new(),
        }
    }

    fn failed(path: &Path, status: Status, errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::new(path, status)
        }
    }
}

fn lint_file(path: &Path, schema: Option<&CatalogSchema>) -> FileReport {
    debug!(file = %path.display(), "linting catalog");
    let value = match read_json(path) {
        Ok(value) => value,
        Err(err) => return FileReport::failed(path, Status::Unreadable, vec![format!("{err:#}")]),
    };

    if let Some(schema) = schema {
        let errors = schema.check(&value);
        if !errors.is_empty() {
            return FileReport::failed(path, Status::SchemaMismatch, errors);
        }
    }

    let catalog = match load_catalog(&value) {
        Ok(catalog) => catalog,
        Err(err) => return FileReport::failed(path, Status::Malformed, vec![err.to_string()]),
    };

    let violations = collect_violations(&catalog);
    let status = if violations.is_empty() {
        Status::Ok
    } else {
        Status::Invalid
    };
    FileReport {
        unit_type: Some(catalog.unit_type.to_string()),
        presets: Some(catalog.payloads.len()),
        errors: violations.iter().map(ToString::to_string).collect(),
        ..FileReport::new(path, status)
    }
}

fn read_json(path: &Path) -> Result<Value> {
    if !path.is_file() {
        bail!("catalog file not found: {}", path.display());
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

struct CliArgs {
    files: Vec<PathBuf>,
    dir: Option<PathBuf>,
    schema: Option<PathBuf>,
    strict: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut files = Vec::new();
        let mut dir: Option<PathBuf> = None;
        let mut schema: Option<PathBuf> = None;
        let mut strict = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--file" => files.push(PathBuf::from(next_value(&mut args, "--file")?)),
                "--dir" => {
                    if dir.is_some() {
                        bail!("--dir may only be provided once");
                    }
                    dir = Some(PathBuf::from(next_value(&mut args, "--dir")?));
                }
                "--schema" => {
                    schema = Some(PathBuf::from(next_value(&mut args, "--schema")?));
                    strict = true;
                }
                "--strict" => strict = true,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }

        Ok(CliArgs {
            files,
            dir,
            schema,
            strict,
        })
    }

    fn resolve_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = self.files.clone();
        if let Some(dir) = &self.dir {
            files.extend(list_catalog_files(dir)?);
        }
        if files.is_empty() {
            let dir = find_catalog_dir()?;
            files.extend(list_catalog_files(&dir)?);
        }
        Ok(files)
    }
}

fn next_value(args: &mut impl Iterator<Item = std::ffi::OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: payload-lint [--file PATH]... [--dir DIR] [--strict] [--schema PATH]\n\
Loads and validates payload catalogs (default: every *.json under LOADOUT_CATALOG_DIR) and prints a JSON report per file.\n"
}
