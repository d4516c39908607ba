//! Query a payload catalog from the command line.
//!
//! Selects a catalog either by file or by unit type (searched in the catalog
//! directory), then prints the answer to exactly one query as compact JSON.

use anyhow::{Context, Result, bail};
use loadout_catalog::logging::init_tracing;
use loadout_catalog::{LoadoutIndex, TaskTag, UnitType, find_catalog_dir, load_unit_catalog};
use serde_json::{Value, json};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    let index = args.source.open()?;
    let output = answer(&index, &args.query)?;
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn answer(index: &LoadoutIndex, query: &Query) -> Result<Value> {
    let value = match query {
        Query::List => json!(
            index
                .presets()
                .iter()
                .map(|preset| json!({"name": preset.name, "displayName": preset.display_name}))
                .collect::<Vec<_>>()
        ),
        Query::Name(name) => match index.find_by_name(name) {
            Some(preset) => serde_json::to_value(preset)?,
            None => Value::Null,
        },
        Query::Task(task) => serde_json::to_value(index.find_by_task(*task))?,
        Query::Positions(name) => serde_json::to_value(index.occupied_positions(name)?)?,
        Query::Stores(name) => serde_json::to_value(index.stores(name)?)?,
        Query::Store(clsid) => json!(
            index
                .find_by_store(clsid)
                .iter()
                .map(|preset| preset.name.as_str())
                .collect::<Vec<_>>()
        ),
    };
    Ok(value)
}

enum Source {
    File(PathBuf),
    Unit { unit_type: String, dir: Option<PathBuf> },
}

impl Source {
    fn open(&self) -> Result<Arc<LoadoutIndex>> {
        match self {
            Source::File(path) => Ok(Arc::new(LoadoutIndex::load(path)?)),
            Source::Unit { unit_type, dir } => {
                let dir = match dir {
                    Some(dir) => dir.clone(),
                    None => find_catalog_dir()?,
                };
                Ok(Arc::new(load_unit_catalog(&dir, &UnitType(unit_type.clone()))?))
            }
        }
    }
}

enum Query {
    List,
    Name(String),
    Task(TaskTag),
    Positions(String),
    Stores(String),
    Store(String),
}

struct CliArgs {
    source: Source,
    query: Query,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut file: Option<PathBuf> = None;
        let mut unit: Option<String> = None;
        let mut dir: Option<PathBuf> = None;
        let mut query: Option<Query> = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            let next_query = match arg.as_str() {
                "--file" => {
                    file = Some(PathBuf::from(next_value(&mut args, "--file")?));
                    None
                }
                "--unit" => {
                    unit = Some(next_value(&mut args, "--unit")?);
                    None
                }
                "--dir" => {
                    dir = Some(PathBuf::from(next_value(&mut args, "--dir")?));
                    None
                }
                "--list" => Some(Query::List),
                "--name" => Some(Query::Name(next_value(&mut args, "--name")?)),
                "--task" => {
                    let raw = next_value(&mut args, "--task")?;
                    let tag: i64 = raw
                        .parse()
                        .with_context(|| format!("--task expects an integer, got '{raw}'"))?;
                    Some(Query::Task(TaskTag(tag)))
                }
                "--positions" => Some(Query::Positions(next_value(&mut args, "--positions")?)),
                "--stores" => Some(Query::Stores(next_value(&mut args, "--stores")?)),
                "--store" => Some(Query::Store(next_value(&mut args, "--store")?)),
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            };
            if let Some(next_query) = next_query {
                if query.is_some() {
                    bail!("only one query flag may be provided");
                }
                query = Some(next_query);
            }
        }

        let source = match (file, unit) {
            (Some(path), None) => Source::File(path),
            (None, Some(unit_type)) => Source::Unit { unit_type, dir },
            (Some(_), Some(_)) => bail!("--file and --unit are mutually exclusive"),
            (None, None) => bail!("one of --file or --unit is required\n{}", usage()),
        };
        let query = query.unwrap_or(Query::List);

        Ok(CliArgs { source, query })
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
    "Usage: payload-query (--file PATH | --unit UNIT_TYPE [--dir DIR]) [--list | --name NAME | --task TAG | --positions NAME | --stores NAME | --store CLSID]\n\
Prints the answer to one catalog query as JSON. --name prints null when the preset is absent.\n"
}
