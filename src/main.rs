// ==========================================
// Appliance Registry - Command-line entry
// ==========================================
// Usage:
//   appliance-registry import <file> <entity[:sheet]>...
//   appliance-registry template <dir>
//   appliance-registry count
//   appliance-registry list <entity> [page] [limit]
//   appliance-registry search <entity> <query> [page] [limit]
//   appliance-registry config show
//   appliance-registry config set <key> <value>
//
// Summaries and query results go to stdout as JSON; logs go to stderr
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use appliance_registry::api::{RegistryApi, DEFAULT_PAGE_LIMIT};
use appliance_registry::config::{ConfigManager, ImportConfigReader};
use appliance_registry::db::default_db_path;
use appliance_registry::importer::{parse_requests, write_templates, BatchImporter, EntityKind};
use appliance_registry::repository::{DocumentStore, SqliteDocumentStore};
use appliance_registry::{logging, APP_NAME, VERSION};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

const USAGE: &str = "usage:
  appliance-registry import <file> <entity[:sheet]>...
  appliance-registry template <dir>
  appliance-registry count
  appliance-registry list <entity> [page] [limit]
  appliance-registry search <entity> <query> [page] [limit]
  appliance-registry config show
  appliance-registry config set <key> <value>";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{} {}\n\n{}", APP_NAME, VERSION, USAGE);
        return Ok(());
    };

    match command.as_str() {
        "import" => run_import(rest).await,
        "template" => run_template(rest),
        "count" => run_count().await,
        "list" => run_list(rest).await,
        "search" => run_search(rest).await,
        "config" => run_config(rest),
        other => bail!("unknown command: {}\n\n{}", other, USAGE),
    }
}

fn open_store() -> Result<SqliteDocumentStore> {
    let db_path = default_db_path();
    tracing::info!(db = %db_path, "using database");
    let store = SqliteDocumentStore::open(&db_path)
        .with_context(|| format!("cannot open database {}", db_path))?;
    Ok(store)
}

async fn run_import(args: &[String]) -> Result<()> {
    let (file, entities) = args
        .split_first()
        .ok_or_else(|| anyhow!("import needs a file\n\n{}", USAGE))?;
    if entities.is_empty() {
        bail!("import needs at least one entity type\n\n{}", USAGE);
    }

    let store = open_store()?;
    let config = ConfigManager::from_connection(store.connection())?;
    let settings = config.load_import_settings().await?;

    let requests = parse_requests(entities);
    let results = BatchImporter::new(&store, settings)
        .import_file(file, &requests)
        .await?;

    println!("{}", serde_json::to_string_pretty(&json!({ "results": results }))?);
    Ok(())
}

fn run_template(args: &[String]) -> Result<()> {
    let dir = args
        .first()
        .ok_or_else(|| anyhow!("template needs a directory\n\n{}", USAGE))?;
    for path in write_templates(Path::new(dir))? {
        println!("{}", path.display());
    }
    Ok(())
}

async fn run_count() -> Result<()> {
    let store = open_store()?;
    let mut counts = serde_json::Map::new();
    for kind in EntityKind::ALL {
        let count = store.count(kind.collection_name()).await?;
        counts.insert(kind.collection_name().to_string(), json!(count));
    }
    println!("{}", serde_json::to_string_pretty(&counts)?);
    Ok(())
}

async fn run_list(args: &[String]) -> Result<()> {
    let kind: EntityKind = args
        .first()
        .ok_or_else(|| anyhow!("list needs an entity type\n\n{}", USAGE))?
        .parse()?;
    let page = parse_number(args.get(1), 1, "page")?;
    let limit = parse_number(args.get(2), DEFAULT_PAGE_LIMIT, "limit")?;

    let store = open_store()?;
    let api = RegistryApi::new(Arc::new(store));
    let listing = api.list(kind, page, limit).await?;
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

async fn run_search(args: &[String]) -> Result<()> {
    let [entity, query, paging @ ..] = args else {
        bail!("search needs an entity type and a query\n\n{}", USAGE);
    };
    let kind: EntityKind = entity.parse()?;
    let page = parse_number(paging.first(), 1, "page")?;
    let limit = parse_number(paging.get(1), DEFAULT_PAGE_LIMIT, "limit")?;

    let store = open_store()?;
    let api = RegistryApi::new(Arc::new(store));
    let hits = api.search(kind, query, page, limit).await?;
    println!("{}", serde_json::to_string_pretty(&hits)?);
    Ok(())
}

fn run_config(args: &[String]) -> Result<()> {
    let config = ConfigManager::new(&default_db_path())?;
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["show"] | [] => println!("{}", config.get_config_snapshot()?),
        ["set", key, value] => {
            config.set_global_config_value(key, value)?;
            tracing::info!(key = *key, value = *value, "config value set");
        }
        _ => bail!("unrecognized config arguments\n\n{}", USAGE),
    }
    Ok(())
}

fn parse_number(arg: Option<&String>, default: u64, name: &str) -> Result<u64> {
    match arg {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a positive number, got {}", name, raw)),
        None => Ok(default),
    }
}
