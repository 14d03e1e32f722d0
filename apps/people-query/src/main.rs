use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use mimalloc::MiMalloc;
use query_core::{FilterRequest, Operation, PageDataRequest, SortDirection};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use people::client::PeopleApi;
use people::config::PeopleConfig;
use people::domain::service::Service;
use people::gateways::local::PeopleLocalClient;
use people::infra::storage::{migrations::Migrator, SeaOrmPeopleRepository};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Query the people directory with filter/sort/page parameters
#[derive(Parser)]
#[command(name = "people-query")]
#[command(about = "Query the people directory with strict or loose filters")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Insert demo rows when the table is empty
    #[arg(long)]
    seed: bool,

    /// Infer value types instead of checking them against the schema
    #[arg(long)]
    loose: bool,

    /// Filter as field:OP:value, e.g. lastName:CONTAINS:ame 1 (repeatable)
    #[arg(short, long = "filter", value_name = "FIELD:OP:VALUE")]
    filters: Vec<String>,

    /// Sort field, in priority order (repeatable)
    #[arg(short, long = "sort", value_name = "FIELD")]
    sort: Vec<String>,

    /// Sort direction, required with --sort
    #[arg(short, long)]
    direction: Option<SortDirection>,

    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u64,

    /// Page size
    #[arg(long, default_value_t = 10)]
    size: u64,

    /// Read the whole request as a JSON body from this file instead
    #[arg(long, conflicts_with_all = ["filters", "sort", "direction", "page", "size"])]
    request: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, &config.home_path());

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let req = build_request(&cli)?;
    let client = connect_people(&config, cli.seed).await?;

    let page = if cli.loose {
        client.list_people_loose(req).await
    } else {
        client.list_people(req).await
    }
    .map_err(|e| {
        tracing::error!(error = %e, loose = cli.loose, "people query failed");
        anyhow!(e)
    })?;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

fn build_request(cli: &Cli) -> Result<PageDataRequest> {
    if let Some(path) = &cli.request {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?;
        return serde_json::from_str(&raw).context("Failed to parse request JSON");
    }

    let mut req = PageDataRequest::new(cli.page, cli.size);
    req.sort_direction = cli.direction;
    if !cli.sort.is_empty() {
        req.sort_fields = Some(cli.sort.clone());
    }
    for raw in &cli.filters {
        req = req.with_filter(parse_filter(raw)?);
    }
    Ok(req)
}

/// `field:OP:value`; the value keeps any further colons (times, URLs).
fn parse_filter(raw: &str) -> Result<FilterRequest> {
    let mut parts = raw.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(op), Some(value)) => Ok(FilterRequest::new(
            field,
            value,
            Operation::parse_lenient(op),
        )),
        _ => bail!("Invalid filter '{raw}', expected FIELD:OP:VALUE"),
    }
}

async fn connect_people(config: &AppConfig, seed: bool) -> Result<PeopleLocalClient> {
    let db = connect_db(config).await?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run people migrations")?;

    let people_config = if config.modules.contains_key("people") {
        config.module_config::<PeopleConfig>("people")?
    } else {
        PeopleConfig::from(config.query.limits())
    };

    let repo = Arc::new(SeaOrmPeopleRepository::new(db));
    let service = Arc::new(Service::new(repo, people_config));
    if seed {
        let inserted = service.seed_demo().await?;
        tracing::info!(inserted, "demo data ready");
    }
    Ok(PeopleLocalClient::new(service))
}

async fn connect_db(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = config.database.clone().unwrap_or(DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_conns: Some(1),
    });
    let url = if db_config.url.starts_with("sqlite") {
        absolutize_sqlite_dsn(&db_config.url, &config.home_path())?
    } else {
        db_config.url.clone()
    };

    let mut opts = ConnectOptions::new(url);
    if let Some(max) = db_config.max_conns {
        opts.max_connections(max);
    }
    tracing::debug!(url = %db_config.url, "connecting to database");
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {}", db_config.url))
}

/// Resolve a relative sqlite DSN against `base_dir` and make sure the file can
/// be created. "sqlite::memory:" is kept as-is.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {dsn})"))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };
    if path_str.is_empty() {
        bail!("Empty SQLite path in DSN");
    }

    let mut p = PathBuf::from(path_str);
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}
