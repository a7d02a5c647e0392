// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use cinemanager_app::{
    Catalog, Clock, KeyValueStore, MOVIES_KEY, NoticeLevel, SystemClock, ViewCommand,
};
use cinemanager_db::Store;
use cinemanager_testkit::MovieFaker;
use cinemanager_tui::AppRuntime;
use config::Config;
use logging::LogTarget;
use runtime::FsRuntime;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use tracing::info;

const DEMO_MOVIE_COUNT: usize = 15;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `cinemanager --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let target = if options.is_headless() {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file()?)
    };
    logging::init(&target, config.log_level())?;

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or CINEMANAGER_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo {
        seed_demo(&store)?;
    }
    info!(path = %db_path.display(), demo = options.demo, "database ready");

    if options.check_only {
        println!("{}", check_summary(&store, &db_path)?);
        return Ok(());
    }

    let mut catalog = configured_catalog(store, SystemClock, &config);

    if let Some(path) = &options.import_path {
        import_headless(&mut catalog, path, options.assume_yes)?;
    }

    if let Some(dir) = &options.export {
        let export_dir = match dir {
            Some(dir) => dir.clone(),
            None => config.export_dir()?,
        };
        let path = export_headless(&mut catalog, export_dir)?;
        println!("exported {} movies to {}", catalog.movies().len(), path.display());
    }

    if options.is_headless() {
        return Ok(());
    }

    let mut runtime = FsRuntime::new(config.export_dir()?);
    cinemanager_tui::run_app(&mut catalog, &mut runtime)
}

/// Loads the catalog with the configured page size, sort and view mode. The
/// load-time welcome notice stays queued for the first frame.
fn configured_catalog<S, C>(store: S, clock: C, config: &Config) -> Catalog<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    let mut catalog = Catalog::load(store, clock).with_page_size(config.page_size());
    catalog.dispatch(ViewCommand::SetSort(config.sort()));
    catalog.dispatch(ViewCommand::SetViewMode(config.view_mode()));
    catalog
}

fn check_summary(store: &Store, db_path: &Path) -> Result<String> {
    let movies = store
        .get_raw(MOVIES_KEY)?
        .map(|raw| serde_json::from_str::<Vec<serde_json::Value>>(&raw).map(|list| list.len()))
        .transpose()
        .with_context(|| format!("saved catalog in {} is not a movie list", db_path.display()))?
        .unwrap_or(0);
    let saved = match store.updated_at(MOVIES_KEY)? {
        Some(at) => at.format(&Rfc3339).context("format last save time")?,
        None => "never".to_owned(),
    };
    Ok(format!(
        "ok: {} ({movies} movie(s), last saved {saved}, keys: {})",
        db_path.display(),
        store.keys()?.join(", ")
    ))
}

fn seed_demo(store: &Store) -> Result<()> {
    let movies = MovieFaker::new(2026).movies(DEMO_MOVIE_COUNT, SystemClock.now());
    let raw = serde_json::to_string(&movies).context("serialize demo movies")?;
    store.put_raw(MOVIES_KEY, &raw)
}

fn import_headless<S, C>(catalog: &mut Catalog<S, C>, path: &Path, assume_yes: bool) -> Result<()>
where
    S: KeyValueStore,
    C: Clock,
{
    let contents = fs::read_to_string(path).with_context(|| {
        format!(
            "read backup file {} -- check the path and try again",
            path.display()
        )
    })?;
    // Headless output reports the import only, not the load-time welcome.
    catalog.drain_notices();
    let pending = catalog.request_import(&contents)?;
    if !assume_yes {
        bail!("{} -- rerun with --yes to confirm", pending.prompt());
    }

    catalog.commit(pending);
    report_notices(catalog)
}

fn export_headless<S, C>(catalog: &mut Catalog<S, C>, export_dir: PathBuf) -> Result<PathBuf>
where
    S: KeyValueStore,
    C: Clock,
{
    let file = catalog.export()?;
    FsRuntime::new(export_dir).write_export(&file)
}

fn report_notices<S, C>(catalog: &mut Catalog<S, C>) -> Result<()>
where
    S: KeyValueStore,
    C: Clock,
{
    let mut failure = None;
    for notice in catalog.drain_notices() {
        if notice.level == NoticeLevel::Error {
            failure = Some(notice.message);
        } else {
            println!("{}: {}", notice.level.as_str(), notice.message);
        }
    }
    match failure {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    export: Option<Option<PathBuf>>,
    import_path: Option<PathBuf>,
    assume_yes: bool,
    show_help: bool,
}

impl CliOptions {
    fn is_headless(&self) -> bool {
        self.check_only || self.export.is_some() || self.import_path.is_some()
    }
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        export: None,
        import_path: None,
        assume_yes: false,
        show_help: false,
    };

    let mut iter = args.into_iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--export" => {
                let dir = iter
                    .next_if(|next| !next.as_ref().starts_with('-'))
                    .map(|dir| PathBuf::from(dir.as_ref()));
                options.export = Some(dir);
            }
            "--import" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--import requires a backup file path"))?;
                options.import_path = Some(PathBuf::from(value.as_ref()));
            }
            "--yes" | "-y" => {
                options.assume_yes = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if options.assume_yes && options.import_path.is_none() {
        bail!("--yes only confirms --import; pass --import <file> as well");
    }

    Ok(options)
}

fn print_help() {
    println!("cinemanager - a personal movie catalog");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with seeded demo movies (in-memory)");
    println!("  --check                  Validate config + DB and print a summary");
    println!("  --export [dir]           Write a JSON backup and exit");
    println!("  --import <file>          Replace the catalog with a JSON backup");
    println!("  --yes, -y                Confirm --import without prompting");
    println!("  --help                   Show this help");
}
