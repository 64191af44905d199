use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use skywall_core::data::Database;
use skywall_core::report::{
    gather_report_data, generate_json_report, generate_text_report, save_report, ReportFormat,
};
use skywall_core::store::{group_records, StatusStore};
use skywall_scraper::archive;
use skywall_scraper::cache::PageCache;
use skywall_scraper::classify::PageStatus;
use skywall_scraper::download::{download_images, DownloadOutcome};
use skywall_scraper::provider::Provider;
use skywall_scraper::run::{PageRecord, Runner};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DB_FILE: &str = "skywall.db";

// Helper functions shared by the handlers

/// Expand `~` in a cache-dir argument.
pub fn expand_cache_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Parse a `--status` argument, case-insensitively.
pub fn parse_status_arg(raw: &str) -> Option<PageStatus> {
    PageStatus::from_str(raw)
}

pub fn db_path(cache_root: &Path) -> PathBuf {
    cache_root.join(DB_FILE)
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush().unwrap();
    let mut response = String::new();
    io::stdin().read_line(&mut response).unwrap();
    response.trim().to_lowercase()
}

fn colorize_status(status: PageStatus) -> colored::ColoredString {
    match status {
        PageStatus::Ok => status.as_str().green(),
        PageStatus::Error | PageStatus::ErrorDownloading => status.as_str().red(),
        _ => status.as_str().yellow(),
    }
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    let raw_path = args.get_one::<String>("PATH").unwrap();
    let force = args.get_flag("force");
    let cache_root = expand_cache_dir(raw_path);
    let provider = Provider::apod(&cache_root);
    let db_loc = db_path(&cache_root);

    println!(
        "{} Target: {}",
        "→".blue(),
        cache_root.display().to_string().bright_white()
    );

    if Database::exists(&db_loc) && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("A status database already exists at {}", db_loc.display());
        let response = print_prompt("Overwrite it? [y/N]:");
        if response != "y" && response != "yes" {
            println!("Initialization cancelled.");
            return Ok(());
        }
    }

    std::fs::create_dir_all(provider.page_dir()).context("creating page cache directory")?;
    std::fs::create_dir_all(provider.img_dir()).context("creating image directory")?;

    if Database::exists(&db_loc) {
        Database::drop(&db_loc).context("removing existing database")?;
    }
    Database::new(&db_loc).context("creating status database")?;

    println!("{} Cache directories created", "✓".green().bold());
    println!(
        "{} Database: {}",
        "✓".green().bold(),
        db_loc.display().to_string().bright_white()
    );
    Ok(())
}

pub async fn handle_classify(args: &ArgMatches) -> Result<()> {
    let cache_root = expand_cache_dir(args.get_one::<String>("cache-dir").unwrap());
    let full = args.get_flag("full");
    let threads = *args.get_one::<usize>("threads").unwrap();
    let timeout = *args.get_one::<u64>("timeout").unwrap();

    let provider = Provider::apod(&cache_root);
    let cache = Arc::new(PageCache::with_timeout(&provider, timeout));

    println!(
        "\n🔭 Classifying the {} archive ({} workers)\n",
        if full { "full" } else { "recent" },
        threads
    );

    let ids = archive::list_pages(&cache, &provider, full)
        .await
        .context("listing the archive index")?;

    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{pos}/{len}] {msg}")
            .unwrap(),
    );
    let pb_clone = pb.clone();
    let progress_callback: skywall_scraper::run::ProgressCallback =
        Arc::new(move |_worker_id: usize, page: String| {
            pb_clone.set_message(page);
            pb_clone.inc(1);
        });

    let runner = Runner::new(cache, &provider).with_progress_callback(progress_callback);
    let records = runner
        .run(ids, threads.max(1))
        .await
        .context("running classification")?;
    pb.finish_and_clear();

    let store = StatusStore::new(&provider);
    store.save(&records).context("persisting status maps")?;

    let db_loc = db_path(&cache_root);
    let mut db = Database::new(&db_loc).context("opening status database")?;
    db.rebuild(&records).context("rebuilding status database")?;

    println!("{} Classification complete\n", "✓".green().bold());
    println!("  Pages classified: {}", records.len());
    for group in group_records(&records) {
        println!(
            "  {:<18} {}",
            colorize_status(group.status),
            group.pages.len()
        );
    }
    Ok(())
}

pub fn handle_list(args: &ArgMatches) -> Result<()> {
    let cache_root = expand_cache_dir(args.get_one::<String>("cache-dir").unwrap());
    let raw_status = args.get_one::<String>("status").unwrap();

    let status = match parse_status_arg(raw_status) {
        Some(status) => status,
        None => bail!(
            "unknown status '{}' (try OK, HORIZONTAL, OLD, GIF, VIDEO, SKIP, \
             IFRAME, OBJECT, EMBED, APPLET, ERROR)",
            raw_status
        ),
    };

    let provider = Provider::apod(&cache_root);
    let store = StatusStore::new(&provider);
    let pages = store
        .list(status)
        .context("loading the persisted group map (run `skywall classify` first)")?;

    for page in &pages {
        println!("{}", page);
    }
    eprintln!(
        "{} {} pages with status {}",
        "✓".green().bold(),
        pages.len(),
        colorize_status(status)
    );
    Ok(())
}

pub async fn handle_download(args: &ArgMatches) -> Result<()> {
    let cache_root = expand_cache_dir(args.get_one::<String>("cache-dir").unwrap());
    let overwrite = args.get_flag("overwrite");
    let timeout = *args.get_one::<u64>("timeout").unwrap();

    let provider = Provider::apod(&cache_root);
    let store = StatusStore::new(&provider);
    let images = store
        .load_images()
        .context("loading image metadata (run `skywall classify` first)")?;

    let records: Vec<PageRecord> = images
        .into_iter()
        .map(|entry| PageRecord {
            page: entry.page,
            status: PageStatus::Ok,
            image: Some(entry.image),
        })
        .collect();

    println!("\n🌌 Downloading {} images\n", records.len());

    let cache = PageCache::with_timeout(&provider, timeout);
    let results = download_images(&cache, &provider, &records, overwrite)
        .await
        .context("downloading images")?;

    let mut downloaded = 0;
    let mut skipped = 0;
    let mut failed = Vec::new();
    for result in &results {
        match &result.outcome {
            DownloadOutcome::Downloaded(_) => downloaded += 1,
            DownloadOutcome::SkippedExisting(_) => skipped += 1,
            DownloadOutcome::Failed(reason) => failed.push((result.page.clone(), reason.clone())),
        }
    }

    println!("{} Download complete\n", "✓".green().bold());
    println!("  Downloaded: {}", downloaded);
    println!("  Skipped (already on disk): {}", skipped);
    if !failed.is_empty() {
        println!("  {}: {}", "Failed".red().bold(), failed.len());
        for (page, reason) in &failed {
            println!("    {} {} - {}", "✗".red(), page, reason);
        }
    }
    Ok(())
}

pub fn handle_report(args: &ArgMatches) -> Result<()> {
    let cache_root = expand_cache_dir(args.get_one::<String>("cache-dir").unwrap());
    let format = args.get_one::<String>("format").unwrap();
    let output = args.get_one::<PathBuf>("output");

    let provider = Provider::apod(&cache_root);
    let store = StatusStore::new(&provider);
    let data = gather_report_data(&store, &provider.short_name)
        .context("loading the persisted status map (run `skywall classify` first)")?;

    let format = ReportFormat::from_str(format).expect("clap restricts the format values");
    let content = match format {
        ReportFormat::Text => generate_text_report(&data),
        ReportFormat::Json => generate_json_report(&data).context("rendering JSON report")?,
    };

    match output {
        Some(path) => {
            save_report(&content, path).context("saving report")?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}
