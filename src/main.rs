mod config;
mod crawler;
mod logging;
mod storage;

use config::Config;
use logging::RunLog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;
    let log = RunLog::open(&cfg.log_path, RunLog::default_filter())?;

    let report = log.scope(crawler::crawl_pages(&cfg)).await?;

    let saved = storage::save_or_log(&log, &cfg.output_path, &report.listings);

    println!("\n==============================");
    println!("PAGES SCRAPED: {}", cfg.end_page - cfg.start_page + 1);
    println!("FAILED PAGES:  {:?}", report.failed_pages);
    println!("TOTAL ITEMS FOUND: {}", report.listings.len());
    match saved {
        Some(rows) => println!("SAVED {} ROWS TO {}", rows, cfg.output_path.display()),
        None => println!("NOTHING SAVED, see {}", cfg.log_path.display()),
    }
    println!("==============================\n");

    Ok(())
}
