use apartment_scraper::analyzer::{load_snapshot_html, SnapshotAnalyzer};
use apartment_scraper::client::{
    job_id_of, poll_many, results_of, ApartmentScraperClient, ClientError, ScrapeRequest,
    DEFAULT_MAX_PAGES, DEFAULT_MAX_WORKERS,
};
use apartment_scraper::config::{ClientConfig, DEFAULT_BASE_URL, ENV_API_KEY, ENV_BASE_URL};
use apartment_scraper::db::{init_db, record_job, save_listings, Database, JobRecord};
use apartment_scraper::domain::{rows_from_results, summarize, ListingRow};
use apartment_scraper::spreadsheets::{export_listings_csv, export_listings_xlsx};
use apartment_scraper::telemetry::init_telemetry;
use apartment_scraper::{AppError, AppResult};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "apartment-scraper", version, about = "Client for the apartment scraper API")]
struct Cli {
    /// Base URL of the scraper service
    #[arg(long, global = true, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Sent as a bearer token when set
    #[arg(long, global = true, env = ENV_API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a scrape job and print the service's answer
    Start(ScrapeArgs),
    /// Print the current status of a job
    Status { job_id: String },
    /// Print the raw results payload of a job
    Results { job_id: String },
    /// Ask the service to stop a job
    Cancel { job_id: String },
    /// Block until a job finishes and print its results payload
    Wait {
        job_id: String,
        #[command(flatten)]
        poll: PollArgs,
    },
    /// Start a job, wait for it, then summarize / export / save the listings
    Scrape {
        #[command(flatten)]
        scrape: ScrapeArgs,
        #[command(flatten)]
        poll: PollArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Scrape several cities at once, e.g. `multi atlanta,ga austin,tx`
    Multi {
        #[arg(required = true, value_parser = parse_target)]
        targets: Vec<(String, String)>,
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,
        #[arg(long, default_value_t = DEFAULT_MAX_WORKERS)]
        max_workers: usize,
        #[command(flatten)]
        poll: PollArgs,
        /// Save every finished city's listings to this SQLite file
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Report prices, unit types and lease terms found in a saved HTML snapshot
    Analyze { snapshot: PathBuf },
}

#[derive(Debug, Args)]
struct ScrapeArgs {
    city: String,
    state: String,
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: u32,
    #[arg(long)]
    min_price: Option<u64>,
    #[arg(long)]
    max_price: Option<u64>,
    /// Bedroom counts, comma separated
    #[arg(long, value_delimiter = ',')]
    beds: Vec<u32>,
    /// Extra filter as key=value; the value is read as JSON when it parses
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, Value)>,
}

impl ScrapeArgs {
    fn to_request(&self) -> ScrapeRequest {
        let mut filters = Map::new();
        if let Some(min) = self.min_price {
            filters.insert("minPrice".into(), min.into());
        }
        if let Some(max) = self.max_price {
            filters.insert("maxPrice".into(), max.into());
        }
        if !self.beds.is_empty() {
            filters.insert("beds".into(), self.beds.clone().into());
        }
        for (key, value) in &self.filters {
            filters.insert(key.clone(), value.clone());
        }

        ScrapeRequest::new(&self.city, &self.state)
            .with_max_pages(self.max_pages)
            .with_filters(filters)
    }
}

#[derive(Debug, Args)]
struct PollArgs {
    /// Seconds between status checks [default: the client's poll interval, 5]
    #[arg(long)]
    interval: Option<u64>,
    /// Give up after this many seconds [default: the client's poll timeout, 300]
    #[arg(long)]
    timeout: Option<u64>,
}

impl PollArgs {
    fn interval(&self, client: &ApartmentScraperClient) -> Duration {
        self.interval.map_or(client.poll_interval(), Duration::from_secs)
    }

    fn timeout(&self, client: &ApartmentScraperClient) -> Duration {
        self.timeout.map_or(client.poll_timeout(), Duration::from_secs)
    }
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Print count/mean/min/max for beds, baths, sqft and average price
    #[arg(long)]
    summary: bool,
    #[arg(long)]
    csv: Option<PathBuf>,
    #[arg(long)]
    xlsx: Option<PathBuf>,
    /// SQLite file to upsert the listings into
    #[arg(long)]
    db: Option<PathBuf>,
}

fn parse_target(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(',') {
        Some((city, state)) if !city.trim().is_empty() && !state.trim().is_empty() => {
            Ok((city.trim().to_string(), state.trim().to_string()))
        }
        _ => Err(format!("expected CITY,STATE but got '{raw}'")),
    }
}

fn parse_filter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value but got '{raw}'"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

fn print_json(value: &impl serde::Serialize) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::BadRequest(format!("Failed to render JSON: {e}")))?;
    println!("{text}");
    Ok(())
}

fn open_db(path: &Path) -> AppResult<Database> {
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db)?;
    Ok(db)
}

fn job_record(job_id: &str, request: &ScrapeRequest, outcome: Result<usize, &ClientError>) -> JobRecord {
    let (status, listings, error_message) = match outcome {
        Ok(n) => ("completed", n as i64, None),
        Err(ClientError::JobCancelled) => ("cancelled", 0, None),
        Err(e @ ClientError::Timeout(_)) => ("timeout", 0, Some(e.to_string())),
        Err(e) => ("failed", 0, Some(e.to_string())),
    };

    JobRecord {
        job_id: job_id.to_string(),
        city: request.city.clone(),
        state: request.state.clone(),
        status: status.to_string(),
        listings,
        error_message,
        recorded_at: Utc::now().naive_utc(),
    }
}

fn write_outputs(rows: &[ListingRow], request: &ScrapeRequest, output: &OutputArgs) -> AppResult<()> {
    if output.summary {
        println!("\n{}", summarize(rows));
    }
    if let Some(path) = &output.csv {
        export_listings_csv(rows, path)?;
        println!("📄 Exported to {}", path.display());
    }
    if let Some(path) = &output.xlsx {
        let sheet = format!("{}_{}", request.city, request.state);
        export_listings_xlsx(rows, &sheet, path)?;
        println!("📊 Exported to {}", path.display());
    }
    if let Some(path) = &output.db {
        let db = open_db(path)?;
        let saved = save_listings(&db, rows)?;
        println!("💾 Saved {saved} listings to {}", path.display());
    }
    Ok(())
}

fn client_config(base_url: String, api_key: Option<String>) -> ClientConfig {
    ClientConfig {
        base_url,
        api_key: api_key.filter(|k| !k.trim().is_empty()),
        ..ClientConfig::from_env()
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = client_config(cli.base_url, cli.api_key);
    let client = ApartmentScraperClient::from_config(&config)?;

    match cli.command {
        Command::Start(args) => {
            let started = client.start_scrape(&args.to_request())?;
            print_json(&started)?;
        }
        Command::Status { job_id } => {
            let status = client.get_status(&job_id)?;
            print_json(&status)?;
        }
        Command::Results { job_id } => print_json(&client.get_results(&job_id)?)?,
        Command::Cancel { job_id } => print_json(&client.cancel_job(&job_id)?)?,
        Command::Wait { job_id, poll } => {
            let payload = client.poll_until_complete(&job_id, poll.interval(&client), poll.timeout(&client))?;
            print_json(&payload)?;
        }
        Command::Scrape {
            scrape,
            poll,
            output,
        } => {
            let request = scrape.to_request();
            let job_id = job_id_of(&client.start_scrape(&request)?)?;
            info!(%job_id, city = %request.city, state = %request.state, "Job started");

            let outcome = client
                .poll_until_complete(&job_id, poll.interval(&client), poll.timeout(&client))
                .and_then(results_of);

            if let Some(path) = &output.db {
                let db = open_db(path)?;
                let counted = outcome.as_ref().map(Vec::len);
                let record = job_record(&job_id, &request, counted);
                db.with_conn(|conn| record_job(conn, &record))?;
            }

            let listings = outcome?;
            println!("Found {} listings", listings.len());

            let rows = rows_from_results(&listings);
            if let Some(first) = rows.first() {
                println!("\nFirst listing:");
                println!("  Name: {}", first.property_name.as_deref().unwrap_or("N/A"));
                println!("  Address: {}", first.address.as_deref().unwrap_or("N/A"));
                match first.min_price {
                    Some(p) => println!("  Price: ${p}"),
                    None => println!("  Price: $N/A"),
                }
            }

            write_outputs(&rows, &request, &output)?;
        }
        Command::Multi {
            targets,
            max_pages,
            max_workers,
            poll,
            db,
        } => {
            let requests: Vec<ScrapeRequest> = targets
                .into_iter()
                .map(|(city, state)| ScrapeRequest::new(city, state).with_max_pages(max_pages))
                .collect();

            let mut job_ids = Vec::with_capacity(requests.len());
            for request in &requests {
                job_ids.push(job_id_of(&client.start_scrape(request)?)?);
            }
            println!("Started {} jobs", job_ids.len());

            let outcomes = poll_many(
                &client,
                &job_ids,
                max_workers,
                poll.interval(&client),
                poll.timeout(&client),
            );

            let db = db.as_deref().map(open_db).transpose()?;
            for ((request, job_id), outcome) in requests.iter().zip(&job_ids).zip(outcomes) {
                let outcome = outcome.and_then(results_of);
                match &outcome {
                    Ok(listings) => println!("{}: {} listings", request.city, listings.len()),
                    Err(e) => println!("{}: ❌ {e}", request.city),
                }

                if let Some(db) = &db {
                    let counted = outcome.as_ref().map(Vec::len);
                    let record = job_record(job_id, request, counted);
                    db.with_conn(|conn| record_job(conn, &record))?;
                    if let Ok(listings) = &outcome {
                        save_listings(db, &rows_from_results(listings))?;
                    }
                }
            }
        }
        Command::Analyze { snapshot } => {
            let html = load_snapshot_html(&snapshot)?;
            let report = SnapshotAnalyzer::new()?.analyze(&html);
            println!("{report}");
        }
    }

    Ok(())
}

fn main() {
    init_telemetry();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
