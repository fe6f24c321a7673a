//! Hospimap CLI
//!
//! Command-line interface for Hospimap operations:
//! - Query a running dashboard server (map values, trends, status)
//! - Check the data sources offline
//! - Generate a default config file

use clap::{Parser, Subcommand};
use hospimap::config::{generate_default_config, SourceConfig};
use hospimap::dataset::{Dataset, Metric};
use hospimap::query::{MapQuery, TrendQuery};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hospimap-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "French COVID-19 hospital data from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dashboard server URL
    #[arg(long, default_value = "http://localhost:8050", global = true)]
    pub api_url: String,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server and dataset status
    Status,

    /// Value of a metric for every department on one day
    Map {
        /// Metric (hospitalised, intensive-care, discharged, deaths)
        #[arg(short, long, default_value = "deaths")]
        metric: String,
        /// Day as YYYY-MM-DD or DD/MM/YYYY (default: last day)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Daily female/male values, nationwide or for one department
    Trend {
        #[arg(short, long, default_value = "deaths")]
        metric: String,
        /// Department code (default: whole country)
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Load and transform the sources locally, without a server
    Check {
        /// CSV source (URL or path)
        #[arg(long)]
        csv: Option<String>,
        /// GeoJSON boundary file
        #[arg(long)]
        geojson: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(&health)?);
                        return Ok(());
                    }

                    println!("Hospimap v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "Server Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );

                    let dataset = &health["dataset"];
                    println!();
                    println!("Dataset:");
                    println!("  Records:      {}", dataset["records"]);
                    println!("  Departments:  {}", dataset["departments"]);
                    println!(
                        "  Days:         {} ({} to {})",
                        dataset["days"],
                        dataset["first_day"].as_str().unwrap_or("-"),
                        dataset["last_day"].as_str().unwrap_or("-")
                    );
                    println!(
                        "  Dropped rows: {} incomplete, {} overseas",
                        dataset["dropped_incomplete"], dataset["dropped_overseas"]
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("Server returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Hospimap at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the dashboard server is running:");
                    eprintln!("  cargo run --bin hospimap");
                    std::process::exit(1);
                }
            }
        }

        Commands::Map { metric, date } => {
            let mut query = vec![("metric", metric), ("format", api_format(&cli.format))];
            if let Some(date) = date {
                query.push(("date", date));
            }

            let body = fetch(&client, &format!("{}/api/v1/map", cli.api_url), &query).await?;

            match cli.format.as_str() {
                "csv" => print!("{}", body),
                "json" => println!("{}", body),
                _ => {
                    let data: serde_json::Value = serde_json::from_str(&body)?;
                    print_map_table(&data);
                }
            }
        }

        Commands::Trend { metric, region } => {
            let mut query = vec![("metric", metric), ("format", api_format(&cli.format))];
            if let Some(region) = region {
                query.push(("region", region));
            }

            let body = fetch(&client, &format!("{}/api/v1/trend", cli.api_url), &query).await?;

            match cli.format.as_str() {
                "csv" => print!("{}", body),
                "json" => println!("{}", body),
                _ => {
                    let data: serde_json::Value = serde_json::from_str(&body)?;
                    print_trend_table(&data);
                }
            }
        }

        Commands::Check { csv, geojson } => {
            let mut source = SourceConfig::default();
            if let Some(csv) = csv {
                source.csv_url = csv;
            }
            if let Some(geojson) = geojson {
                source.geojson_path = geojson;
            }

            println!("Loading {} ...", source.csv_url);
            let dataset = match Dataset::load(&source).await {
                Ok(dataset) => dataset,
                Err(e) => {
                    eprintln!("Check failed: {}", e);
                    std::process::exit(1);
                }
            };

            let stats = dataset.stats();
            println!();
            println!("Rows read:            {}", stats.rows_read);
            println!("Dropped (incomplete): {}", stats.dropped_incomplete);
            println!("Dropped (overseas):   {}", stats.dropped_overseas);
            println!("Department rows:      {}", stats.rows_kept);
            println!("National rows:        {}", stats.national_rows);
            println!("Departments:          {}", dataset.departments().len());
            println!(
                "Days:                 {} ({} to {})",
                dataset.day_count(),
                dataset.first_day(),
                dataset.last_day()
            );

            let map = MapQuery::new(Metric::Deaths, dataset.last_day()).execute(&dataset)?;
            let total: u64 = map.points.iter().map(|p| p.value).sum();
            println!();
            println!(
                "Deaths on {}: {} across {} departments",
                map.date,
                total,
                map.points.len()
            );

            let trend = TrendQuery::national(Metric::Hospitalised).execute(&dataset)?;
            for series in &trend.series {
                if let Some(last) = series.points.last() {
                    println!(
                        "Hospitalised ({}) on {}: {}",
                        series.sex, last.day, last.value
                    );
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            if let Some(path) = output {
                std::fs::write(&path, &config)?;
                println!("Config written to {:?}", path);
            } else {
                print!("{}", config);
            }
        }
    }

    Ok(())
}

/// Server-side format for a CLI output format
fn api_format(format: &str) -> String {
    match format {
        "csv" => "csv".to_string(),
        _ => "json".to_string(),
    }
}

async fn fetch(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<String, Box<dyn std::error::Error>> {
    let response = client.get(url).query(query).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        eprintln!("Request failed ({}): {}", status, text);
        std::process::exit(1);
    }

    Ok(response.text().await?)
}

fn print_map_table(data: &serde_json::Value) {
    let rows = match data["rows"].as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("No data for this selection.");
            return;
        }
    };

    println!(
        "{} on {}",
        data["metric"].as_str().unwrap_or("-"),
        data["date"].as_str().unwrap_or("-")
    );
    println!();
    println!("{:<6} {:<30} {:>10}", "Code", "Department", "Value");
    println!("{}", "-".repeat(48));

    for row in rows {
        println!(
            "{:<6} {:<30} {:>10}",
            row["code"].as_str().unwrap_or("-"),
            row["name"].as_str().unwrap_or("-"),
            row["value"].as_u64().unwrap_or(0)
        );
    }
}

fn print_trend_table(data: &serde_json::Value) {
    let rows = match data["rows"].as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("No data for this selection.");
            return;
        }
    };

    let scope = data["region"]["name"].as_str().unwrap_or("France");
    println!("{} - {}", scope, data["metric"].as_str().unwrap_or("-"));
    println!();
    println!("{:<12} {:<8} {:>10}", "Day", "Sex", "Value");
    println!("{}", "-".repeat(32));

    for row in rows {
        println!(
            "{:<12} {:<8} {:>10}",
            row["day"].as_str().unwrap_or("-"),
            row["sex"].as_str().unwrap_or("-"),
            row["value"].as_u64().unwrap_or(0)
        );
    }
}

fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
