use outbreak_tracker::models::regions;
use outbreak_tracker::models::timeseries::{clamp_days, DEFAULT_DAYS};
use outbreak_tracker::utils::display::DisplayFormatter;
use outbreak_tracker::{Config, TrackerService};
use std::error::Error;
use std::io::{self, Write};
use tracing::{debug, info};

const NATIONAL: &str = "United States";
const DEFAULT_TOP: usize = 10;

/// Split `trend` arguments into an optional state name and a day window.
fn parse_trend_args(args: &[&str]) -> (Option<String>, u32) {
    let (name_parts, days) = match args.split_last() {
        Some((last, rest)) => match last.parse::<u32>() {
            Ok(days) => (rest, days),
            Err(_) => (args, DEFAULT_DAYS),
        },
        None => (args, DEFAULT_DAYS),
    };

    let name = name_parts.join(" ");
    let region = match name.as_str() {
        "" | "US" | "USA" | NATIONAL => None,
        other => Some(
            regions::name_for_code(other)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        ),
    };
    (region, clamp_days(days))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Outbreak Tracker");

    let config = Config::from_env()?;
    let service = TrackerService::new(&config)?;
    let display = DisplayFormatter::new();

    println!("=== Outbreak Tracker ===");
    println!("Commands:");
    println!("  summary               - Today's totals across states");
    println!("  top [n]               - States with the most new cases (default 10)");
    println!("  trend [state] [days]  - Daily new cases, national or one state (60-365 days)");
    println!("  states                - Show tracked states");
    println!("  exit                  - Exit the program");

    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        io::stdout().flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let words: Vec<&str> = input.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["exit"] => {
                debug!("Received exit command");
                break;
            }
            ["states"] => {
                println!("{}", display.format_regions(&regions::supported_regions()));
            }
            ["summary"] => match service.fetch_snapshot().await {
                Ok(snapshot) => println!("{}", display.format_metrics(&snapshot)),
                Err(e) => {
                    let message = e.to_string();
                    println!("{}", display.format_error("Could not load state snapshot", &message));
                }
            },
            ["top", rest @ ..] => {
                let n = rest
                    .first()
                    .and_then(|n| n.parse::<usize>().ok())
                    .unwrap_or(DEFAULT_TOP);
                match service.fetch_snapshot().await {
                    Ok(snapshot) => println!("{}", display.format_top_states(&snapshot, n)),
                    Err(e) => {
                        let message = e.to_string();
                        let context = "Could not load state snapshot";
                        println!("{}", display.format_error(context, &message));
                    }
                }
            }
            ["trend", rest @ ..] => {
                let (region, days) = parse_trend_args(rest);
                debug!("Fetching {} day trend for {:?}", days, region);
                let title = region.as_deref().unwrap_or(NATIONAL);
                match service.fetch_timeseries(region.as_deref(), days).await {
                    Ok(points) => println!("{}", display.format_trend(title, days, &points)),
                    Err(e) => {
                        let message = e.to_string();
                        println!("{}", display.format_error("Could not load timeseries", &message));
                    }
                }
            }
            _ => println!("Unknown command: {}", input.trim()),
        }
    }

    info!("Shutting down");
    Ok(())
}
