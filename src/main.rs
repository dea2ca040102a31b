use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use cabfare_core::{App, Config, FareReport, LegInput, ResolvedLeg, TripInput};
use cabfare_pricing::Coordinate;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Parser;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Pickup address, or "lat,lon" with --manual
    #[arg(short, long)]
    pickup: String,

    /// Dropoff address, or "lat,lon" with --manual
    #[arg(short, long)]
    dropoff: String,

    /// Treat pickup and dropoff as coordinates instead of addresses
    #[arg(short, long)]
    manual: bool,

    /// Pickup date (YYYY-MM-DD), today if omitted
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Pickup time (HH:MM), now if omitted
    #[arg(long, value_parser = parse_time)]
    time: Option<NaiveTime>,

    /// Number of passengers (1-6)
    #[arg(short = 'n', long, default_value_t = 1)]
    passengers: u8,

    /// Config file, instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model artifact, overriding the config
    #[arg(long)]
    model: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| format!("expected HH:MM: {}", e))
}

fn leg_input(value: &str, manual: bool) -> Result<LegInput> {
    if manual {
        let coordinate: Coordinate = value
            .parse()
            .map_err(|e| anyhow::anyhow!("'{}' is not a lat,lon pair: {}", value, e))?;
        Ok(LegInput::Coordinates(coordinate))
    } else {
        Ok(LegInput::Address(value.to_string()))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = cabfare_core::init_with_default(if cli.verbose { "debug" } else { "warn" }) {
        eprintln!("{}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

/// Errors come back as display text for the user.
async fn run(cli: Cli) -> Result<(), String> {
    let (mut config, _) =
        Config::load_validated(cli.config.as_deref()).map_err(|e| format!("{:#}", e))?;
    if let Some(model) = cli.model {
        config.model.path = model;
    }

    let now = Local::now().naive_local();
    let input = TripInput {
        pickup: leg_input(&cli.pickup, cli.manual).map_err(|e| e.to_string())?,
        dropoff: leg_input(&cli.dropoff, cli.manual).map_err(|e| e.to_string())?,
        date: cli.date.unwrap_or(now.date()),
        time: cli.time.unwrap_or(now.time()),
        passenger_count: cli.passengers,
    };

    let app = App::new(config).map_err(|e| {
        tracing::error!("Startup failed: {}", e);
        e.user_message()
    })?;

    let report = app.estimate(&input).await.map_err(|e| {
        tracing::error!("Estimate failed: {}", e);
        e.user_message()
    })?;

    print_report(&report);
    Ok(())
}

fn print_leg(label: &str, leg: &ResolvedLeg) {
    println!("{}: {}", label, leg.formatted_address);
    println!("  at {}", leg.coordinate);
    if let Some(weather) = &leg.weather {
        println!("  {:.1}°F, {}", weather.temperature_f, weather.condition);
    }
}

fn print_report(report: &FareReport) {
    print_leg("Pickup", &report.pickup);
    print_leg("Dropoff", &report.dropoff);
    println!();
    println!(
        "Trip: {:.2} mi, {} passenger(s), {}",
        report.distance_miles,
        report.trip.passenger_count(),
        report.trip.pickup_at().format("%Y-%m-%d %H:%M")
    );
    println!(
        "Map: center {}, zoom {}, pitch {}",
        report.map.center, report.map.zoom, report.map.pitch
    );
    println!(
        "Surcharges: passengers x{:.2}, weather x{:.3}",
        report.quote.passenger_multiplier, report.quote.weather_multiplier
    );
    println!();
    println!("Estimated fare: ${:.2}", report.quote.fare);
}
