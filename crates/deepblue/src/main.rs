//! `bluemate` - CLI for deepblue
//!
//! This binary provides the command-line interface for the shipboard record
//! store, the maritime calculators, and the hull rust scan.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::Parser;

use deepblue::analysis::{downscale, rust_coverage_with_sensitivity, Raster};
use deepblue::assistant::AssistantClient;
use deepblue::calc;
use deepblue::cli::{
    AnalyzeCommand, CalcCommand, CertCommand, ChatCommand, Cli, Command, ConfigCommand,
    InventoryCommand, RestCommand,
};
use deepblue::records::RestLog;
use deepblue::{init_logging, Config, Store};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Inventory(cmd) => handle_inventory(&config, &cmd),
        Command::Certs(cmd) => handle_certs(&config, &cmd),
        Command::Rest(cmd) => handle_rest(&config, &cmd),
        Command::Calc(cmd) => handle_calc(&cmd),
        Command::Analyze(cmd) => handle_analyze(&config, &cmd),
        Command::Chat(cmd) => handle_chat(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> Result<Store, Box<dyn std::error::Error>> {
    Ok(Store::open(config.database_path())?)
}

fn handle_inventory(
    config: &Config,
    cmd: &InventoryCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;

    match cmd {
        InventoryCommand::List { json } => {
            let items = store.inventory()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                println!("{:<12} {:<40} {:>9}  {}", "ID", "NAME", "STOCK", "CATEGORY");
                for item in &items {
                    let marker = if item.is_low() { "  LOW" } else { "" };
                    println!(
                        "{:<12} {:<40} {:>4}/{:<4} {}{marker}",
                        item.id, item.name, item.stock, item.max_stock, item.category
                    );
                }
            }
        }
        InventoryCommand::Add {
            name,
            stock,
            max_stock,
        } => {
            let item = store.add_inventory_item(name.clone(), *stock, *max_stock)?;
            println!(
                "Added {} ({}) at {}/{}",
                item.name, item.id, item.stock, item.max_stock
            );
        }
        InventoryCommand::Take { id, count } => {
            match store.adjust_stock(id, -i64::from(*count))? {
                Some(item) => println!("{}: {}/{}", item.name, item.stock, item.max_stock),
                None => println!("No inventory item with id {id}"),
            }
        }
        InventoryCommand::Put { id, count } => {
            match store.adjust_stock(id, i64::from(*count))? {
                Some(item) => println!("{}: {}/{}", item.name, item.stock, item.max_stock),
                None => println!("No inventory item with id {id}"),
            }
        }
    }
    Ok(())
}

fn handle_certs(config: &Config, cmd: &CertCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;

    match cmd {
        CertCommand::List { json } => {
            let certs = store.certificates()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&certs)?);
            } else {
                let now = Utc::now();
                println!("{:<12} {:<52} {:<12} STATUS", "ID", "NAME", "EXPIRES");
                for cert in &certs {
                    println!(
                        "{:<12} {:<52} {:<12} {}",
                        cert.id,
                        cert.name,
                        cert.expiry_date.format("%Y-%m-%d"),
                        cert.status_at(now)
                    );
                }
            }
        }
        CertCommand::Add { name, expires } => {
            let date = NaiveDate::parse_from_str(expires, "%Y-%m-%d")?;
            let expiry = date.and_time(NaiveTime::MIN).and_utc();
            let cert = store.add_certificate(name.clone(), expiry)?;
            println!("Added {} ({}), {}", cert.name, cert.id, cert.status());
        }
    }
    Ok(())
}

fn handle_rest(config: &Config, cmd: &RestCommand) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;

    match cmd {
        RestCommand::Show { json } => {
            let log = store.rest_log()?;
            print_rest_log(config, &log, *json)?;
        }
        RestCommand::Toggle { hour } => {
            let log = store.toggle_rest_slot(*hour)?;
            print_rest_log(config, &log, false)?;
        }
    }
    Ok(())
}

fn print_rest_log(
    config: &Config,
    log: &RestLog,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let check = calc::rest_compliance_with_minimum(log, config.compliance.min_rest_hours);

    if json {
        let payload = serde_json::json!({
            "slots": log.slots(),
            "restHours": check.rest_hours,
            "violation": check.violation,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let strip: String = log
        .slots()
        .iter()
        .map(|on_duty| if *on_duty { '#' } else { '.' })
        .collect();
    println!("Hours 0-23 (# duty, . rest): {strip}");
    println!(
        "Rest: {}h  {}",
        check.rest_hours,
        if check.violation {
            "VIOLATION: below minimum rest"
        } else {
            "compliant"
        }
    );
    Ok(())
}

fn handle_calc(cmd: &CalcCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        CalcCommand::Trim { fore, aft } => {
            let reading = calc::trim(*fore, *aft)?;
            println!(
                "Trim: {:+.2} m  {}",
                reading.meters,
                if reading.is_warning() {
                    "WARNING: excessive trim"
                } else {
                    "ok"
                }
            );
        }
        CalcCommand::Slip { rpm, pitch, speed } => {
            let reading = calc::propeller_slip(*rpm, *pitch, *speed)?;
            println!(
                "Slip: {:.2}%  {}",
                reading.percent,
                if reading.is_warning() {
                    "WARNING: high slip"
                } else {
                    "ok"
                }
            );
        }
        CalcCommand::Dew { temp, humidity } => {
            let reading = calc::dew_point(*temp, *humidity)?;
            println!(
                "Dew point: {:.1} °C  {}",
                reading.dew_point_c,
                if reading.ventilation_advised() {
                    "ventilation advised"
                } else {
                    "no ventilation needed"
                }
            );
        }
        CalcCommand::Timezone { longitude } => {
            let zone = calc::utc_offset(*longitude)?;
            println!("Estimated zone: UTC{zone:+}");
        }
    }
    Ok(())
}

fn handle_analyze(
    config: &Config,
    cmd: &AnalyzeCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&cmd.file)?;
    let raster = Raster::new(cmd.width, cmd.height, bytes)?;
    let scaled = downscale(&raster, config.analysis.max_dimension);
    let estimate = rust_coverage_with_sensitivity(&scaled, config.analysis.sensitivity);

    if cmd.json {
        let payload = serde_json::json!({
            "percent": estimate.percent,
            "rustPixels": estimate.rust_pixels,
            "totalPixels": estimate.total_pixels,
            "scannedWidth": scaled.width(),
            "scannedHeight": scaled.height(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "RUST: {}%  ({} of {} px at {}x{})",
            estimate.percent,
            estimate.rust_pixels,
            estimate.total_pixels,
            scaled.width(),
            scaled.height()
        );
        println!("Heuristic estimate only; not an inspection-grade measurement.");
    }
    Ok(())
}

fn handle_chat(config: &Config, cmd: &ChatCommand) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let settings = store.assistant_settings()?;

    let mut client = AssistantClient::with_timeout(settings, config.assistant_timeout());
    if let Some(key) = &config.assistant.api_key {
        client = client.with_api_key(key.clone());
    }

    println!("{}", client.chat(&cmd.message, &[]));
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let stats = store.stats()?;

    if json {
        let payload = serde_json::json!({
            "database_path": store.path(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("bluemate status");
        println!("---------------");
        println!("Database:         {}", store.path().display());
        println!("Inventory items:  {} ({} low)", stats.inventory_items, stats.low_stock_items);
        println!(
            "Certificates:     {} ({} expired)",
            stats.certificates, stats.expired_certificates
        );
        println!("Rest hours:       {}h", stats.rest_hours);
        println!("Database size:    {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:    {}", config.database_path().display());
                println!();
                println!("[Assistant]");
                println!("  Timeout (s):      {}", config.assistant.timeout_secs);
                println!(
                    "  API key:          {}",
                    if config.assistant.api_key.is_some() {
                        "set"
                    } else {
                        "not set"
                    }
                );
                println!();
                println!("[Compliance]");
                println!("  Min rest hours:   {}", config.compliance.min_rest_hours);
                println!();
                println!("[Analysis]");
                println!("  Sensitivity:      {}", config.analysis.sensitivity);
                println!("  Max dimension:    {}", config.analysis.max_dimension);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
