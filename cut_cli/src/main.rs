//! # Cut & Order CLI
//!
//! Counter-side command-line interface over `cut_core`: quick length and
//! price calculations, plus material and job management in a shop file.
//!
//! Every command accepts `--json` for machine-readable output.

mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use cut_core::file_io::{create_shop_file, load_shop, load_shop_with_lock_check, save_shop, FileLock};
use cut_core::{
    convert_measurement, format_measurement, get_stock_status, parse_length, price_job, CostBreakdown,
    CutError, JobRequest, JobStatus, Material, MaterialType, MeasurementUnit, PricingConfig, Shop,
};

/// Cut & Order Manager - pricing, stock and orders for a cutting counter.
#[derive(Parser, Debug)]
#[command(name = "cut_cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Shop file to operate on
    #[arg(long, global = true, env = "CUT_SHOP_FILE", default_value = "shop.cuts")]
    shop: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a length string (e.g. 5' 3", 2m 50cm)
    Parse {
        input: String,
        #[arg(short, long, default_value_t = MeasurementUnit::Imperial)]
        unit: MeasurementUnit,
    },
    /// Convert a length between unit systems
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        #[arg(long)]
        from: MeasurementUnit,
        #[arg(long)]
        to: MeasurementUnit,
    },
    /// Format a canonical length for display
    Format {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        #[arg(short, long, default_value_t = MeasurementUnit::Imperial)]
        unit: MeasurementUnit,
    },
    /// Price a cut without a shop file
    Price {
        /// Currency per foot (imperial) or meter (metric)
        #[arg(long)]
        unit_cost: f64,
        /// Length of each piece
        #[arg(long)]
        length: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(short, long, default_value_t = MeasurementUnit::Imperial)]
        unit: MeasurementUnit,
        #[command(flatten)]
        pricing: PricingArgs,
    },
    /// Check stock for a cut without a shop file
    Stock {
        #[arg(long)]
        current: f64,
        #[arg(long)]
        threshold: f64,
        #[arg(long)]
        length: f64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Create a new shop file
    Init {
        #[arg(long, default_value = "Cut & Order")]
        name: String,
        /// Unit assumed for entered lengths
        #[arg(short, long)]
        unit: Option<MeasurementUnit>,
    },
    /// Change shop settings
    Configure {
        #[command(flatten)]
        pricing: PricingArgs,
        #[arg(short, long)]
        unit: Option<MeasurementUnit>,
        /// Print order codes on new jobs
        #[arg(long)]
        order_codes: Option<bool>,
    },
    /// Manage materials
    #[command(subcommand)]
    Material(MaterialCommand),
    /// Manage cut jobs
    #[command(subcommand)]
    Job(JobCommand),
    /// List materials at or below their reorder threshold
    Reorder,
}

#[derive(Subcommand, Debug)]
enum MaterialCommand {
    /// Add a material
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value_t = MaterialType::Other)]
        material_type: MaterialType,
        #[arg(long)]
        unit_cost: f64,
        /// Stock on hand as a length (e.g. 240')
        #[arg(long, default_value = "0")]
        stock: String,
        /// Reorder threshold as a length
        #[arg(long, default_value = "0")]
        threshold: String,
        #[arg(long, default_value = "")]
        supplier: String,
        #[arg(short, long)]
        unit: Option<MeasurementUnit>,
    },
    /// List materials
    List,
    /// Add stock to a material
    Restock {
        /// Material name or id
        material: String,
        /// Length to add (in the material's unit unless --unit is given)
        amount: String,
        #[arg(short, long)]
        unit: Option<MeasurementUnit>,
    },
    /// Remove a material (existing jobs keep their copy)
    Remove { material: String },
}

#[derive(Subcommand, Debug)]
enum JobCommand {
    /// Price an order without saving it
    Quote(JobArgs),
    /// Create an order and take the stock
    Create(JobArgs),
    /// List orders
    List {
        #[arg(long)]
        status: Option<JobStatus>,
    },
    /// Show one order
    Show {
        /// Order code or id
        job: String,
    },
    /// Set an order's status
    Status {
        /// Order code or id
        job: String,
        status: JobStatus,
    },
}

#[derive(Args, Debug)]
struct JobArgs {
    #[arg(long)]
    customer: String,
    /// Material name or id
    #[arg(long)]
    material: String,
    /// Length of each piece (e.g. 5' 3")
    #[arg(long)]
    length: String,
    #[arg(long, default_value_t = 1)]
    quantity: u32,
    /// Unit the length is written in (shop default if omitted)
    #[arg(short, long)]
    unit: Option<MeasurementUnit>,
    #[arg(long)]
    notes: Option<String>,
}

impl JobArgs {
    fn to_request(&self) -> JobRequest {
        let mut request = JobRequest::new(&self.customer, &self.material, &self.length, self.quantity);
        request.unit = self.unit;
        request.notes = self.notes.clone();
        request
    }
}

/// Pricing overrides
#[derive(Args, Debug, Default)]
struct PricingArgs {
    /// Labor charge per piece cut
    #[arg(long)]
    labor_rate: Option<f64>,
    /// Waste allowance (percent of material cost)
    #[arg(long)]
    waste_percent: Option<f64>,
    /// Markup (percent of subtotal)
    #[arg(long)]
    markup_percent: Option<f64>,
}

impl PricingArgs {
    fn apply(&self, base: PricingConfig) -> Result<PricingConfig> {
        let config = PricingConfig {
            labor_rate_per_cut: self.labor_rate.unwrap_or(base.labor_rate_per_cut),
            waste_allowance_percent: self.waste_percent.unwrap_or(base.waste_allowance_percent),
            markup_percent: self.markup_percent.unwrap_or(base.markup_percent),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct ParsedLength<'a> {
    input: &'a str,
    unit: MeasurementUnit,
    value: f64,
    formatted: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    if let Err(err) = run(cli) {
        if json {
            if let Some(cut_err) = err.downcast_ref::<CutError>() {
                if let Ok(text) = serde_json::to_string_pretty(cut_err) {
                    eprintln!("{}", text);
                }
            }
        }
        return Err(err);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    let shop_path = cli.shop.as_path();

    match cli.command {
        Command::Parse { input, unit } => {
            let value = parse_length(&input, unit)
                .ok_or_else(|| CutError::invalid_input("length", input.clone(), format!("Not a {} length", unit)))?;
            let parsed = ParsedLength {
                input: &input,
                unit,
                value,
                formatted: format_measurement(value, unit),
            };
            if json {
                report::print_json(&parsed)?;
            } else {
                println!("{} {} ({})", parsed.value, unit.canonical_symbol(), parsed.formatted);
            }
        }

        Command::Convert { value, from, to } => {
            let converted = convert_measurement(value, from, to);
            if json {
                report::print_json(&serde_json::json!({ "value": converted, "unit": to }))?;
            } else {
                println!(
                    "{} {} = {} {} ({})",
                    value,
                    from.canonical_symbol(),
                    converted,
                    to.canonical_symbol(),
                    format_measurement(converted, to)
                );
            }
        }

        Command::Format { value, unit } => {
            let text = format_measurement(value, unit);
            if json {
                report::print_json(&text)?;
            } else {
                println!("{}", text);
            }
        }

        Command::Price { unit_cost, length, quantity, unit, pricing } => {
            let config = pricing.apply(PricingConfig::default())?;
            let piece = parse_length(&length, unit)
                .ok_or_else(|| CutError::invalid_input("length", length.clone(), format!("Not a {} length", unit)))?;
            let cost = price_job(unit_cost, piece, quantity, &config).unwrap_or_else(|err| {
                warn!(error = %err, "inputs could not be priced; showing zero breakdown");
                CostBreakdown::zero()
            });
            if json {
                report::print_json(&cost)?;
            } else {
                println!("{} x {}", quantity, format_measurement(piece, unit));
                println!("{}", cost);
            }
        }

        Command::Stock { current, threshold, length, quantity } => {
            let check = get_stock_status(current, threshold, length, quantity);
            if json {
                report::print_json(&check)?;
            } else {
                println!("[{}] {} (need {}, have {})", check.status, check.message, check.needed, check.current_stock);
            }
        }

        Command::Init { name, unit } => {
            let mut shop = Shop::new(name);
            if let Some(unit) = unit {
                shop.settings.default_unit = unit;
            }
            create_shop_file(&shop, shop_path)?;
            info!("Created shop file {}", shop_path.display());
        }

        Command::Configure { pricing, unit, order_codes } => {
            with_locked_shop(shop_path, |shop| {
                shop.settings.pricing = pricing.apply(shop.settings.pricing)?;
                if let Some(unit) = unit {
                    shop.settings.default_unit = unit;
                }
                if let Some(order_codes) = order_codes {
                    shop.settings.order_codes = order_codes;
                }
                shop.touch();
                if json {
                    report::print_json(&shop.settings)?;
                } else {
                    report::print_settings(&shop.settings);
                }
                Ok(())
            })?;
        }

        Command::Material(action) => material_command(action, shop_path, json)?,
        Command::Job(action) => job_command(action, shop_path, json)?,

        Command::Reorder => {
            let shop = open_shop(shop_path)?;
            let low = shop.materials_needing_reorder();
            if json {
                report::print_json(&low)?;
            } else {
                report::print_reorder(&low);
            }
        }
    }

    Ok(())
}

fn material_command(action: MaterialCommand, shop_path: &Path, json: bool) -> Result<()> {
    match action {
        MaterialCommand::Add { name, material_type, unit_cost, stock, threshold, supplier, unit } => {
            with_locked_shop(shop_path, |shop| {
                let unit = unit.unwrap_or(shop.settings.default_unit);
                let current_stock = parse_length(&stock, unit)
                    .ok_or_else(|| CutError::invalid_input("stock", stock.clone(), format!("Not a {} length", unit)))?;
                let reorder_threshold = parse_length(&threshold, unit).ok_or_else(|| {
                    CutError::invalid_input("threshold", threshold.clone(), format!("Not a {} length", unit))
                })?;
                let material = Material::new(name.trim(), material_type, unit)
                    .with_unit_cost(unit_cost)
                    .with_stock(current_stock, reorder_threshold)
                    .with_supplier(supplier.trim());
                let id = shop.add_material(material)?;
                if json {
                    report::print_json(&shop.materials[&id])?;
                } else {
                    println!("{}", id);
                }
                Ok(())
            })
        }

        MaterialCommand::List => {
            let shop = open_shop(shop_path)?;
            let mut materials: Vec<&Material> = shop.materials.values().collect();
            materials.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            if json {
                report::print_json(&materials)
            } else {
                report::print_materials(&materials);
                Ok(())
            }
        }

        MaterialCommand::Restock { material, amount, unit } => with_locked_shop(shop_path, |shop| {
            let target = shop.find_material(&material)?;
            let (id, own_unit) = (target.id, target.measurement_unit);
            let entered_unit = unit.unwrap_or(own_unit);
            let entered = parse_length(&amount, entered_unit).ok_or_else(|| {
                CutError::invalid_input("amount", amount.clone(), format!("Not a {} length", entered_unit))
            })?;
            let stock = shop.restock(&id, convert_measurement(entered, entered_unit, own_unit))?;
            if json {
                report::print_json(&shop.materials[&id])?;
            } else {
                println!("{}: {}", shop.materials[&id].name, format_measurement(stock, own_unit));
            }
            Ok(())
        }),

        MaterialCommand::Remove { material } => with_locked_shop(shop_path, |shop| {
            let id = shop.find_material(&material)?.id;
            if let Some(removed) = shop.remove_material(&id) {
                info!("Removed material {}", removed.name);
            }
            Ok(())
        }),
    }
}

fn job_command(action: JobCommand, shop_path: &Path, json: bool) -> Result<()> {
    match action {
        JobCommand::Quote(args) => {
            let shop = open_shop(shop_path)?;
            let quote = shop.quote(&args.to_request())?;
            if json {
                report::print_json(&quote)
            } else {
                let material = shop
                    .get_material(&quote.material_id)
                    .context("quoted material vanished from shop")?;
                report::print_quote(&quote, material);
                Ok(())
            }
        }

        JobCommand::Create(args) => with_locked_shop(shop_path, |shop| {
            let id = shop.create_job(&args.to_request())?;
            let job = &shop.jobs[&id];
            if json {
                report::print_json(job)?;
            } else {
                report::print_job(job);
            }
            Ok(())
        }),

        JobCommand::List { status } => {
            let shop = open_shop(shop_path)?;
            let jobs = match status {
                Some(status) => shop.jobs_by_status(status),
                None => shop.jobs_sorted(),
            };
            if json {
                report::print_json(&jobs)
            } else {
                report::print_jobs(&jobs);
                Ok(())
            }
        }

        JobCommand::Show { job } => {
            let shop = open_shop(shop_path)?;
            let job = shop.find_job(&job)?;
            if json {
                report::print_json(job)
            } else {
                report::print_job(job);
                Ok(())
            }
        }

        JobCommand::Status { job, status } => with_locked_shop(shop_path, |shop| {
            let id: Uuid = shop.find_job(&job)?.id;
            shop.set_job_status(&id, status)?;
            if json {
                report::print_json(&shop.jobs[&id])?;
            } else {
                println!("{} -> {}", shop.jobs[&id].label(), status);
            }
            Ok(())
        }),
    }
}

/// Load a shop for reading, warning if someone else is editing it.
fn open_shop(path: &Path) -> Result<Shop> {
    let (shop, lock) = load_shop_with_lock_check(path)
        .with_context(|| format!("Failed to open shop {}", path.display()))?;
    if let Some(lock) = lock {
        warn!(
            "{} is being edited by {} on {}; showing last saved state",
            path.display(),
            lock.user_id,
            lock.machine
        );
    }
    Ok(shop)
}

/// Lock, load, modify and save a shop.
///
/// Nothing is saved if `edit` fails.
fn with_locked_shop<F>(path: &Path, edit: F) -> Result<()>
where
    F: FnOnce(&mut Shop) -> Result<()>,
{
    let _lock = FileLock::acquire(path, lock_user())
        .with_context(|| format!("Failed to lock shop {}", path.display()))?;
    let mut shop = load_shop(path).with_context(|| format!("Failed to open shop {}", path.display()))?;
    edit(&mut shop)?;
    save_shop(&shop, path).with_context(|| format!("Failed to save shop {}", path.display()))?;
    Ok(())
}

fn lock_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "cut_cli".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_job_create() {
        let cli = Cli::try_parse_from([
            "cut_cli", "--shop", "main.cuts", "job", "create", "--customer", "Dana", "--material", "2x4",
            "--length", "5' 3\"", "--quantity", "3",
        ])
        .unwrap();
        assert_eq!(cli.shop, PathBuf::from("main.cuts"));
        match cli.command {
            Command::Job(JobCommand::Create(args)) => {
                let request = args.to_request();
                assert_eq!(request.length, "5' 3\"");
                assert_eq!(request.quantity, 3);
                assert_eq!(request.unit, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unit_and_status_values() {
        let cli = Cli::try_parse_from(["cut_cli", "parse", "2m 50cm", "--unit", "metric"]).unwrap();
        assert!(matches!(cli.command, Command::Parse { unit: MeasurementUnit::Metric, .. }));

        assert!(Cli::try_parse_from(["cut_cli", "job", "status", "AB12", "shipped"]).is_err());
        assert!(Cli::try_parse_from(["cut_cli", "job", "status", "AB12", "completed"]).is_ok());
    }

    #[test]
    fn test_pricing_overrides() {
        let args = PricingArgs {
            markup_percent: Some(10.0),
            ..PricingArgs::default()
        };
        let config = args.apply(PricingConfig::default()).unwrap();
        assert_eq!(config.markup_percent, 10.0);
        assert_eq!(config.labor_rate_per_cut, 0.25);

        let bad = PricingArgs {
            labor_rate: Some(-1.0),
            ..PricingArgs::default()
        };
        assert!(bad.apply(PricingConfig::default()).is_err());
    }
}
