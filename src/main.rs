use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use propfolio::app;
use propfolio::clock::SystemClock;
use propfolio::config::{default_config_path, ResolvedConfig};
use propfolio::format::parse_date;
use propfolio::models::{AustralianState, PropertyType, RentFrequency, SubscriptionTier};
use propfolio::portfolio::{Granularity, SortDirection, SortField};
use propfolio::storage::{JsonFileStorage, Storage};

#[derive(Parser)]
#[command(name = "propfolio")]
#[command(about = "Track the value, equity and cashflow of an investment property portfolio")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show current configuration
    Config,

    /// Manage the user profile
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Add and list properties
    Property {
        #[command(subcommand)]
        command: PropertyCommand,
    },

    /// Record valuations
    Valuation {
        #[command(subcommand)]
        command: ValuationCommand,
    },

    /// Record and inspect rent and expenses
    Cashflow {
        #[command(subcommand)]
        command: CashflowCommand,
    },

    /// Portfolio totals as of today
    Summary,

    /// Portfolio value over time (Pro)
    History {
        /// Bucket size: full, weekly, monthly, quarterly, yearly
        #[arg(long, default_value = "full")]
        granularity: Granularity,

        /// First date to include (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,

        /// Last date to include (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,
    },

    /// Export CSV files (Pro)
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    /// Create or update the profile's subscription tier
    SetTier {
        /// free or pro
        tier: SubscriptionTier,
    },
}

#[derive(Subcommand)]
enum PropertyCommand {
    /// Register a property
    Add {
        #[arg(long)]
        street: String,

        #[arg(long)]
        suburb: String,

        /// State or territory code, e.g. NSW
        #[arg(long)]
        state: AustralianState,

        #[arg(long)]
        postcode: String,

        /// house, apartment or townhouse
        #[arg(long = "type")]
        property_type: PropertyType,

        /// Purchase price
        #[arg(long)]
        price: Decimal,

        /// Purchase date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,

        #[arg(long)]
        bedrooms: Option<u32>,

        /// Amount borrowed
        #[arg(long)]
        loan: Option<Decimal>,

        /// Outstanding balance, if different from the amount borrowed
        #[arg(long)]
        current_loan: Option<Decimal>,

        /// Interest rate as a percentage
        #[arg(long)]
        rate: Option<Decimal>,

        #[arg(long)]
        lender: Option<String>,
    },

    /// Show one property's metrics and valuation history
    Show { property_id: String },

    /// List properties with their current metrics
    List {
        /// address, value, growth, growth-percent, lvr, equity
        #[arg(long, default_value = "address")]
        sort: SortField,

        /// asc or desc
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
    },
}

#[derive(Subcommand)]
enum ValuationCommand {
    /// Record a valuation
    Add {
        property_id: String,

        value: Decimal,

        /// Date of the valuation (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,

        /// Where the figure came from, e.g. "Bank valuation"
        #[arg(long)]
        source: Option<String>,
    },
}

#[derive(Subcommand)]
enum CashflowCommand {
    /// Record a cashflow configuration
    Add {
        property_id: String,

        /// Defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        effective_from: Option<NaiveDate>,

        #[arg(long, requires = "frequency")]
        rent: Option<Decimal>,

        /// weekly or monthly
        #[arg(long)]
        frequency: Option<RentFrequency>,

        /// Monthly mortgage repayment
        #[arg(long)]
        mortgage: Option<Decimal>,

        /// Annual insurance premium
        #[arg(long)]
        insurance: Option<Decimal>,

        /// Quarterly council rates and strata
        #[arg(long)]
        rates: Option<Decimal>,

        /// Other monthly expenses
        #[arg(long)]
        other: Option<Decimal>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the active configuration and its history
    Show { property_id: String },
}

#[derive(Subcommand)]
enum ExportCommand {
    /// Comparison table for every property
    Portfolio {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cashflow configurations for one property
    Cashflow {
        property_id: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    let cli = Cli::parse();

    let config = ResolvedConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    let storage = JsonFileStorage::new(&config.data_dir);
    let storage: &dyn Storage = &storage;
    let clock = SystemClock;

    match cli.command {
        Command::Config => print_json(&app::config_output(&cli.config, &config))?,

        Command::User {
            command: UserCommand::SetTier { tier },
        } => print_json(&app::set_subscription_tier(storage, &config, tier).await?)?,

        Command::Property { command } => match command {
            PropertyCommand::Add {
                street,
                suburb,
                state,
                postcode,
                property_type,
                price,
                date,
                bedrooms,
                loan,
                current_loan,
                rate,
                lender,
            } => {
                let new = app::NewProperty {
                    street,
                    suburb,
                    state,
                    postcode,
                    property_type,
                    bedrooms,
                    purchase_price: price,
                    purchase_date: date,
                    initial_loan_amount: loan,
                    current_loan_amount: current_loan,
                    interest_rate: rate,
                    lender_name: lender,
                };
                print_json(&app::add_property(storage, &config, new).await?)?;
            }
            PropertyCommand::Show { property_id } => print_json(
                &app::property_show(storage, &config, &clock, &property_id).await?,
            )?,
            PropertyCommand::List { sort, direction } => print_json(
                &app::list_properties(storage, &config, &clock, sort, direction).await?,
            )?,
        },

        Command::Valuation {
            command:
                ValuationCommand::Add {
                    property_id,
                    value,
                    date,
                    source,
                },
        } => print_json(
            &app::add_valuation(storage, &config, &property_id, value, date, source).await?,
        )?,

        Command::Cashflow { command } => match command {
            CashflowCommand::Add {
                property_id,
                effective_from,
                rent,
                frequency,
                mortgage,
                insurance,
                rates,
                other,
                notes,
            } => {
                let new = app::NewCashflow {
                    effective_from,
                    rent_income: rent,
                    rent_frequency: frequency,
                    mortgage_payment: mortgage,
                    insurance_annual: insurance,
                    rates_strata_quarterly: rates,
                    other_expenses: other,
                    notes,
                };
                print_json(&app::add_cashflow(storage, &config, &property_id, new).await?)?;
            }
            CashflowCommand::Show { property_id } => {
                print_json(&app::cashflow_show(storage, &config, &property_id).await?)?
            }
        },

        Command::Summary => print_json(&app::portfolio_summary(storage, &config, &clock).await?)?,

        Command::History {
            granularity,
            start,
            end,
        } => {
            let request = app::HistoryRequest {
                granularity,
                start,
                end,
            };
            print_json(&app::portfolio_history(storage, &config, request).await?)?;
        }

        Command::Export { command } => match command {
            ExportCommand::Portfolio { output } => {
                print_json(&app::export_portfolio(storage, &config, &clock, output).await?)?
            }
            ExportCommand::Cashflow {
                property_id,
                output,
            } => print_json(
                &app::export_cashflow(storage, &config, &clock, &property_id, output).await?,
            )?,
        },
    }

    Ok(())
}
