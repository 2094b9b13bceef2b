//! Stable embedded command surface for the `sb` sales dashboards.
//!
//! Hosts embed dashboard behavior through:
//! - [`run_cli`] for full parsed CLI execution.
//! - [`run_leads`] for a `LeadsCommand` against an already loaded lead store.
//! - [`run_deals`] for a `DealsCommand` against an already loaded deal store.
//!
//! JSON output is versioned through the `contract_version` field of every
//! payload; dashboard payload schemas live under `contracts/v1/schemas/`.

pub mod render;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use salesboard_core::{
    filter_records, parse_criterion, DashboardRecord, DashboardSession, Deal, DealMetrics,
    DealStage, Lead, LeadMetrics, PropertyType, Selection, SessionAction,
};
use salesboard_store::{FixtureSource, RecordStore};
use serde::{Deserialize, Serialize};

use crate::render::{DealRow, LeadRow, Tile};

#[derive(Debug, Parser)]
#[command(name = "sb")]
#[command(about = "Salesboard CLI: lead and deal dashboards over JSON fixtures")]
pub struct Cli {
    /// Load records from this JSON fixture instead of the bundled one.
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Write log lines to stderr as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    #[must_use]
    pub fn log_json(&self) -> bool {
        self.log_json
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Commercial real estate lead dashboard.
    Leads {
        #[command(subcommand)]
        command: LeadsCommand,
    },
    /// Sales pipeline dashboard.
    Deals {
        #[command(subcommand)]
        command: DealsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LeadsCommand {
    Metrics(JsonArgs),
    List(LeadListArgs),
    Show(LeadShowArgs),
    Dashboard(DashboardArgs),
}

#[derive(Debug, Subcommand)]
pub enum DealsCommand {
    Metrics(JsonArgs),
    List(DealListArgs),
    Show(DealShowArgs),
    Dashboard(DashboardArgs),
}

#[derive(Debug, Args)]
pub struct JsonArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct LeadListArgs {
    /// `buy`, `sell` or `all`.
    #[arg(long = "type", value_name = "TYPE", default_value = "all")]
    property_type: String,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct DealListArgs {
    /// Pipeline stage label (`proposal`, `closed-won`, ...) or `all`.
    #[arg(long, default_value = "all")]
    stage: String,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct LeadShowArgs {
    id: String,
    /// Contact whose notes are listed.
    #[arg(long)]
    expand: Option<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct DealShowArgs {
    id: String,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Session action applied in order: `filter:<value>`, `select:<id>`,
    /// `close` or `expand:<contact-id>`.
    #[arg(long = "action", value_name = "ACTION")]
    actions: Vec<String>,
    #[arg(long)]
    json: bool,
}

/// Installs the stderr `tracing` subscriber. `RUST_LOG` overrides the default
/// `warn` filter.
///
/// # Errors
/// Returns an error when a global subscriber is already installed.
pub fn init_tracing(json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Executes the parsed top-level CLI command graph.
///
/// # Errors
/// Returns an error when the fixture cannot be loaded or the command fails.
pub fn run_cli(cli: Cli) -> Result<()> {
    let source = FixtureSource::from_optional_path(cli.fixture.as_deref());
    tracing::debug!(%source, command = ?cli.command, "running command");
    match cli.command {
        Command::Leads { command } => {
            let store = RecordStore::<Lead>::load(&source)?;
            run_leads(command, &store)
        }
        Command::Deals { command } => {
            let store = RecordStore::<Deal>::load(&source)?;
            run_deals(command, &store)
        }
    }
}

/// Executes a parsed lead command against a loaded store.
///
/// # Errors
/// Returns an error for unknown filter values, unknown record or contact ids,
/// malformed session actions, or JSON encoding failures.
pub fn run_leads(command: LeadsCommand, store: &RecordStore<Lead>) -> Result<()> {
    let leads = store.records();
    match command {
        LeadsCommand::Metrics(args) => {
            let metrics = LeadMetrics::compute(leads);
            if args.json {
                print_json(&build_lead_metrics_payload(metrics))
            } else {
                print!("{}", render::tiles(&render::lead_tiles(&metrics))?);
                Ok(())
            }
        }
        LeadsCommand::List(args) => {
            let criterion = parse_criterion::<PropertyType>(&args.property_type)
                .context("invalid --type value")?;
            let visible = filter_records(leads, criterion);
            let rows = render::lead_rows(&visible, &Selection::default());
            if args.json {
                print_json(&build_lead_list_payload(criterion, rows))
            } else {
                println!("{}", render::filter_bar("All Leads", criterion));
                print!("{}", render::lead_table(&rows)?);
                Ok(())
            }
        }
        LeadsCommand::Show(args) => {
            let mut session = DashboardSession::new(leads);
            session.select(&args.id)?;
            if let Some(contact_id) = args.expand.as_deref() {
                session.toggle_contact(contact_id)?;
            }
            let Some(lead) = session.detail() else {
                return Err(anyhow!("lead `{}` has no detail view", args.id));
            };

            let expanded = session.selection().expanded_contact_id();
            if args.json {
                print_json(&build_lead_detail_payload(lead, expanded))
            } else {
                print!("{}", render::lead_detail(lead, expanded)?);
                Ok(())
            }
        }
        LeadsCommand::Dashboard(args) => {
            let session = replay_actions(DashboardSession::new(leads), &args.actions)?;
            if args.json {
                print_json(&build_lead_dashboard_payload(&session))
            } else {
                print!("{}", render::lead_dashboard(&session)?);
                Ok(())
            }
        }
    }
}

/// Executes a parsed deal command against a loaded store.
///
/// # Errors
/// Returns an error for unknown stage labels, unknown record ids, malformed
/// session actions, or JSON encoding failures.
pub fn run_deals(command: DealsCommand, store: &RecordStore<Deal>) -> Result<()> {
    let deals = store.records();
    match command {
        DealsCommand::Metrics(args) => {
            let metrics = DealMetrics::compute(deals);
            if args.json {
                print_json(&build_deal_metrics_payload(metrics))
            } else {
                print!("{}", render::tiles(&render::deal_tiles(&metrics))?);
                println!();
                print!("{}", render::deal_stages(&metrics)?);
                Ok(())
            }
        }
        DealsCommand::List(args) => {
            let criterion =
                parse_criterion::<DealStage>(&args.stage).context("invalid --stage value")?;
            let visible = filter_records(deals, criterion);
            let rows = render::deal_rows(&visible, &Selection::default());
            if args.json {
                print_json(&build_deal_list_payload(criterion, rows))
            } else {
                println!("{}", render::filter_bar("All Deals", criterion));
                print!("{}", render::deal_table(&rows)?);
                Ok(())
            }
        }
        DealsCommand::Show(args) => {
            let Some(deal) = deals.iter().find(|deal| deal.id == args.id) else {
                return Err(anyhow!("deal `{}` not found", args.id));
            };
            if args.json {
                print_json(&build_deal_detail_payload(deal))
            } else {
                print!("{}", render::deal_detail(deal)?);
                Ok(())
            }
        }
        DealsCommand::Dashboard(args) => {
            let session = replay_actions(DashboardSession::new(deals), &args.actions)?;
            if args.json {
                print_json(&build_deal_dashboard_payload(&session))
            } else {
                print!("{}", render::deal_dashboard(&session)?);
                Ok(())
            }
        }
    }
}

fn replay_actions<'a, R: DashboardRecord>(
    mut session: DashboardSession<'a, R>,
    actions: &[String],
) -> Result<DashboardSession<'a, R>> {
    for raw in actions {
        let action = SessionAction::<R::Category>::parse(raw)
            .with_context(|| format!("failed to parse --action `{raw}`"))?;
        session
            .apply(action)
            .with_context(|| format!("failed to apply --action `{raw}`"))?;
    }
    Ok(session)
}

fn print_json<T: Serialize>(payload: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadMetricsPayload {
    contract_version: String,
    metrics: LeadMetrics,
    tiles: Vec<Tile>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadListPayload {
    contract_version: String,
    filter: Option<PropertyType>,
    count: usize,
    leads: Vec<LeadRow>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadDetailPayload {
    contract_version: String,
    lead: Lead,
    price: String,
    size: String,
    expanded_contact_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadDashboardPayload {
    contract_version: String,
    tiles: Vec<Tile>,
    metrics: LeadMetrics,
    filter: Option<PropertyType>,
    visible_count: usize,
    rows: Vec<LeadRow>,
    empty_state: Option<String>,
    selection: Selection,
    detail: Option<Lead>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DealMetricsPayload {
    contract_version: String,
    metrics: DealMetrics,
    tiles: Vec<Tile>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DealListPayload {
    contract_version: String,
    filter: Option<DealStage>,
    count: usize,
    deals: Vec<DealRow>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DealDetailPayload {
    contract_version: String,
    deal: Deal,
    value: String,
    weighted_value: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DealDashboardPayload {
    contract_version: String,
    tiles: Vec<Tile>,
    metrics: DealMetrics,
    filter: Option<DealStage>,
    visible_count: usize,
    rows: Vec<DealRow>,
    empty_state: Option<String>,
    selection: Selection,
    detail: Option<Deal>,
}

fn build_lead_metrics_payload(metrics: LeadMetrics) -> LeadMetricsPayload {
    LeadMetricsPayload {
        contract_version: "lead_metrics.v1".to_string(),
        tiles: render::lead_tiles(&metrics),
        metrics,
    }
}

fn build_lead_list_payload(
    criterion: Option<PropertyType>,
    rows: Vec<LeadRow>,
) -> LeadListPayload {
    LeadListPayload {
        contract_version: "lead_list.v1".to_string(),
        filter: criterion,
        count: rows.len(),
        leads: rows,
    }
}

fn build_lead_detail_payload(
    lead: &Lead,
    expanded_contact_id: Option<&str>,
) -> LeadDetailPayload {
    LeadDetailPayload {
        contract_version: "lead_detail.v1".to_string(),
        price: salesboard_core::format::full_currency(lead.property.price),
        size: salesboard_core::format::square_feet(lead.property.square_feet),
        lead: lead.clone(),
        expanded_contact_id: expanded_contact_id.map(str::to_string),
    }
}

fn build_lead_dashboard_payload(session: &DashboardSession<'_, Lead>) -> LeadDashboardPayload {
    let metrics = LeadMetrics::compute(session.records());
    let rows = render::lead_rows(&session.visible(), session.selection());
    LeadDashboardPayload {
        contract_version: "lead_dashboard.v1".to_string(),
        tiles: render::lead_tiles(&metrics),
        metrics,
        filter: session.filter(),
        visible_count: rows.len(),
        empty_state: rows.is_empty().then(|| render::LEADS_EMPTY.to_string()),
        rows,
        selection: session.selection().clone(),
        detail: session.detail().cloned(),
    }
}

fn build_deal_metrics_payload(metrics: DealMetrics) -> DealMetricsPayload {
    DealMetricsPayload {
        contract_version: "deal_metrics.v1".to_string(),
        tiles: render::deal_tiles(&metrics),
        metrics,
    }
}

fn build_deal_list_payload(criterion: Option<DealStage>, rows: Vec<DealRow>) -> DealListPayload {
    DealListPayload {
        contract_version: "deal_list.v1".to_string(),
        filter: criterion,
        count: rows.len(),
        deals: rows,
    }
}

fn build_deal_detail_payload(deal: &Deal) -> DealDetailPayload {
    DealDetailPayload {
        contract_version: "deal_detail.v1".to_string(),
        value: salesboard_core::format::full_currency(deal.value),
        weighted_value: salesboard_core::format::full_currency(deal.weighted_value()),
        deal: deal.clone(),
    }
}

fn build_deal_dashboard_payload(session: &DashboardSession<'_, Deal>) -> DealDashboardPayload {
    let metrics = DealMetrics::compute(session.records());
    let rows = render::deal_rows(&session.visible(), session.selection());
    DealDashboardPayload {
        contract_version: "deal_dashboard.v1".to_string(),
        tiles: render::deal_tiles(&metrics),
        metrics,
        filter: session.filter(),
        visible_count: rows.len(),
        empty_state: rows.is_empty().then(|| render::DEALS_EMPTY.to_string()),
        rows,
        selection: session.selection().clone(),
        detail: session.detail().cloned(),
    }
}
