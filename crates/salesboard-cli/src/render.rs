//! Terminal rendering for the lead and deal dashboards.
//!
//! The view models here ([`Tile`], [`LeadRow`], [`DealRow`]) are shared by the
//! text renderer and the JSON payloads, so both surfaces show the same
//! formatted figures. Text builders propagate `fmt::Error` from their writes.

#![allow(clippy::missing_errors_doc)]

use std::fmt::{self, Write as _};

use salesboard_core::format::{
    compact_currency, count, full_currency, percent, plural, square_feet,
};
use salesboard_core::{
    Category, DashboardSession, Deal, DealMetrics, DealStage, Lead, LeadMetrics, Priority,
    PropertyType, Selection,
};
use serde::{Deserialize, Serialize};

pub const LEADS_TITLE: &str = "DuPage County Commercial Real Estate Leads";
pub const LEADS_SUBTITLE: &str = "Track properties and manage client relationships";
pub const LEADS_EMPTY: &str = "No leads in this category";
pub const LEADS_PLACEHOLDER: &str = "Select a lead to view details";

pub const DEALS_TITLE: &str = "Sales Pipeline";
pub const DEALS_SUBTITLE: &str = "Track deals from first contact to close";
pub const DEALS_EMPTY: &str = "No deals in this stage";
pub const DEALS_PLACEHOLDER: &str = "Select a deal to view details";

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Tile {
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
}

impl Tile {
    fn new(title: &str, value: String, subtitle: Option<String>) -> Self {
        Self {
            title: title.to_string(),
            value,
            subtitle,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct LeadRow {
    pub id: String,
    pub headline: String,
    pub address: String,
    pub property_type: PropertyType,
    pub priority: Priority,
    pub price: String,
    pub size: String,
    pub contacts: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct DealRow {
    pub id: String,
    pub name: String,
    pub company: String,
    pub stage: DealStage,
    pub value: String,
    pub probability: String,
    pub weighted_value: String,
    pub expected_close: String,
    pub selected: bool,
}

#[must_use]
pub fn lead_tiles(metrics: &LeadMetrics) -> Vec<Tile> {
    vec![
        Tile::new(
            "Total Portfolio Value",
            compact_currency(metrics.total_value),
            None,
        ),
        Tile::new(
            "Active Leads",
            count(metrics.lead_count),
            Some(format!(
                "{} buy, {} sell",
                count(metrics.buy_count),
                count(metrics.sell_count)
            )),
        ),
        Tile::new(
            "Total Contacts",
            count(metrics.total_contacts),
            Some(format!(
                "Avg {} per property",
                compact_currency(metrics.average_value)
            )),
        ),
        Tile::new(
            "High Priority",
            count(metrics.high_priority_count),
            Some(format!(
                "{} of pipeline",
                percent(metrics.high_priority_share_percent)
            )),
        ),
    ]
}

#[must_use]
pub fn deal_tiles(metrics: &DealMetrics) -> Vec<Tile> {
    vec![
        Tile::new(
            "Pipeline Value",
            compact_currency(metrics.total_value),
            Some(format!(
                "{} weighted",
                compact_currency(metrics.weighted_value)
            )),
        ),
        Tile::new(
            "Open Deals",
            count(metrics.open_count),
            Some(format!("of {}", plural(metrics.deal_count, "deal"))),
        ),
        Tile::new(
            "Closed Won",
            compact_currency(metrics.won_value),
            Some(plural(metrics.won_count, "deal")),
        ),
        Tile::new(
            "Win Rate",
            percent(metrics.win_rate_percent),
            Some(format!(
                "Avg {} per deal",
                compact_currency(metrics.average_value)
            )),
        ),
    ]
}

pub fn tiles(tiles: &[Tile]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for tile in tiles {
        let line = format!(
            "{:<22} {:<8} {}",
            tile.title,
            tile.value,
            tile.subtitle.as_deref().unwrap_or_default()
        );
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(out)
}

/// One button per bucket, the active one in brackets: `[All Leads] Buy Sell`.
#[must_use]
pub fn filter_bar<C: Category>(all_label: &str, active: Option<C>) -> String {
    let mut buttons = vec![bracket_if(all_label, active.is_none())];
    buttons.extend(
        C::ALL
            .iter()
            .map(|category| bracket_if(category.label(), active == Some(*category))),
    );
    format!("Filter: {}", buttons.join(" "))
}

fn bracket_if(label: &str, active: bool) -> String {
    if active {
        format!("[{label}]")
    } else {
        label.to_string()
    }
}

#[must_use]
pub fn lead_rows(visible: &[&Lead], selection: &Selection) -> Vec<LeadRow> {
    visible
        .iter()
        .map(|lead| LeadRow {
            id: lead.id.clone(),
            headline: lead.headline(),
            address: lead.property.address.clone(),
            property_type: lead.property_type,
            priority: lead.priority,
            price: compact_currency(lead.property.price),
            size: square_feet(lead.property.square_feet),
            contacts: plural(lead.contacts.len(), "contact"),
            selected: selection.is_selected(&lead.id),
        })
        .collect()
}

#[must_use]
pub fn deal_rows(visible: &[&Deal], selection: &Selection) -> Vec<DealRow> {
    visible
        .iter()
        .map(|deal| DealRow {
            id: deal.id.clone(),
            name: deal.name.clone(),
            company: deal.company.clone(),
            stage: deal.stage,
            value: compact_currency(deal.value),
            probability: percent(u32::from(deal.probability)),
            weighted_value: compact_currency(deal.weighted_value()),
            expected_close: deal.expected_close.to_string(),
            selected: selection.is_selected(&deal.id),
        })
        .collect()
}

pub fn lead_table(rows: &[LeadRow]) -> Result<String, fmt::Error> {
    if rows.is_empty() {
        return Ok(format!("{LEADS_EMPTY}\n"));
    }

    let mut out = String::new();
    writeln!(
        out,
        "  {:<8} {:<34} {:<8} {:<5} {:<8} {:<11} contacts",
        "id", "property", "price", "type", "priority", "size"
    )?;
    writeln!(out, "{}", "-".repeat(90))?;
    for row in rows {
        writeln!(
            out,
            "{} {:<8} {:<34} {:<8} {:<5} {:<8} {:<11} {}",
            selected_marker(row.selected),
            row.id,
            row.headline,
            row.price,
            row.property_type.label(),
            row.priority.as_str(),
            row.size,
            row.contacts
        )?;
    }
    Ok(out)
}

pub fn deal_table(rows: &[DealRow]) -> Result<String, fmt::Error> {
    if rows.is_empty() {
        return Ok(format!("{DEALS_EMPTY}\n"));
    }

    let mut out = String::new();
    writeln!(
        out,
        "  {:<8} {:<30} {:<28} {:<13} {:<8} {:<5} close",
        "id", "deal", "company", "stage", "value", "prob"
    )?;
    writeln!(out, "{}", "-".repeat(110))?;
    for row in rows {
        writeln!(
            out,
            "{} {:<8} {:<30} {:<28} {:<13} {:<8} {:<5} {}",
            selected_marker(row.selected),
            row.id,
            row.name,
            row.company,
            row.stage.label(),
            row.value,
            row.probability,
            row.expected_close
        )?;
    }
    Ok(out)
}

fn selected_marker(selected: bool) -> char {
    if selected {
        '>'
    } else {
        ' '
    }
}

/// Detail panel for one lead. Notes are only listed for the expanded contact.
pub fn lead_detail(
    lead: &Lead,
    expanded_contact_id: Option<&str>,
) -> Result<String, fmt::Error> {
    let property = &lead.property;
    let mut out = String::new();

    writeln!(out, "{}", property.kind)?;
    writeln!(out, "{}", property.address)?;
    writeln!(out, "{}, {} {}", property.city, property.state, property.zip)?;
    writeln!(out, "{} County", property.county)?;
    writeln!(out)?;

    let year_built = if property.year_built == 0 {
        "n/a".to_string()
    } else {
        property.year_built.to_string()
    };
    for (label, value) in [
        ("Price", full_currency(property.price)),
        ("Square Feet", square_feet(property.square_feet)),
        ("Year Built", year_built),
        ("Zoning", property.zoning.clone()),
        ("Status", lead.status.as_str().to_string()),
        ("Priority", format!("{} Priority", lead.priority.as_str())),
        ("Added", lead.date_added.to_string()),
    ] {
        writeln!(out, "{label:<12} {value}")?;
    }

    writeln!(out)?;
    writeln!(out, "Description")?;
    writeln!(out, "{}", property.description)?;
    writeln!(out)?;
    writeln!(out, "Contacts ({})", lead.contacts.len())?;

    for contact in &lead.contacts {
        let expanded = expanded_contact_id == Some(contact.id.as_str());
        let toggle = if expanded { "[-]" } else { "[+]" };
        writeln!(out, "{toggle} {} ({})", contact.name, contact.role)?;
        writeln!(out, "    {} at {}", contact.title, contact.company)?;
        writeln!(out, "    {} | {}", contact.email, contact.phone)?;
        writeln!(out, "    {}", plural(contact.notes.len(), "note"))?;
        if expanded {
            for note in &contact.notes {
                writeln!(out, "      {}  {}", note.date, note.author)?;
                writeln!(out, "      {}", note.text)?;
            }
        }
    }
    Ok(out)
}

pub fn deal_detail(deal: &Deal) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", deal.name)?;
    writeln!(out, "{}", deal.company)?;
    writeln!(out)?;

    for (label, value) in [
        ("Stage", deal.stage.label().to_string()),
        ("Value", full_currency(deal.value)),
        ("Probability", percent(u32::from(deal.probability))),
        ("Weighted", full_currency(deal.weighted_value())),
        ("Contact", deal.contact_name.clone()),
        ("Owner", deal.owner.clone()),
        ("Close Date", deal.expected_close.to_string()),
    ] {
        writeln!(out, "{label:<12} {value}")?;
    }
    Ok(out)
}

/// Per-stage table in pipeline order.
pub fn deal_stages(metrics: &DealMetrics) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{:<14} {:<6} {:<6} value", "stage", "deals", "share")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for entry in &metrics.stages {
        writeln!(
            out,
            "{:<14} {:<6} {:<6} {}",
            entry.stage.label(),
            count(entry.count),
            percent(entry.share_percent),
            compact_currency(entry.value)
        )?;
    }
    Ok(out)
}

pub fn lead_dashboard(session: &DashboardSession<'_, Lead>) -> Result<String, fmt::Error> {
    let metrics = LeadMetrics::compute(session.records());
    let rows = lead_rows(&session.visible(), session.selection());
    let detail = match session.detail() {
        Some(lead) => lead_detail(lead, session.selection().expanded_contact_id())?,
        None => format!("{LEADS_PLACEHOLDER}\n"),
    };

    Ok([
        format!("{LEADS_TITLE}\n{LEADS_SUBTITLE}\n"),
        tiles(&lead_tiles(&metrics))?,
        format!("{}\n", filter_bar("All Leads", session.filter())),
        lead_table(&rows)?,
        detail,
    ]
    .join("\n"))
}

pub fn deal_dashboard(session: &DashboardSession<'_, Deal>) -> Result<String, fmt::Error> {
    let metrics = DealMetrics::compute(session.records());
    let rows = deal_rows(&session.visible(), session.selection());
    let detail = match session.detail() {
        Some(deal) => deal_detail(deal)?,
        None => format!("{DEALS_PLACEHOLDER}\n"),
    };

    Ok([
        format!("{DEALS_TITLE}\n{DEALS_SUBTITLE}\n"),
        tiles(&deal_tiles(&metrics))?,
        format!("{}\n", filter_bar("All Deals", session.filter())),
        deal_table(&rows)?,
        detail,
    ]
    .join("\n"))
}
