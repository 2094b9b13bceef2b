#![allow(clippy::missing_errors_doc)]

//! Read-only record store backed by JSON fixtures.
//!
//! Fixtures are decoded into strict transfer structs and validated before any
//! domain record is built, so a malformed fixture fails at load time instead of
//! surfacing as a missing field in a rendered dashboard.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use salesboard_core::{
    parse_iso_date, Contact, DashboardError, DashboardRecord, Deal, DealStage, Lead, LeadStatus,
    Note, Priority, Property, PropertyType,
};
use serde::Deserialize;

pub const BUNDLED_LEADS: &str = include_str!("../fixtures/leads.json");
pub const BUNDLED_DEALS: &str = include_str!("../fixtures/deals.json");

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FixtureSource {
    Bundled,
    File(PathBuf),
    /// Records handed over by the caller through [`RecordStore::from_records`].
    InMemory,
}

impl FixtureSource {
    #[must_use]
    pub fn from_optional_path(path: Option<&Path>) -> Self {
        path.map_or(Self::Bundled, |value| Self::File(value.to_path_buf()))
    }
}

impl Display for FixtureSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => f.write_str("bundled"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::InMemory => f.write_str("in-memory"),
        }
    }
}

/// A record type that can be decoded from a fixture document.
pub trait FixtureRecord: DashboardRecord + Sized {
    /// Dataset name used in log lines and error messages.
    const DATASET: &'static str;
    const BUNDLED: &'static str;

    fn decode_fixture(text: &str) -> Result<Vec<Self>>;
}

impl FixtureRecord for Lead {
    const DATASET: &'static str = "leads";
    const BUNDLED: &'static str = BUNDLED_LEADS;

    fn decode_fixture(text: &str) -> Result<Vec<Self>> {
        parse_leads(text)
    }
}

impl FixtureRecord for Deal {
    const DATASET: &'static str = "deals";
    const BUNDLED: &'static str = BUNDLED_DEALS;

    fn decode_fixture(text: &str) -> Result<Vec<Self>> {
        parse_deals(text)
    }
}

/// Immutable collection of validated records, loaded once per process.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
    source: FixtureSource,
}

impl<R: FixtureRecord> RecordStore<R> {
    pub fn load(source: &FixtureSource) -> Result<Self> {
        let text = match source {
            FixtureSource::Bundled => R::BUNDLED.to_string(),
            FixtureSource::File(path) => std::fs::read_to_string(path).with_context(|| {
                format!("failed reading {} fixture {}", R::DATASET, path.display())
            })?,
            FixtureSource::InMemory => {
                bail!("{} fixture source `in-memory` cannot be loaded", R::DATASET)
            }
        };

        let records = match R::decode_fixture(&text) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    dataset = R::DATASET,
                    %source,
                    error = %format!("{err:#}"),
                    "fixture rejected"
                );
                return Err(err.context(format!("invalid {} fixture ({source})", R::DATASET)));
            }
        };

        tracing::info!(
            dataset = R::DATASET,
            %source,
            records = records.len(),
            "fixture loaded"
        );
        Ok(Self {
            records,
            source: source.clone(),
        })
    }

    pub fn bundled() -> Result<Self> {
        Self::load(&FixtureSource::Bundled)
    }
}

impl<R: DashboardRecord> RecordStore<R> {
    #[must_use]
    pub fn from_records(records: Vec<R>) -> Self {
        Self {
            records,
            source: FixtureSource::InMemory,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn source(&self) -> &FixtureSource {
        &self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LeadFixture {
    leads: Vec<LeadDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LeadDto {
    id: String,
    property_type: PropertyType,
    property: PropertyDto,
    status: LeadStatus,
    priority: Priority,
    date_added: String,
    contacts: Vec<ContactDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PropertyDto {
    address: String,
    city: String,
    state: String,
    zip: String,
    county: String,
    #[serde(rename = "type")]
    kind: String,
    square_feet: u32,
    price: f64,
    zoning: String,
    year_built: u16,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ContactDto {
    id: String,
    name: String,
    email: String,
    phone: String,
    company: String,
    title: String,
    #[serde(rename = "type")]
    role: String,
    notes: Vec<NoteDto>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoteDto {
    date: String,
    author: String,
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DealFixture {
    deals: Vec<DealDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DealDto {
    id: String,
    name: String,
    company: String,
    contact_name: String,
    owner: String,
    stage: DealStage,
    value: f64,
    probability: u8,
    expected_close: String,
}

/// Decodes and validates a leads fixture document (`{"leads": [...]}`).
pub fn parse_leads(text: &str) -> Result<Vec<Lead>> {
    let fixture: LeadFixture =
        serde_json::from_str(text).context("failed to decode leads fixture JSON")?;

    let mut seen = BTreeSet::new();
    let mut leads = Vec::with_capacity(fixture.leads.len());
    for (index, dto) in fixture.leads.into_iter().enumerate() {
        let lead = lead_from_dto(dto).with_context(|| format!("leads[{index}]"))?;
        if !seen.insert(lead.id.clone()) {
            return Err(
                DashboardError::Validation(format!("duplicate lead id `{}`", lead.id)).into(),
            );
        }
        leads.push(lead);
    }
    Ok(leads)
}

/// Decodes and validates a deals fixture document (`{"deals": [...]}`).
pub fn parse_deals(text: &str) -> Result<Vec<Deal>> {
    let fixture: DealFixture =
        serde_json::from_str(text).context("failed to decode deals fixture JSON")?;

    let mut seen = BTreeSet::new();
    let mut deals = Vec::with_capacity(fixture.deals.len());
    for (index, dto) in fixture.deals.into_iter().enumerate() {
        let deal = deal_from_dto(dto).with_context(|| format!("deals[{index}]"))?;
        if !seen.insert(deal.id.clone()) {
            return Err(
                DashboardError::Validation(format!("duplicate deal id `{}`", deal.id)).into(),
            );
        }
        deals.push(deal);
    }
    Ok(deals)
}

fn lead_from_dto(dto: LeadDto) -> Result<Lead, DashboardError> {
    require_id("lead", &dto.id)?;
    let id = dto.id;
    require_amount(&format!("lead `{id}` property.price"), dto.property.price)?;

    let date_added = parse_iso_date(&dto.date_added)
        .map_err(|err| DashboardError::Validation(format!("lead `{id}` dateAdded: {err}")))?;

    let mut contact_ids = BTreeSet::new();
    let mut contacts = Vec::with_capacity(dto.contacts.len());
    for contact in dto.contacts {
        require_id(&format!("lead `{id}` contact"), &contact.id)?;
        if !contact_ids.insert(contact.id.clone()) {
            return Err(DashboardError::Validation(format!(
                "lead `{id}` has duplicate contact id `{}`",
                contact.id
            )));
        }
        contacts.push(contact_from_dto(&id, contact)?);
    }

    Ok(Lead {
        property_type: dto.property_type,
        property: Property {
            address: dto.property.address,
            city: dto.property.city,
            state: dto.property.state,
            zip: dto.property.zip,
            county: dto.property.county,
            kind: dto.property.kind,
            square_feet: dto.property.square_feet,
            price: dto.property.price,
            zoning: dto.property.zoning,
            year_built: dto.property.year_built,
            description: dto.property.description,
        },
        status: dto.status,
        priority: dto.priority,
        date_added,
        contacts,
        id,
    })
}

fn contact_from_dto(lead_id: &str, dto: ContactDto) -> Result<Contact, DashboardError> {
    let notes = dto
        .notes
        .into_iter()
        .map(|note| {
            let date = parse_iso_date(&note.date).map_err(|err| {
                DashboardError::Validation(format!(
                    "lead `{lead_id}` contact `{}` note date: {err}",
                    dto.id
                ))
            })?;
            Ok(Note {
                date,
                author: note.author,
                text: note.text,
            })
        })
        .collect::<Result<Vec<_>, DashboardError>>()?;

    Ok(Contact {
        id: dto.id,
        name: dto.name,
        email: dto.email,
        phone: dto.phone,
        company: dto.company,
        title: dto.title,
        role: dto.role,
        notes,
    })
}

fn deal_from_dto(dto: DealDto) -> Result<Deal, DashboardError> {
    require_id("deal", &dto.id)?;
    let id = dto.id;
    require_amount(&format!("deal `{id}` value"), dto.value)?;

    if dto.probability > 100 {
        return Err(DashboardError::Validation(format!(
            "deal `{id}` probability MUST be in [0, 100]"
        )));
    }

    let expected_close = parse_iso_date(&dto.expected_close)
        .map_err(|err| DashboardError::Validation(format!("deal `{id}` expectedClose: {err}")))?;

    Ok(Deal {
        name: dto.name,
        company: dto.company,
        contact_name: dto.contact_name,
        owner: dto.owner,
        stage: dto.stage,
        value: dto.value,
        probability: dto.probability,
        expected_close,
        id,
    })
}

fn require_id(kind: &str, id: &str) -> Result<(), DashboardError> {
    if id.trim().is_empty() {
        return Err(DashboardError::Validation(format!("{kind} id MUST be non-empty")));
    }
    Ok(())
}

fn require_amount(field: &str, value: f64) -> Result<(), DashboardError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DashboardError::Validation(format!(
            "{field} MUST be a finite, non-negative number"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn must<T>(result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("test failure: {err:#}"),
        }
    }

    fn must_err<T: std::fmt::Debug>(result: Result<T>) -> String {
        match result {
            Ok(value) => panic!("expected error, got {value:?}"),
            Err(err) => format!("{err:#}"),
        }
    }

    fn lead_json() -> serde_json::Value {
        json!({
            "id": "L-9001",
            "propertyType": "sell",
            "property": {
                "address": "1 Fixture Way",
                "city": "Wheaton",
                "state": "IL",
                "zip": "60187",
                "county": "DuPage",
                "type": "Retail Center",
                "squareFeet": 18000,
                "price": 3200000,
                "zoning": "B-2",
                "yearBuilt": 2004,
                "description": "Anchored strip center"
            },
            "status": "pending",
            "priority": "high",
            "dateAdded": "2025-02-01",
            "contacts": [
                {
                    "id": "C-1",
                    "name": "Morgan Chen",
                    "email": "morgan@example.com",
                    "phone": "(630) 555-0111",
                    "company": "Chen Retail Partners",
                    "title": "Managing Partner",
                    "type": "Owner",
                    "notes": [
                        { "date": "2025-02-03", "author": "Dana Ruiz", "text": "Wants a Q2 close" }
                    ]
                }
            ]
        })
    }

    fn deal_json() -> serde_json::Value {
        json!({
            "id": "D-9001",
            "name": "Fleet telematics rollout",
            "company": "Acme Logistics",
            "contactName": "Jordan Lee",
            "owner": "Sam Patel",
            "stage": "Closed Won",
            "value": 84000,
            "probability": 100,
            "expectedClose": "2025-03-31"
        })
    }

    #[test]
    fn bundled_fixtures_load_and_validate() {
        let leads = must(RecordStore::<Lead>::bundled());
        assert!(!leads.is_empty());
        assert_eq!(leads.source(), &FixtureSource::Bundled);

        let deals = must(RecordStore::<Deal>::bundled());
        assert!(!deals.is_empty());
    }

    #[test]
    fn lead_fixture_maps_wire_names_onto_domain_fields() {
        let text = json!({ "leads": [lead_json()] }).to_string();
        let leads = must(parse_leads(&text));

        assert_eq!(leads.len(), 1);
        let lead = &leads[0];
        assert_eq!(lead.property_type, PropertyType::Sell);
        assert_eq!(lead.property.kind, "Retail Center");
        assert_eq!(lead.contacts[0].role, "Owner");
        assert_eq!(lead.contacts[0].notes[0].date.to_string(), "2025-02-03");
        assert_eq!(lead.date_added.to_string(), "2025-02-01");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut lead = lead_json();
        lead["commission"] = json!(0.03);
        let text = json!({ "leads": [lead] }).to_string();

        let message = must_err(parse_leads(&text));
        assert!(message.contains("unknown field `commission`"), "{message}");
    }

    #[test]
    fn unknown_transaction_type_is_rejected() {
        let mut lead = lead_json();
        lead["propertyType"] = json!("lease");
        let text = json!({ "leads": [lead] }).to_string();

        let message = must_err(parse_leads(&text));
        assert!(message.contains("unknown variant `lease`"), "{message}");
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut lead = lead_json();
        lead["property"]["price"] = json!(-5);
        let text = json!({ "leads": [lead] }).to_string();

        let message = must_err(parse_leads(&text));
        assert!(
            message.contains("lead `L-9001` property.price MUST be a finite, non-negative number"),
            "{message}"
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = json!({ "leads": [lead_json(), lead_json()] }).to_string();
        let message = must_err(parse_leads(&text));
        assert!(message.contains("duplicate lead id `L-9001`"), "{message}");

        let mut lead = lead_json();
        let contact = lead["contacts"][0].clone();
        if let Some(contacts) = lead["contacts"].as_array_mut() {
            contacts.push(contact);
        }
        let text = json!({ "leads": [lead] }).to_string();
        let message = must_err(parse_leads(&text));
        assert!(message.contains("duplicate contact id `C-1`"), "{message}");
    }

    #[test]
    fn malformed_dates_name_the_record() {
        let mut lead = lead_json();
        lead["contacts"][0]["notes"][0]["date"] = json!("Feb 3");
        let text = json!({ "leads": [lead] }).to_string();
        let message = must_err(parse_leads(&text));
        assert!(message.contains("lead `L-9001` contact `C-1` note date"), "{message}");

        let mut deal = deal_json();
        deal["expectedClose"] = json!("2025-13-01");
        let text = json!({ "deals": [deal] }).to_string();
        let message = must_err(parse_deals(&text));
        assert!(message.contains("deal `D-9001` expectedClose"), "{message}");
    }

    #[test]
    fn deal_probability_is_bounded() {
        let mut deal = deal_json();
        deal["probability"] = json!(140);
        let text = json!({ "deals": [deal] }).to_string();

        let message = must_err(parse_deals(&text));
        assert!(message.contains("probability MUST be in [0, 100]"), "{message}");
    }

    #[test]
    fn empty_ids_are_rejected() {
        let mut deal = deal_json();
        deal["id"] = json!("  ");
        let text = json!({ "deals": [deal] }).to_string();

        let message = must_err(parse_deals(&text));
        assert!(message.contains("deal id MUST be non-empty"), "{message}");
    }

    #[test]
    fn empty_fixture_is_a_valid_store() {
        let leads = must(parse_leads(r#"{"leads": []}"#));
        let store = RecordStore::from_records(leads);
        assert!(store.is_empty());
        assert_eq!(store.source(), &FixtureSource::InMemory);
        assert_eq!(store.source().to_string(), "in-memory");
        assert!(store.get("L-1").is_none());
    }

    #[test]
    fn in_memory_source_cannot_be_loaded() {
        let message = must_err(RecordStore::<Deal>::load(&FixtureSource::InMemory));
        assert!(
            message.contains("deals fixture source `in-memory` cannot be loaded"),
            "{message}"
        );
    }

    #[test]
    fn file_fixture_is_read_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "salesboard-store-deals-{}.json",
            std::process::id()
        ));
        let text = json!({ "deals": [deal_json()] }).to_string();
        if let Err(err) = std::fs::write(&path, text) {
            panic!("failed to write fixture: {err}");
        }

        let store = must(RecordStore::<Deal>::load(&FixtureSource::File(path.clone())));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("D-9001").map(|deal| deal.stage), Some(DealStage::ClosedWon));
        assert_eq!(store.source(), &FixtureSource::File(path.clone()));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_fixture_file_reports_path() {
        let path = std::env::temp_dir().join("salesboard-store-missing.json");
        let message = must_err(RecordStore::<Lead>::load(&FixtureSource::File(path.clone())));
        assert!(
            message.contains(&format!("failed reading leads fixture {}", path.display())),
            "{message}"
        );
    }
}
