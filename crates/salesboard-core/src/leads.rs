//! Commercial real-estate leads: a property on the buy or sell side plus the
//! contacts working it.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{average_value, count_in, share_percent, total_value, Category, DashboardRecord};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Buy,
    Sell,
}

impl Category for PropertyType {
    const ALL: &'static [Self] = &[Self::Buy, Self::Sell];

    fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Active,
    Pending,
    Closed,
}

impl LeadStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    #[serde(with = "crate::iso_date")]
    pub date: Date,
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub title: String,
    /// Relationship to the property, e.g. buyer, seller or lender.
    pub role: String,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub county: String,
    /// Building class, e.g. "Office Building" or "Industrial Warehouse".
    pub kind: String,
    pub square_feet: u32,
    pub price: f64,
    pub zoning: String,
    pub year_built: u16,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: String,
    pub property_type: PropertyType,
    pub property: Property,
    pub status: LeadStatus,
    pub priority: Priority,
    #[serde(with = "crate::iso_date")]
    pub date_added: Date,
    pub contacts: Vec<Contact>,
}

impl Lead {
    /// List heading: building class and city.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{} - {}", self.property.kind, self.property.city)
    }

    #[must_use]
    pub fn contact(&self, contact_id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == contact_id)
    }
}

impl DashboardRecord for Lead {
    type Category = PropertyType;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> PropertyType {
        self.property_type
    }

    fn value(&self) -> f64 {
        self.property.price
    }

    fn has_sub_record(&self, sub_id: &str) -> bool {
        self.contact(sub_id).is_some()
    }
}

/// Summary tiles of the leads dashboard, always over the full collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadMetrics {
    pub lead_count: usize,
    pub total_value: f64,
    pub average_value: f64,
    pub buy_count: usize,
    pub sell_count: usize,
    pub buy_share_percent: u32,
    pub sell_share_percent: u32,
    pub total_contacts: usize,
    pub high_priority_count: usize,
    pub high_priority_share_percent: u32,
}

impl LeadMetrics {
    #[must_use]
    pub fn compute(leads: &[Lead]) -> Self {
        let lead_count = leads.len();
        let total = total_value(leads);
        let buy_count = count_in(leads, PropertyType::Buy);
        let sell_count = count_in(leads, PropertyType::Sell);
        let high_priority_count = leads
            .iter()
            .filter(|lead| lead.priority == Priority::High)
            .count();

        Self {
            lead_count,
            total_value: total,
            average_value: average_value(total, lead_count),
            buy_count,
            sell_count,
            buy_share_percent: share_percent(buy_count, lead_count),
            sell_share_percent: share_percent(sell_count, lead_count),
            total_contacts: leads.iter().map(|lead| lead.contacts.len()).sum(),
            high_priority_count,
            high_priority_share_percent: share_percent(high_priority_count, lead_count),
        }
    }
}
