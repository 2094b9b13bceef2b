use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{average_value, count_in, share_percent, total_value, Category, DashboardRecord};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DealStage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl DealStage {
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

impl Category for DealStage {
    const ALL: &'static [Self] = &[
        Self::Prospecting,
        Self::Qualification,
        Self::Proposal,
        Self::Negotiation,
        Self::ClosedWon,
        Self::ClosedLost,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Prospecting => "Prospecting",
            Self::Qualification => "Qualification",
            Self::Proposal => "Proposal",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }
}

impl Display for DealStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deal {
    pub id: String,
    pub name: String,
    pub company: String,
    pub contact_name: String,
    pub owner: String,
    pub stage: DealStage,
    pub value: f64,
    /// Whole percentage in `0..=100`.
    pub probability: u8,
    #[serde(with = "crate::iso_date")]
    pub expected_close: Date,
}

impl Deal {
    #[must_use]
    pub fn weighted_value(&self) -> f64 {
        self.value * f64::from(self.probability) / 100.0
    }
}

impl DashboardRecord for Deal {
    type Category = DealStage;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> DealStage {
        self.stage
    }

    fn value(&self) -> f64 {
        self.value
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageBreakdown {
    pub stage: DealStage,
    pub count: usize,
    pub share_percent: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DealMetrics {
    pub deal_count: usize,
    pub total_value: f64,
    pub average_value: f64,
    pub weighted_value: f64,
    pub open_count: usize,
    pub won_count: usize,
    pub won_value: f64,
    pub win_rate_percent: u32,
    /// One entry per stage in pipeline order, empty stages included.
    pub stages: Vec<StageBreakdown>,
}

impl DealMetrics {
    #[must_use]
    pub fn compute(deals: &[Deal]) -> Self {
        let deal_count = deals.len();
        let total = total_value(deals);

        let stages = DealStage::ALL
            .iter()
            .map(|stage| {
                let count = count_in(deals, *stage);
                StageBreakdown {
                    stage: *stage,
                    count,
                    share_percent: share_percent(count, deal_count),
                    value: deals
                        .iter()
                        .filter(|deal| deal.stage == *stage)
                        .map(|deal| deal.value)
                        .sum(),
                }
            })
            .collect::<Vec<_>>();

        let won_count = count_in(deals, DealStage::ClosedWon);
        let lost_count = count_in(deals, DealStage::ClosedLost);

        Self {
            deal_count,
            total_value: total,
            average_value: average_value(total, deal_count),
            weighted_value: deals.iter().map(Deal::weighted_value).sum(),
            open_count: deals.iter().filter(|deal| !deal.stage.is_closed()).count(),
            won_count,
            won_value: deals
                .iter()
                .filter(|deal| deal.stage == DealStage::ClosedWon)
                .map(|deal| deal.value)
                .sum(),
            win_rate_percent: share_percent(won_count, won_count + lost_count),
            stages,
        }
    }

    #[must_use]
    pub fn stage(&self, stage: DealStage) -> Option<&StageBreakdown> {
        self.stages.iter().find(|entry| entry.stage == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{deal, must_some};

    fn fixture_pipeline() -> Vec<Deal> {
        vec![
            deal("D-1", DealStage::Prospecting, 20_000.0, 10),
            deal("D-2", DealStage::Proposal, 80_000.0, 50),
            deal("D-3", DealStage::ClosedWon, 120_000.0, 100),
            deal("D-4", DealStage::ClosedLost, 40_000.0, 0),
            deal("D-5", DealStage::ClosedWon, 40_000.0, 100),
        ]
    }

    #[test]
    fn pipeline_totals_and_weighted_value() {
        let metrics = DealMetrics::compute(&fixture_pipeline());
        assert_eq!(metrics.deal_count, 5);
        assert!((metrics.total_value - 300_000.0).abs() < f64::EPSILON);
        assert!((metrics.average_value - 60_000.0).abs() < f64::EPSILON);
        assert!((metrics.weighted_value - 202_000.0).abs() < f64::EPSILON);
        assert_eq!(metrics.open_count, 2);
    }

    #[test]
    fn win_rate_counts_only_closed_deals() {
        let metrics = DealMetrics::compute(&fixture_pipeline());
        assert_eq!(metrics.won_count, 2);
        assert!((metrics.won_value - 160_000.0).abs() < f64::EPSILON);
        assert_eq!(metrics.win_rate_percent, 67);
    }

    #[test]
    fn win_rate_is_zero_without_closed_deals() {
        let deals = vec![deal("D-1", DealStage::Negotiation, 5_000.0, 70)];
        assert_eq!(DealMetrics::compute(&deals).win_rate_percent, 0);
    }

    #[test]
    fn every_stage_is_reported_in_pipeline_order() {
        let metrics = DealMetrics::compute(&fixture_pipeline());
        let order = metrics
            .stages
            .iter()
            .map(|entry| entry.stage)
            .collect::<Vec<_>>();
        assert_eq!(order, DealStage::ALL.to_vec());

        let qualification = must_some(metrics.stage(DealStage::Qualification));
        assert_eq!(qualification.count, 0);
        assert_eq!(qualification.share_percent, 0);

        let won = must_some(metrics.stage(DealStage::ClosedWon));
        assert_eq!(won.count, 2);
        assert_eq!(won.share_percent, 40);
        assert!((won.value - 160_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_pipeline_is_zeroed() {
        let metrics = DealMetrics::compute(&[]);
        assert_eq!(metrics.deal_count, 0);
        assert!(metrics.average_value.abs() < f64::EPSILON);
        assert!(metrics.weighted_value.abs() < f64::EPSILON);
        assert!(metrics.stages.iter().all(|entry| entry.count == 0));
    }

    #[test]
    fn stage_labels_round_trip_through_serde() {
        let value = match serde_json::to_value(DealStage::ClosedWon) {
            Ok(value) => value,
            Err(err) => panic!("failed to serialize stage: {err}"),
        };
        assert_eq!(value, serde_json::json!("Closed Won"));
        assert_eq!(DealStage::parse("closed_won"), Some(DealStage::ClosedWon));
    }
}
