use std::{ops::Deref, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feed::error::{FeedError, degenerate_distribution, format_error};

pub type RecordId = String;

/// One predicted fixture as written by the upstream producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: RecordId,
    #[serde(rename = "time")]
    pub scheduled_time: String,
    pub league: String,
    #[serde(rename = "homeTeam")]
    pub home_participant: String,
    #[serde(rename = "awayTeam")]
    pub away_participant: String,
    #[serde(rename = "prediction")]
    pub outcome_distribution: OutcomeDistribution,
    #[serde(rename = "safeBet")]
    pub conservative_recommendation: Recommendation,
    #[serde(rename = "valueBet")]
    pub high_risk_recommendation: Recommendation,
    #[serde(rename = "stats")]
    pub stats_summary: StatsSummary,
    #[serde(rename = "reasoning")]
    pub analysis_narrative: String,
}

impl PredictionRecord {
    pub fn outcome_percentages(&self) -> Result<NormalizedOutcome, FeedError> {
        self.outcome_distribution
            .normalized()
            .ok_or_else(|| degenerate_distribution(&self.id, self.outcome_distribution.sum()))
    }
}

/// Raw home/draw/away weights. The producer does not guarantee they add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeDistribution {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeDistribution {
    pub fn sum(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }

    pub fn is_degenerate(&self) -> bool {
        let weights = [self.home_win, self.draw, self.away_win];
        let sum = self.sum();
        weights.iter().any(|w| !w.is_finite() || *w < 0.0) || !sum.is_finite() || sum <= 0.0
    }

    /// Rescales the weights to percentages. `None` when the weights cannot be rescaled.
    pub fn normalized(&self) -> Option<NormalizedOutcome> {
        if self.is_degenerate() {
            return None;
        }

        let sum = self.sum();
        Some(NormalizedOutcome {
            home_win: self.home_win / sum * 100.0,
            draw: self.draw / sum * 100.0,
            away_win: self.away_win / sum * 100.0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedOutcome {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl NormalizedOutcome {
    pub fn rounded(&self) -> [u32; 3] {
        [self.home_win, self.draw, self.away_win].map(|pct| pct.round() as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    /// Kept verbatim, the producer writes things like "1.85" or "~2.10".
    pub odds: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub home_form: String,
    pub away_form: String,
    pub h2h: String,
    pub key_insights: String,
}

/// Ordered, shared record set. Order is the producer's significance ranking.
#[derive(Debug, Clone, Default)]
pub struct RecordSet(Arc<[PredictionRecord]>);

impl RecordSet {
    pub fn new(records: Vec<PredictionRecord>) -> Self {
        Self(records.into())
    }

    pub fn find(&self, id: &str) -> Option<&PredictionRecord> {
        self.0.iter().find(|record| record.id == id)
    }

    pub fn ptr_eq(&self, other: &RecordSet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for RecordSet {
    type Target = [PredictionRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for RecordSet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0[..] == other.0[..]
    }
}

impl From<Vec<PredictionRecord>> for RecordSet {
    fn from(records: Vec<PredictionRecord>) -> Self {
        Self::new(records)
    }
}

/// Decodes a whole feed document. The document must be a JSON array, and every
/// element must be a complete record: one malformed record fails the entire
/// feed with a `Format` error instead of being skipped.
pub fn decode_record_set(document: Value) -> Result<RecordSet, FeedError> {
    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(format_error(format!(
                "expected a JSON array of matches, got {}",
                json_type_name(&other)
            )));
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<PredictionRecord>(item)
                .map_err(|err| format_error(format!("invalid match at index {index}: {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordSet::new(records))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
