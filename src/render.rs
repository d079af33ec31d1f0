//! Plain-text presentation used by the binary.

use std::fmt::Write;

use crate::{
    access::UnlockOffer,
    feed::{FeedError, PredictionRecord},
    session::Summary,
};

pub fn summary_line(summary: &Summary) -> String {
    format!("Showing {} of {} matches", summary.showing, summary.total)
}

pub fn unlock_prompt(offer: &UnlockOffer) -> String {
    if offer.exhausts {
        "Unlock remaining matches".to_string()
    } else {
        format!("Unlock next {} matches", offer.reveals)
    }
}

pub fn failure_state(err: &FeedError) -> String {
    format!("Analysis failed: {err}. Run again to retry.")
}

pub fn not_found(id: &str) -> String {
    format!("Match not found: {id}")
}

pub fn record_card(record: &PredictionRecord) -> String {
    let mut out = String::new();
    write_heading(&mut out, record);

    let safe = &record.conservative_recommendation;
    let value = &record.high_risk_recommendation;
    let _ = writeln!(out, "  safe:  {} @ {}", safe.title, safe.odds);
    let _ = write!(out, "  value: {} @ {}", value.title, value.odds);
    out
}

/// Full view of one match, including the numbers and reasoning the card leaves out.
pub fn record_detail(record: &PredictionRecord) -> String {
    let mut out = String::new();
    write_heading(&mut out, record);

    let stats = &record.stats_summary;
    let _ = writeln!(out, "\nForm");
    let _ = writeln!(out, "  {}: {}", record.home_participant, stats.home_form);
    let _ = writeln!(out, "  {}: {}", record.away_participant, stats.away_form);
    let _ = writeln!(out, "  head to head: {}", stats.h2h);
    let _ = writeln!(out, "  insights: {}", stats.key_insights);

    let _ = writeln!(out, "\nAnalysis");
    let _ = writeln!(out, "  {}", record.analysis_narrative);

    for (label, bet) in [
        ("Safe bet", &record.conservative_recommendation),
        ("Value bet", &record.high_risk_recommendation),
    ] {
        let _ = writeln!(out, "\n{label}: {} @ {}", bet.title, bet.odds);
        let _ = writeln!(out, "  {}", bet.description);
    }

    out.truncate(out.trim_end().len());
    out
}

fn write_heading(out: &mut String, record: &PredictionRecord) {
    let _ = writeln!(
        out,
        "[{}] {} {} vs {}",
        record.league, record.scheduled_time, record.home_participant, record.away_participant
    );

    match record.outcome_percentages() {
        Ok(outcome) => {
            let [home, draw, away] = outcome.rounded();
            let _ = writeln!(out, "  1 ({home}%)  X ({draw}%)  2 ({away}%)");
        }
        Err(err) => {
            tracing::warn!(target: "render", record_id = %record.id, error = %err, "render_outcome_skipped");
            let _ = writeln!(out, "  outcome probabilities unavailable");
        }
    }
}
