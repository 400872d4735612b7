//! Text and JSON rendering of a finished run

use std::fmt;

use paramsim_core::model::{Outcome, RunReport};

/// Outcomes listed in the text report
pub const TOP_OUTCOMES: usize = 20;

/// Plain-text view of a [`RunReport`]
pub struct TextReport<'a> {
    report: &'a RunReport,
    title: Option<&'a str>,
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a RunReport) -> Self {
        Self {
            report,
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<&'a str>) -> Self {
        self.title = title;
        self
    }
}

fn outcome_values(outcome: &Outcome) -> String {
    outcome
        .values
        .iter()
        .map(|v| format!("{}: {}", v.name, v.value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_effect(outcome: &Outcome) -> String {
    match outcome.interaction_effect_pct() {
        Some(pct) => format!("{pct:+.1}%"),
        None => "-".to_string(),
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        if let Some(title) = self.title {
            writeln!(f, "{title}")?;
        }
        writeln!(
            f,
            "Simulation results ({} iterations, seed {})",
            report.total_iterations, report.seed
        )?;

        let top = report.top_outcomes(TOP_OUTCOMES);
        writeln!(f)?;
        writeln!(
            f,
            "Top {} of {} outcomes",
            top.len(),
            report.outcomes.len()
        )?;
        writeln!(
            f,
            "{:>4}  {:>11}  {:<6}  {:>11}  Values",
            "#", "Probability", "Tier", "Interaction"
        )?;
        for (rank, outcome) in top.iter().enumerate() {
            writeln!(
                f,
                "{:>4}  {:>10.2}%  {:<6}  {:>11}  {}",
                rank + 1,
                outcome.probability * 100.0,
                outcome.probability_tier().label(),
                format_effect(outcome),
                outcome_values(outcome)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Weighted averages")?;
        for avg in &report.averages {
            writeln!(
                f,
                "  {:<24} {:>12.2}  ({:.1}%)",
                avg.parameter, avg.average, avg.percentage
            )?;
        }
        match &report.winner {
            Some(winner) => writeln!(
                f,
                "Winner: {} ({:.1}%)",
                winner.parameter, winner.percentage
            )?,
            None => writeln!(f, "Winner: no data")?,
        }

        if let Some(sensitivity) = &report.sensitivity {
            writeln!(f)?;
            writeln!(
                f,
                "Sensitivity ({} iterations per pass)",
                sensitivity.iterations
            )?;
            for score in sensitivity.iter() {
                writeln!(f, "  {:<24} {:>8.4}", score.parameter, score.score)?;
            }
        }

        if !report.diagnostics.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings")?;
            for diagnostic in &report.diagnostics {
                writeln!(f, "  {diagnostic}")?;
            }
        }

        Ok(())
    }
}

pub fn render_text(report: &RunReport) -> String {
    TextReport::new(report).to_string()
}

pub fn render_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
