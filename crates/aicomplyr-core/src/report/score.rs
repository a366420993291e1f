//! Summary counts, compliance score and overall status.
//!
//! Weights: approved 1.0, needs review 0.5, rejected 0.0, unknown 0.0.
//! Thresholds: any rejected tool → red, else score ≥ 80 → green,
//! score ≥ 60 → yellow, otherwise red.

use crate::report::model::{OverallStatus, ToolsSummary};
use crate::rules::classify::ToolStatus;

const APPROVED_WEIGHT: f64 = 1.0;
const NEEDS_REVIEW_WEIGHT: f64 = 0.5;
const REJECTED_WEIGHT: f64 = 0.0;

const GREEN_THRESHOLD: u8 = 80;
const YELLOW_THRESHOLD: u8 = 60;

pub fn summarize<I>(statuses: I) -> ToolsSummary
where
    I: IntoIterator<Item = ToolStatus>,
{
    let mut summary = ToolsSummary::default();
    for status in statuses {
        summary.total_tools += 1;
        match status {
            ToolStatus::Approved => summary.approved_tools += 1,
            ToolStatus::NeedsReview => summary.needs_review_tools += 1,
            ToolStatus::Rejected => summary.rejected_tools += 1,
            ToolStatus::Unknown => summary.unknown_tools += 1,
        }
    }
    summary
}

/// Weighted share of compliant tools, 0-100. An empty project scores 100.
pub fn compliance_score(summary: &ToolsSummary) -> u8 {
    if summary.total_tools == 0 {
        return 100;
    }
    let weighted = (f64::from(summary.approved_tools) * APPROVED_WEIGHT
        + f64::from(summary.needs_review_tools) * NEEDS_REVIEW_WEIGHT
        + f64::from(summary.rejected_tools) * REJECTED_WEIGHT)
        / f64::from(summary.total_tools);
    // weighted is within [0, 1], so the rounded value fits in u8.
    (weighted * 100.0).round() as u8
}

pub fn overall_status(score: u8, summary: &ToolsSummary) -> OverallStatus {
    if summary.rejected_tools > 0 {
        OverallStatus::Red
    } else if score >= GREEN_THRESHOLD {
        OverallStatus::Green
    } else if score >= YELLOW_THRESHOLD {
        OverallStatus::Yellow
    } else {
        OverallStatus::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(a: u32, n: u32, r: u32, u: u32) -> ToolsSummary {
        ToolsSummary {
            total_tools: a + n + r + u,
            approved_tools: a,
            needs_review_tools: n,
            rejected_tools: r,
            unknown_tools: u,
        }
    }

    #[test]
    fn summarize_counts_each_status() {
        let s = summarize([
            ToolStatus::Approved,
            ToolStatus::Rejected,
            ToolStatus::NeedsReview,
            ToolStatus::Rejected,
            ToolStatus::Unknown,
        ]);
        assert_eq!(s, counts(1, 1, 2, 1));
    }

    #[test]
    fn empty_project_scores_100_and_is_green() {
        let s = summarize([]);
        assert_eq!(compliance_score(&s), 100);
        assert_eq!(overall_status(100, &s), OverallStatus::Green);
    }

    #[test]
    fn score_matches_weighted_formula_over_a_grid() {
        for a in 0..6u32 {
            for n in 0..6u32 {
                for r in 0..4u32 {
                    for u in 0..4u32 {
                        let s = counts(a, n, r, u);
                        if s.total_tools == 0 {
                            continue;
                        }
                        let expected = ((f64::from(a) + 0.5 * f64::from(n))
                            / f64::from(s.total_tools)
                            * 100.0)
                            .round() as u8;
                        assert_eq!(compliance_score(&s), expected, "{s:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn half_points_round_up() {
        // (0 + 0.5) / 4 * 100 = 12.5
        assert_eq!(compliance_score(&counts(0, 1, 0, 3)), 13);
        // (1 + 0.5) / 4 * 100 = 37.5
        assert_eq!(compliance_score(&counts(1, 1, 2, 0)), 38);
    }

    #[test]
    fn unknown_tools_earn_no_credit() {
        assert_eq!(compliance_score(&counts(0, 0, 0, 5)), 0);
        assert_eq!(compliance_score(&counts(1, 0, 0, 1)), 50);
    }

    #[test]
    fn rejected_forces_red_regardless_of_score() {
        let s = counts(99, 0, 1, 0);
        assert_eq!(compliance_score(&s), 99);
        assert_eq!(overall_status(99, &s), OverallStatus::Red);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let s = counts(1, 0, 0, 0);
        assert_eq!(overall_status(80, &s), OverallStatus::Green);
        assert_eq!(overall_status(79, &s), OverallStatus::Yellow);
        assert_eq!(overall_status(60, &s), OverallStatus::Yellow);
        assert_eq!(overall_status(59, &s), OverallStatus::Red);
    }
}
