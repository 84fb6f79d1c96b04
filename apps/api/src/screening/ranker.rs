use crate::models::evaluation::{EvaluationResult, PercentageMatch, RankedEntry};

/// Orders results by match percentage, highest first.
///
/// Results without a percentage count as 0. The sort is stable, so ties keep
/// their input order.
pub fn rank(results: &[EvaluationResult]) -> Vec<RankedEntry> {
    let mut scored: Vec<(&EvaluationResult, PercentageMatch)> = results
        .iter()
        .map(|r| (r, r.match_percentage.unwrap_or(PercentageMatch::Missing)))
        .collect();

    scored.sort_by(|a, b| b.1.score().cmp(&a.1.score()));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (result, percentage))| RankedEntry {
            rank: i + 1,
            label: result.label.clone(),
            percentage: percentage.score(),
            parsed: matches!(percentage, PercentageMatch::Parsed(_)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::export_file_name;

    fn result(label: &str, percentage: Option<PercentageMatch>) -> EvaluationResult {
        EvaluationResult {
            label: label.to_string(),
            file_name: format!("{label}.pdf"),
            response_text: String::new(),
            match_percentage: percentage,
            export_file_name: export_file_name(label),
        }
    }

    fn labels(ranked: &[RankedEntry]) -> Vec<&str> {
        ranked.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_rank_descending() {
        let ranked = rank(&[
            result("A", Some(PercentageMatch::Parsed(42))),
            result("B", Some(PercentageMatch::Parsed(87))),
            result("C", Some(PercentageMatch::Parsed(0))),
        ]);
        assert_eq!(labels(&ranked), vec!["B", "A", "C"]);
        assert_eq!(
            ranked.iter().map(|r| r.percentage).collect::<Vec<_>>(),
            vec![87, 42, 0]
        );
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(&[
            result("first", Some(PercentageMatch::Parsed(50))),
            result("second", Some(PercentageMatch::Parsed(70))),
            result("third", Some(PercentageMatch::Parsed(50))),
        ]);
        assert_eq!(labels(&ranked), vec!["second", "first", "third"]);
    }

    #[test]
    fn test_missing_ranks_as_zero_but_flagged() {
        let ranked = rank(&[
            result("unparsed", Some(PercentageMatch::Missing)),
            result("none", None),
            result("scored", Some(PercentageMatch::Parsed(10))),
        ]);
        assert_eq!(labels(&ranked), vec!["scored", "unparsed", "none"]);
        assert_eq!(ranked[1].percentage, 0);
        assert!(!ranked[1].parsed);
        assert!(ranked[0].parsed);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[]).is_empty());
    }
}
