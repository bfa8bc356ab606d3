//! Letter-grade derivation from raw enrollment scores.
//!
//! The letter grade is a projection of the midterm/final/bonus scores and is
//! recomputed on every write that touches one of them; callers can never set
//! it directly. Scores are on a 0–10 scale.

use std::env;

/// Ordered threshold table mapping a raw score to a letter.
///
/// Bands are checked top-down; the first threshold the score meets wins, and
/// anything below the lowest band is an F. The default table can be replaced
/// through the `GRADE_SCALE` environment variable using the form
/// `9.7:A+,9.3:A,9.0:A-,...`.
#[derive(Clone, Debug)]
pub struct GradeScale {
    bands: Vec<(f64, String)>,
}

impl Default for GradeScale {
    fn default() -> Self {
        let bands = [
            (9.7, "A+"),
            (9.3, "A"),
            (9.0, "A-"),
            (8.7, "B+"),
            (8.3, "B"),
            (8.0, "B-"),
            (7.7, "C+"),
            (7.3, "C"),
            (7.0, "C-"),
            (6.7, "D+"),
            (6.3, "D"),
            (6.0, "D-"),
        ];
        Self {
            bands: bands
                .iter()
                .map(|(threshold, letter)| (*threshold, letter.to_string()))
                .collect(),
        }
    }
}

impl GradeScale {
    pub fn from_env() -> Self {
        match env::var("GRADE_SCALE") {
            Ok(raw) => Self::parse(&raw).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Parse a `threshold:letter` comma list. Returns `None` on any malformed
    /// entry rather than running with a partial table.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut bands = Vec::new();
        for entry in raw.split(',') {
            let (threshold, letter) = entry.trim().split_once(':')?;
            let threshold: f64 = threshold.trim().parse().ok()?;
            let letter = letter.trim();
            if letter.is_empty() {
                return None;
            }
            bands.push((threshold, letter.to_string()));
        }
        if bands.is_empty() {
            return None;
        }
        // Highest threshold first, regardless of input order.
        bands.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Some(Self { bands })
    }

    pub fn letter_for(&self, raw: f64) -> String {
        for (threshold, letter) in &self.bands {
            if raw >= *threshold {
                return letter.clone();
            }
        }
        "F".to_string()
    }
}

/// A materialized grade: the weighted raw score and its letter.
#[derive(Clone, Debug, PartialEq)]
pub struct Grade {
    pub raw: f64,
    pub letter: String,
}

/// Compute the derived grade, or `None` when no score is present.
///
/// `raw = 0.4 * midterm + 0.6 * final + bonus`, with absent midterm/final
/// contributing 0, clamped to [0, 10]. A grade exists as soon as any of the
/// three scores does; bonus alone is enough.
pub fn compute_grade(
    scale: &GradeScale,
    midterm: Option<f64>,
    final_score: Option<f64>,
    bonus: Option<f64>,
) -> Option<Grade> {
    if midterm.is_none() && final_score.is_none() && bonus.is_none() {
        return None;
    }

    let raw = 0.4 * midterm.unwrap_or(0.0) + 0.6 * final_score.unwrap_or(0.0) + bonus.unwrap_or(0.0);
    let raw = raw.clamp(0.0, 10.0);

    Some(Grade {
        raw,
        letter: scale.letter_for(raw),
    })
}

/// Quality points per letter, used by the GPA report. Unknown letters are
/// excluded from GPA rather than counted as zero.
pub fn grade_points(letter: &str) -> Option<f64> {
    let points = match letter {
        "A+" | "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "C-" => 1.7,
        "D+" => 1.3,
        "D" => 1.0,
        "D-" => 0.7,
        "F" => 0.0,
        _ => return None,
    };
    Some(points)
}

/// Display ordering for letter histograms (best grade first).
pub fn letter_order(letter: &str) -> usize {
    const ORDER: [&str; 13] = [
        "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
    ];
    ORDER
        .iter()
        .position(|known| *known == letter)
        .unwrap_or(ORDER.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_scores_means_no_grade() {
        let scale = GradeScale::default();
        assert_eq!(compute_grade(&scale, None, None, None), None);
    }

    #[test]
    fn weighted_sum_with_bonus() {
        let scale = GradeScale::default();
        let grade = compute_grade(&scale, Some(8.0), Some(9.0), Some(1.0)).unwrap();
        assert!((grade.raw - 9.6).abs() < 1e-9);
        assert_eq!(grade.letter, "A");
    }

    #[test]
    fn bonus_can_push_past_the_cap() {
        let scale = GradeScale::default();
        let grade = compute_grade(&scale, Some(9.0), Some(10.0), Some(2.0)).unwrap();
        assert_eq!(grade.raw, 10.0);
        assert_eq!(grade.letter, "A+");
    }

    #[test]
    fn missing_scores_count_as_zero() {
        let scale = GradeScale::default();
        let grade = compute_grade(&scale, None, Some(10.0), None).unwrap();
        assert!((grade.raw - 6.0).abs() < 1e-9);
        assert_eq!(grade.letter, "D-");
    }

    #[test]
    fn bonus_alone_materializes_a_grade() {
        let scale = GradeScale::default();
        let grade = compute_grade(&scale, None, None, Some(1.5)).unwrap();
        assert!((grade.raw - 1.5).abs() < 1e-9);
        assert_eq!(grade.letter, "F");
    }

    #[test]
    fn custom_scale_parses_and_sorts() {
        let scale = GradeScale::parse("6:D, 9:A, 8:B, 7:C").unwrap();
        assert_eq!(scale.letter_for(9.6), "A");
        assert_eq!(scale.letter_for(8.0), "B");
        assert_eq!(scale.letter_for(5.9), "F");
    }

    #[test]
    fn malformed_scale_is_rejected() {
        assert!(GradeScale::parse("9.0-A").is_none());
        assert!(GradeScale::parse("x:A").is_none());
        assert!(GradeScale::parse("").is_none());
    }
}
