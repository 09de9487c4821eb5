//! Decision text classification.
//!
//! The analysis endpoint returns a free-text verdict (Spanish sentences). The
//! UI only needs a coarse severity grade, derived by substring-matching the
//! uppercased text against known phrases. The rule order is load-bearing:
//! "MUY BUENO" must run before "BUENO", and "ACEPTABLE" before the rescale
//! phrases. Keep the list ordered; never turn it into a map.

/// Coarse severity grading derived from the endpoint's decision text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionCategory {
    Perfect,
    VeryGood,
    Good,
    Acceptable,
    Rescale,
    Pending,
}

impl DecisionCategory {
    /// Stable style identifier for the banner. Exactly one applies at a time
    /// because the category is recomputed from the text on every change.
    pub fn style_class(self) -> &'static str {
        match self {
            Self::Perfect => "decision-perfect",
            Self::VeryGood => "decision-very-good",
            Self::Good => "decision-good",
            Self::Acceptable => "decision-acceptable",
            Self::Rescale => "decision-rescale",
            Self::Pending => "decision-pending",
        }
    }
}

/// Ordered classification rules; the first rule with a matching phrase wins.
const RULES: &[(&[&str], DecisionCategory)] = &[
    (&["PERFECTO"], DecisionCategory::Perfect),
    (&["MUY BUENO"], DecisionCategory::VeryGood),
    (&["BUENO"], DecisionCategory::Good),
    (&["ACEPTABLE"], DecisionCategory::Acceptable),
    (
        &["NO ACEPTABLE", "REESCALAR", "NO ENTRA"],
        DecisionCategory::Rescale,
    ),
];

/// Classify a decision text. Absent or blank text grades as `Pending`.
pub fn classify(text: Option<&str>) -> DecisionCategory {
    let Some(text) = text else {
        return DecisionCategory::Pending;
    };
    if text.trim().is_empty() {
        return DecisionCategory::Pending;
    }
    let upper = text.to_uppercase();
    for (phrases, category) in RULES {
        if phrases.iter().any(|phrase| upper.contains(phrase)) {
            return *category;
        }
    }
    DecisionCategory::Pending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muy_bueno_wins_over_bueno() {
        let text = "MUY BUENO. El cálculo está lo suficiente en régimen cuasi-estático.";
        assert_eq!(classify(Some(text)), DecisionCategory::VeryGood);
    }

    #[test]
    fn bueno_alone_grades_good() {
        assert_eq!(
            classify(Some("BUENO. El cálculo está en régimen cuasi-estático.")),
            DecisionCategory::Good
        );
    }

    #[test]
    fn perfecto_grades_perfect() {
        assert_eq!(
            classify(Some("PERFECTO. El cálculo está completamente en régimen cuasi-estático.")),
            DecisionCategory::Perfect
        );
    }

    #[test]
    fn no_aceptable_sentence_hits_acceptable_rule_first() {
        // The rescale phrases overlap with "ACEPTABLE"; the ordered cascade
        // resolves the overlap in favor of the earlier rule.
        let text = "NO ACEPTABLE (Condición inicial no cumplida). REESCALAR TIEMPO Y MASA.";
        assert_eq!(classify(Some(text)), DecisionCategory::Acceptable);
    }

    #[test]
    fn rescale_phrases_without_aceptable_grade_rescale() {
        let text = "CÁLCULO NO ENTRA EN RÉGIMEN CUASI-ESTÁTICO NUNCA. REESCALAR TIEMPO Y MASA.";
        assert_eq!(classify(Some(text)), DecisionCategory::Rescale);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify(Some("muy bueno")), DecisionCategory::VeryGood);
        assert_eq!(classify(Some("Perfecto")), DecisionCategory::Perfect);
    }

    #[test]
    fn absent_or_blank_text_is_pending() {
        assert_eq!(classify(None), DecisionCategory::Pending);
        assert_eq!(classify(Some("")), DecisionCategory::Pending);
        assert_eq!(classify(Some("   ")), DecisionCategory::Pending);
        assert_eq!(classify(Some("sin categoría")), DecisionCategory::Pending);
    }

    #[test]
    fn style_classes_are_distinct() {
        let categories = [
            DecisionCategory::Perfect,
            DecisionCategory::VeryGood,
            DecisionCategory::Good,
            DecisionCategory::Acceptable,
            DecisionCategory::Rescale,
            DecisionCategory::Pending,
        ];
        for (i, a) in categories.iter().enumerate() {
            for b in &categories[i + 1..] {
                assert_ne!(a.style_class(), b.style_class());
            }
        }
    }

    #[test]
    fn repeated_classification_is_stable() {
        let text = Some("MUY BUENO");
        assert_eq!(classify(text), classify(text));
    }
}
