use serde::{Deserialize, Serialize};

/// Fixed 4-tier rubric. The texts are the product defaults; no custom
/// editing surface exists, so every scored assignment carries these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRubric {
    pub exceed: String,
    pub meet: String,
    pub approach: String,
    pub notmeet: String,
}

impl Default for ScoringRubric {
    fn default() -> Self {
        Self {
            exceed: "Exceeds expectations".to_string(),
            meet: "Meets expectations".to_string(),
            approach: "Approaching expectations".to_string(),
            notmeet: "Does not meet expectations".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rubric_has_four_tiers() {
        let rubric = ScoringRubric::default();
        assert_eq!(rubric.exceed, "Exceeds expectations");
        assert_eq!(rubric.notmeet, "Does not meet expectations");

        let raw = serde_json::to_string(&rubric).expect("serialize");
        let back: ScoringRubric = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(back, rubric);
    }
}
