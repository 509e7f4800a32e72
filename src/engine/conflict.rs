//! Deterministic reconciliation over free-text advisor recommendations.
//!
//! The advisors return prose; reconciliation here is a fixed comparison rule,
//! not model judgment: extract each advisor's recommended entity type and
//! flag every pair that disagrees. The synthesis call may add further
//! trade-offs but can never remove these.

use regex::Regex;

use crate::types::AdvisorReports;

/// Canonical entity types with the patterns that match them in prose.
const ENTITY_PATTERNS: &[(&str, &str)] = &[
    ("S-Corp", r"(?i)\bS[- ]?Corp(oration)?\b"),
    ("C-Corp", r"(?i)\bC[- ]?Corp(oration)?\b"),
    ("LLC", r"(?i)\b(LLC|limited liability company)\b"),
    ("Sole Proprietorship", r"(?i)\bsole proprietor(ship)?\b"),
    ("Partnership", r"(?i)\b(general |limited )?partnership\b"),
];

/// Two advisors recommending incompatible entity types on the same axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub first_role: String,
    pub first_entity: String,
    pub second_role: String,
    pub second_entity: String,
}

impl Conflict {
    pub fn describe(&self) -> String {
        format!(
            "{} favors {} while {} favors {}; committing to one forgoes the other's advantages",
            self.first_role, self.first_entity, self.second_role, self.second_entity
        )
    }
}

fn first_entity_in(text: &str) -> Option<&'static str> {
    let mut best: Option<(usize, &'static str)> = None;
    for (name, pattern) in ENTITY_PATTERNS {
        let re = Regex::new(pattern).unwrap();
        if let Some(m) = re.find(text) {
            match best {
                Some((offset, _)) if offset <= m.start() => {}
                _ => best = Some((m.start(), name)),
            }
        }
    }
    best.map(|(_, name)| name)
}

/// Extracts the entity type an analysis recommends: the first entity named in
/// a sentence containing "recommend", falling back to the first entity
/// mentioned anywhere.
pub fn recommended_entity(analysis: &str) -> Option<String> {
    for sentence in analysis.split(['.', '\n']) {
        if sentence.to_lowercase().contains("recommend") {
            if let Some(entity) = first_entity_in(sentence) {
                return Some(entity.to_string());
            }
        }
    }
    first_entity_in(analysis).map(|e| e.to_string())
}

/// Pairwise comparison of recommended entity types across available reports.
/// Traversal is by role name, so arrival order never changes the result.
pub fn detect_conflicts(reports: &AdvisorReports) -> Vec<Conflict> {
    let recommendations: Vec<(String, String)> = reports
        .available()
        .filter_map(|(role, analysis)| {
            recommended_entity(analysis).map(|entity| (role.to_string(), entity))
        })
        .collect();

    let mut conflicts = Vec::new();
    for i in 0..recommendations.len() {
        for j in (i + 1)..recommendations.len() {
            let (first_role, first_entity) = &recommendations[i];
            let (second_role, second_entity) = &recommendations[j];
            if first_entity != second_entity {
                conflicts.push(Conflict {
                    first_role: first_role.clone(),
                    first_entity: first_entity.clone(),
                    second_role: second_role.clone(),
                    second_entity: second_entity.clone(),
                });
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConsultationResult;

    fn reports_from(pairs: &[(&str, &str)]) -> AdvisorReports {
        let mut reports = AdvisorReports::new();
        for (role, analysis) in pairs {
            reports.record(ConsultationResult {
                role: role.to_string(),
                analysis: analysis.to_string(),
            });
        }
        reports
    }

    #[test]
    fn test_recommended_entity_prefers_recommend_sentence() {
        let analysis =
            "A C-Corp has drawbacks for small firms. I recommend an S-Corp for tax efficiency.";
        assert_eq!(recommended_entity(analysis), Some("S-Corp".to_string()));
    }

    #[test]
    fn test_recommended_entity_falls_back_to_first_mention() {
        let analysis = "An LLC keeps compliance light. A partnership is also possible.";
        assert_eq!(recommended_entity(analysis), Some("LLC".to_string()));
    }

    #[test]
    fn test_recommended_entity_none_without_entities() {
        assert_eq!(recommended_entity("Revenue projections look strong."), None);
    }

    #[test]
    fn test_entity_variants_match() {
        assert_eq!(
            recommended_entity("We recommend an S Corporation here."),
            Some("S-Corp".to_string())
        );
        assert_eq!(
            recommended_entity("A limited liability company fits."),
            Some("LLC".to_string())
        );
    }

    #[test]
    fn test_detects_differing_recommendations() {
        let reports = reports_from(&[
            ("TaxCPA", "I recommend an S-Corp for tax efficiency."),
            ("BusinessStrategist", "I recommend a C-Corp for VC fundraising."),
        ]);

        let conflicts = detect_conflicts(&reports);
        assert_eq!(conflicts.len(), 1);
        let text = conflicts[0].describe();
        assert!(text.contains("S-Corp"));
        assert!(text.contains("C-Corp"));
    }

    #[test]
    fn test_no_conflict_when_aligned() {
        let reports = reports_from(&[
            ("TaxCPA", "I recommend an LLC."),
            ("CorporateAttorney", "An LLC gives solid liability protection."),
        ]);
        assert!(detect_conflicts(&reports).is_empty());
    }

    #[test]
    fn test_conflicts_independent_of_insertion_order() {
        let forward = reports_from(&[
            ("TaxCPA", "I recommend an S-Corp."),
            ("BusinessStrategist", "I recommend a C-Corp."),
        ]);
        let reversed = reports_from(&[
            ("BusinessStrategist", "I recommend a C-Corp."),
            ("TaxCPA", "I recommend an S-Corp."),
        ]);
        assert_eq!(detect_conflicts(&forward), detect_conflicts(&reversed));
    }
}
