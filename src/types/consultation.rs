use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// User-supplied business context, passed unchanged to every advisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub context: String,
}

impl ConsultationRequest {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

/// A single advisor's analysis text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationResult {
    pub role: String,
    pub analysis: String,
}

/// Advisor outputs keyed by role name. Backed by ordered maps so every
/// traversal is sorted by role name, never by arrival order.
#[derive(Debug, Clone, Default)]
pub struct AdvisorReports {
    available: BTreeMap<String, String>,
    missing: BTreeSet<String>,
}

impl AdvisorReports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: ConsultationResult) {
        self.available.insert(result.role, result.analysis);
    }

    pub fn record_missing(&mut self, role: impl Into<String>) {
        self.missing.insert(role.into());
    }

    pub fn available(&self) -> impl Iterator<Item = (&str, &str)> {
        self.available
            .iter()
            .map(|(role, analysis)| (role.as_str(), analysis.as_str()))
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(|role| role.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// The coordinator's final structured recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedPlan {
    pub recommended_structure: String,
    pub benefits: Vec<String>,
    pub trade_offs: Vec<String>,
    pub next_steps: Vec<String>,
}

impl SynthesizedPlan {
    /// One structure, and no empty section lists.
    pub fn is_well_formed(&self) -> bool {
        !self.recommended_structure.trim().is_empty()
            && !self.benefits.is_empty()
            && !self.trade_offs.is_empty()
            && !self.next_steps.is_empty()
    }

    /// Renders the fixed four-section output contract.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "**Recommended Structure:** {}\n\n",
            self.recommended_structure
        ));

        out.push_str("**Key Benefits:**\n");
        for benefit in &self.benefits {
            out.push_str(&format!("- {}\n", benefit));
        }
        out.push('\n');

        out.push_str("**Trade-offs:**\n");
        for trade_off in &self.trade_offs {
            out.push_str(&format!("- {}\n", trade_off));
        }
        out.push('\n');

        out.push_str("**Next Steps:**\n");
        for (i, step) in self.next_steps.iter().enumerate() {
            out.push_str(&format!("{}) {}\n", i + 1, step));
        }

        out
    }
}

/// Linear per-consultation state machine. No backward transitions;
/// `AwaitingContext` repeats externally when clarification is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultationPhase {
    AwaitingContext,
    Dispatching,
    Collecting,
    Synthesizing,
    Done,
}

impl ConsultationPhase {
    pub fn advance(self) -> Self {
        match self {
            ConsultationPhase::AwaitingContext => ConsultationPhase::Dispatching,
            ConsultationPhase::Dispatching => ConsultationPhase::Collecting,
            ConsultationPhase::Collecting => ConsultationPhase::Synthesizing,
            ConsultationPhase::Synthesizing => ConsultationPhase::Done,
            ConsultationPhase::Done => ConsultationPhase::Done,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConsultationPhase::AwaitingContext => "AwaitingContext",
            ConsultationPhase::Dispatching => "Dispatching",
            ConsultationPhase::Collecting => "Collecting",
            ConsultationPhase::Synthesizing => "Synthesizing",
            ConsultationPhase::Done => "Done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_ordered_by_role_name() {
        let mut reports = AdvisorReports::new();
        reports.record(ConsultationResult {
            role: "Zeta".to_string(),
            analysis: "z".to_string(),
        });
        reports.record(ConsultationResult {
            role: "Alpha".to_string(),
            analysis: "a".to_string(),
        });

        let roles: Vec<&str> = reports.available().map(|(role, _)| role).collect();
        assert_eq!(roles, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_render_section_order() {
        let plan = SynthesizedPlan {
            recommended_structure: "LLC".to_string(),
            benefits: vec!["pass-through taxation".to_string()],
            trade_offs: vec!["self-employment tax".to_string()],
            next_steps: vec!["file articles".to_string(), "draft agreement".to_string()],
        };

        let text = plan.render();
        let benefits_at = text.find("**Key Benefits:**").unwrap();
        let trade_offs_at = text.find("**Trade-offs:**").unwrap();
        let steps_at = text.find("**Next Steps:**").unwrap();

        assert!(text.starts_with("**Recommended Structure:** LLC"));
        assert!(benefits_at < trade_offs_at);
        assert!(trade_offs_at < steps_at);
        assert!(text.contains("1) file articles"));
        assert!(text.contains("2) draft agreement"));
    }

    #[test]
    fn test_well_formedness() {
        let plan = SynthesizedPlan {
            recommended_structure: "LLC".to_string(),
            benefits: vec!["b".to_string()],
            trade_offs: vec![],
            next_steps: vec!["s".to_string()],
        };
        assert!(!plan.is_well_formed());
    }

    #[test]
    fn test_phase_machine_is_linear() {
        let mut phase = ConsultationPhase::AwaitingContext;
        let expected = [
            ConsultationPhase::Dispatching,
            ConsultationPhase::Collecting,
            ConsultationPhase::Synthesizing,
            ConsultationPhase::Done,
            ConsultationPhase::Done,
        ];
        for want in expected {
            phase = phase.advance();
            assert_eq!(phase, want);
        }
    }
}
