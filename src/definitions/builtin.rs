//! Built-in role definitions for the corporate formation squad.
//!
//! Instruction strings are opaque behavioral contracts for the external
//! model; the coordination algorithm never inspects their wording.

use crate::types::{AgentSpec, CoordinationGraph, ModelRef};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub fn tax_cpa() -> AgentSpec {
    AgentSpec::new(
        "TaxCPA",
        "Expert tax CPA specializing in corporate tax strategy",
        "You are a seasoned tax CPA.\n\
         Analyze how LLC, S-Corp and C-Corp structures are taxed for this business: \
         pass-through versus double taxation, QBI deductions, state tax exposure, \
         payroll and self-employment taxes.\n\
         Give concrete tax impacts and state the trade-offs plainly.",
        ModelRef::from(DEFAULT_MODEL),
    )
}

pub fn corporate_attorney() -> AgentSpec {
    AgentSpec::new(
        "CorporateAttorney",
        "Corporate attorney specializing in business formation and compliance",
        "You are a corporate attorney.\n\
         Assess liability protection, ownership flexibility, operating agreements, \
         annual compliance burden, state registration and funding implications for \
         this business.\n\
         Call out legal risks and the protection mechanisms each structure offers.",
        ModelRef::from(DEFAULT_MODEL),
    )
}

pub fn business_strategist() -> AgentSpec {
    AgentSpec::new(
        "BusinessStrategist",
        "Business consultant focused on formation strategy and growth",
        "You are a business strategist.\n\
         Weigh growth trajectory (bootstrap versus VC), industry regulation, \
         operational complexity, state of formation (Delaware versus home state), \
         employee equity and exit paths for this business.\n\
         Prioritize scalability and practical execution.",
        ModelRef::from(DEFAULT_MODEL),
    )
}

pub fn coordinator() -> AgentSpec {
    AgentSpec::new(
        "FormationCoordinator",
        "Lead consultant coordinating the corporate formation squad",
        "You are the lead consultant for a corporate formation squad. You will \
         receive analyses from the specialists TaxCPA, CorporateAttorney and \
         BusinessStrategist, together with any conflicts already identified \
         between their recommendations.\n\
         Synthesize one unified recommendation. Keep every identified conflict \
         visible as a trade-off. If a specialist's analysis is noted as missing, \
         say so where it weakens the recommendation.\n\n\
         Respond using exactly this format:\n\n\
         **Recommended Structure:** [Entity Type]\n\n\
         **Key Benefits:**\n\
         - [Benefit 1]\n\
         - [Benefit 2]\n\n\
         **Trade-offs:**\n\
         - [Trade-off 1]\n\
         - [Trade-off 2]\n\n\
         **Next Steps:**\n\
         1) [Action 1]\n\
         2) [Action 2]\n\
         3) [Action 3]",
        ModelRef::from(DEFAULT_MODEL),
    )
}

/// The built-in squad: coordinator root with the three specialist leaves.
pub fn squad() -> CoordinationGraph {
    squad_with_model(ModelRef::from(DEFAULT_MODEL))
}

/// Same squad with every role pinned to `model`.
pub fn squad_with_model(model: ModelRef) -> CoordinationGraph {
    CoordinationGraph::new(
        coordinator().with_model(model.clone()),
        vec![
            tax_cpa().with_model(model.clone()),
            corporate_attorney().with_model(model.clone()),
            business_strategist().with_model(model),
        ],
    )
    .expect("built-in squad is a valid graph")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squad_shape() {
        let graph = squad();
        assert_eq!(graph.root().name, "FormationCoordinator");

        let names: Vec<&str> = graph.advisors().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["TaxCPA", "CorporateAttorney", "BusinessStrategist"]);
    }

    #[test]
    fn test_coordinator_instruction_carries_output_contract() {
        let spec = coordinator();
        for header in [
            "**Recommended Structure:**",
            "**Key Benefits:**",
            "**Trade-offs:**",
            "**Next Steps:**",
        ] {
            assert!(spec.instruction.contains(header), "missing {}", header);
        }
    }

    #[test]
    fn test_squad_with_model_pins_every_role() {
        let graph = squad_with_model(ModelRef::from("gemini-2.0-pro"));
        assert_eq!(graph.root().model.as_str(), "gemini-2.0-pro");
        for advisor in graph.advisors() {
            assert_eq!(advisor.model.as_str(), "gemini-2.0-pro");
        }
    }

    #[test]
    fn test_default_model() {
        assert_eq!(tax_cpa().model.as_str(), DEFAULT_MODEL);
    }
}
