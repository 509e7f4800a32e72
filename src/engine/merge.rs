//! Order-independent report merging, synthesis-output parsing, and the
//! deterministic fallback plan assembler.

use std::collections::BTreeMap;

use crate::engine::conflict::{recommended_entity, Conflict};
use crate::types::{AdvisorReports, ConsultationRequest, SynthesizedPlan};

const STRUCTURE_HEADER: &str = "**Recommended Structure:**";
const BENEFITS_HEADER: &str = "**Key Benefits:**";
const TRADE_OFFS_HEADER: &str = "**Trade-offs:**";
const NEXT_STEPS_HEADER: &str = "**Next Steps:**";

/// Builds the synthesis input from the collected reports. Reports are
/// traversed by role name, so any arrival order produces identical input.
pub fn merge_reports(
    request: &ConsultationRequest,
    reports: &AdvisorReports,
    conflicts: &[Conflict],
) -> String {
    let mut input = String::new();
    input.push_str("Business context:\n");
    input.push_str(request.context.trim());
    input.push_str("\n\n");

    for (role, analysis) in reports.available() {
        input.push_str(&format!("## {} analysis\n{}\n\n", role, analysis.trim()));
    }

    if !conflicts.is_empty() {
        input.push_str("Identified conflicts:\n");
        for conflict in conflicts {
            input.push_str(&format!("- {}\n", conflict.describe()));
        }
        input.push('\n');
    }

    if reports.has_missing() {
        input.push_str("Missing perspectives (no analysis returned):\n");
        for role in reports.missing() {
            input.push_str(&format!("- {}\n", role));
        }
    }

    input
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Benefits,
    TradeOffs,
    NextSteps,
}

/// Parses the model's synthesis output against the four-section contract.
/// Returns `None` when a section is missing or empty, which routes the
/// caller to the deterministic assembler.
pub fn parse_plan(text: &str) -> Option<SynthesizedPlan> {
    let mut recommended_structure = None;
    let mut benefits = Vec::new();
    let mut trade_offs = Vec::new();
    let mut next_steps = Vec::new();
    let mut section = Section::None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(STRUCTURE_HEADER) {
            let rest = rest.trim();
            if !rest.is_empty() {
                recommended_structure = Some(rest.to_string());
            }
            section = Section::None;
        } else if line.starts_with(BENEFITS_HEADER) {
            section = Section::Benefits;
        } else if line.starts_with(TRADE_OFFS_HEADER) {
            section = Section::TradeOffs;
        } else if line.starts_with(NEXT_STEPS_HEADER) {
            section = Section::NextSteps;
        } else if let Some(item) = bullet_item(line) {
            match section {
                Section::Benefits => benefits.push(item),
                Section::TradeOffs => trade_offs.push(item),
                Section::NextSteps => next_steps.push(item),
                Section::None => {}
            }
        } else if section == Section::NextSteps {
            if let Some(item) = numbered_item(line) {
                next_steps.push(item);
            }
        }
    }

    let plan = SynthesizedPlan {
        recommended_structure: recommended_structure?,
        benefits,
        trade_offs,
        next_steps,
    };
    plan.is_well_formed().then_some(plan)
}

fn bullet_item(line: &str) -> Option<String> {
    let item = line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))?;
    let item = item.trim();
    (!item.is_empty()).then(|| item.to_string())
}

fn numbered_item(line: &str) -> Option<String> {
    let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let rest = line[digits.len()..]
        .strip_prefix(')')
        .or_else(|| line[digits.len()..].strip_prefix('.'))?;
    let item = rest.trim();
    (!item.is_empty()).then(|| item.to_string())
}

/// Builds a plan directly from the advisor reports when the synthesis call
/// fails or its output does not honor the section contract. Fully
/// deterministic for a given set of reports.
pub fn assemble_fallback(reports: &AdvisorReports, conflicts: &[Conflict]) -> SynthesizedPlan {
    let mut votes: BTreeMap<String, usize> = BTreeMap::new();
    for (_, analysis) in reports.available() {
        if let Some(entity) = recommended_entity(analysis) {
            *votes.entry(entity).or_insert(0) += 1;
        }
    }
    // BTreeMap iteration breaks count ties toward the lexicographically
    // smaller entity name.
    let mut best: Option<(String, usize)> = None;
    for (entity, count) in votes {
        match &best {
            Some((_, best_count)) if *best_count >= count => {}
            _ => best = Some((entity, count)),
        }
    }
    let recommended_structure = best
        .map(|(entity, _)| entity)
        .unwrap_or_else(|| "Undetermined pending further consultation".to_string());

    let benefits: Vec<String> = reports
        .available()
        .filter_map(|(role, analysis)| {
            analysis
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(|line| {
                    let line = line.trim_start_matches(['-', '*']).trim();
                    format!("{}: {}", role, line)
                })
        })
        .collect();

    let mut trade_offs: Vec<String> = conflicts.iter().map(Conflict::describe).collect();
    if trade_offs.is_empty() {
        trade_offs.push(
            "No material conflicts were surfaced between the advisors' recommendations"
                .to_string(),
        );
    }

    let next_steps = vec![
        "Validate the recommended structure with licensed counsel in your state".to_string(),
        "File the formation documents and register with the chosen state".to_string(),
        "Set up tax elections, accounts and compliance calendar".to_string(),
    ];

    SynthesizedPlan {
        recommended_structure,
        benefits,
        trade_offs,
        next_steps,
    }
}

/// Enforces plan invariants after synthesis: every detected conflict appears
/// in the trade-offs, and every missing perspective is flagged.
pub fn harden(
    mut plan: SynthesizedPlan,
    conflicts: &[Conflict],
    reports: &AdvisorReports,
) -> SynthesizedPlan {
    for conflict in conflicts {
        let covered = plan.trade_offs.iter().any(|t| {
            t.contains(&conflict.first_entity) && t.contains(&conflict.second_entity)
        });
        if !covered {
            plan.trade_offs.push(conflict.describe());
        }
    }

    for role in reports.missing() {
        let flagged = plan.trade_offs.iter().any(|t| t.contains(role));
        if !flagged {
            plan.trade_offs.push(format!(
                "Reduced confidence: the {} perspective was unavailable for this plan",
                role
            ));
        }
    }

    plan
}
