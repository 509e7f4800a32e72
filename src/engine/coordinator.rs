use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::conflict::detect_conflicts;
use crate::engine::merge::{assemble_fallback, harden, merge_reports, parse_plan};
use crate::error::{ConsultError, InvokeError};
use crate::providers::ModelProvider;
use crate::types::{
    AdvisorReports, ConsultationPhase, ConsultationRequest, ConsultationResult, CoordinationGraph,
    SynthesizedPlan,
};

const DEFAULT_ADVISOR_TIMEOUT: Duration = Duration::from_secs(60);

/// Minimum words before the context is considered dispatchable.
const MIN_CONTEXT_WORDS: usize = 5;

/// Fan-out/fan-in coordinator: dispatches one request to every advisor in
/// the graph, reconciles the results, and synthesizes a single plan.
pub struct Coordinator {
    graph: CoordinationGraph,
    provider: Arc<dyn ModelProvider>,
    advisor_timeout: Duration,
}

impl Coordinator {
    pub fn new(graph: CoordinationGraph, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            graph,
            provider,
            advisor_timeout: DEFAULT_ADVISOR_TIMEOUT,
        }
    }

    pub fn with_advisor_timeout(mut self, timeout: Duration) -> Self {
        self.advisor_timeout = timeout;
        self
    }

    pub fn graph(&self) -> &CoordinationGraph {
        &self.graph
    }

    /// Runs one full consultation. Advisor calls run concurrently; a partial
    /// failure degrades the plan, only total failure fails the request.
    pub async fn synthesize(
        &self,
        request: &ConsultationRequest,
    ) -> Result<SynthesizedPlan, ConsultError> {
        let mut phase = ConsultationPhase::AwaitingContext;

        if let Some(question) = clarification_needed(request) {
            // Stays in AwaitingContext; the caller owns the round trip.
            return Err(ConsultError::AmbiguousContext { question });
        }

        phase = self.transition(phase);
        let outcomes = self.dispatch(request).await;

        phase = self.transition(phase);
        let reports = self.collect(outcomes)?;

        phase = self.transition(phase);
        let conflicts = detect_conflicts(&reports);
        let synthesis_input = merge_reports(request, &reports, &conflicts);

        let root = self.graph.root();
        let plan = match self
            .provider
            .invoke(&root.instruction, &root.model, &synthesis_input)
            .await
        {
            Ok(text) => parse_plan(&text).unwrap_or_else(|| {
                log::warn!("synthesis output did not honor the section contract, assembling plan from reports");
                assemble_fallback(&reports, &conflicts)
            }),
            Err(e) => {
                log::warn!("synthesis call failed ({}), assembling plan from reports", e);
                assemble_fallback(&reports, &conflicts)
            }
        };
        let plan = harden(plan, &conflicts, &reports);

        self.transition(phase);
        Ok(plan)
    }

    /// Concurrent fan-out with a per-call deadline. A call still pending at
    /// the deadline is dropped; its result, if any, is discarded.
    async fn dispatch(
        &self,
        request: &ConsultationRequest,
    ) -> Vec<(String, Result<String, InvokeError>)> {
        let calls = self.graph.advisors().iter().map(|advisor| async {
            let outcome = tokio::time::timeout(
                self.advisor_timeout,
                self.provider
                    .invoke(&advisor.instruction, &advisor.model, &request.context),
            )
            .await
            .unwrap_or(Err(InvokeError::Timeout(self.advisor_timeout)));
            (advisor.name.clone(), outcome)
        });

        join_all(calls).await
    }

    fn collect(
        &self,
        outcomes: Vec<(String, Result<String, InvokeError>)>,
    ) -> Result<AdvisorReports, ConsultError> {
        let mut reports = AdvisorReports::new();
        for (role, outcome) in outcomes {
            match outcome {
                Ok(analysis) => reports.record(ConsultationResult { role, analysis }),
                Err(e) => {
                    log::warn!("advisor {} returned no result: {}", role, e);
                    reports.record_missing(role);
                }
            }
        }

        if reports.is_empty() {
            return Err(ConsultError::TotalAdvisorFailure);
        }
        Ok(reports)
    }

    fn transition(&self, phase: ConsultationPhase) -> ConsultationPhase {
        let next = phase.advance();
        log::debug!("consultation phase {} -> {}", phase.as_str(), next.as_str());
        next
    }
}

/// Returns the clarification question to put to the user when the context is
/// too thin to dispatch meaningfully.
fn clarification_needed(request: &ConsultationRequest) -> Option<String> {
    let words = request.context.split_whitespace().count();
    if words == 0 {
        Some("What is your business? Describe what it does, who owns it, and how you plan to fund it.".to_string())
    } else if words < MIN_CONTEXT_WORDS {
        Some(format!(
            "Could you say more about \"{}\"? Ownership, funding plans and expected revenue all change the recommendation.",
            request.context.trim()
        ))
    } else {
        None
    }
}
