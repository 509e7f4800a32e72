pub mod agent;
pub mod consultation;

pub use agent::{AgentSpec, CoordinationGraph, ModelRef};
pub use consultation::{
    AdvisorReports, ConsultationPhase, ConsultationRequest, ConsultationResult, SynthesizedPlan,
};
