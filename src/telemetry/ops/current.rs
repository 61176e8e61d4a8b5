use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Current;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, Load, Clear }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::Load => "load",
        Phase::Clear => "clear",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::Load => info_span!("load"),
        Phase::Clear => info_span!("clear"),
    }}
}

impl OpMarker for Current {
    const NAME: &'static str = "current";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("current") }
}
