use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Classify;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Identify, Classify }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Identify => "identify", Phase::Classify => "classify" } }
    fn span(&self) -> Span { match self { Phase::Identify => info_span!("identify"), Phase::Classify => info_span!("classify") } }
}

impl OpMarker for Classify {
    const NAME: &'static str = "classify";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("classify") }
}
