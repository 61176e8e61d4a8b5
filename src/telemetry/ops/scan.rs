use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Scan;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Load, Identify, Classify, Extract, Persist }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Load => "load",
        Phase::Identify => "identify",
        Phase::Classify => "classify",
        Phase::Extract => "extract",
        Phase::Persist => "persist",
    }}
    fn span(&self) -> Span { match self {
        Phase::Load => info_span!("load"),
        Phase::Identify => info_span!("identify"),
        Phase::Classify => info_span!("classify"),
        Phase::Extract => info_span!("extract"),
        Phase::Persist => info_span!("persist"),
    }}
}

impl OpMarker for Scan {
    const NAME: &'static str = "scan";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("scan") }
}
