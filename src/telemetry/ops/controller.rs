use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Controller;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Detect, Classify, Parse, Persist, Message }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Detect => "detect",
        Phase::Classify => "classify",
        Phase::Parse => "parse",
        Phase::Persist => "persist",
        Phase::Message => "message",
    }}
    fn span(&self) -> Span { match self {
        Phase::Detect => info_span!("detect"),
        Phase::Classify => info_span!("classify"),
        Phase::Parse => info_span!("parse"),
        Phase::Persist => info_span!("persist"),
        Phase::Message => info_span!("message"),
    }}
}

impl OpMarker for Controller {
    const NAME: &'static str = "controller";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("controller") }
}
