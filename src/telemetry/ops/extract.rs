use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Extract;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Title, Company, Description, Location, FormFields }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Title => "title",
        Phase::Company => "company",
        Phase::Description => "description",
        Phase::Location => "location",
        Phase::FormFields => "form_fields",
    }}
    fn span(&self) -> Span { match self {
        Phase::Title => info_span!("title"),
        Phase::Company => info_span!("company"),
        Phase::Description => info_span!("description"),
        Phase::Location => info_span!("location"),
        Phase::FormFields => info_span!("form_fields"),
    }}
}

impl OpMarker for Extract {
    const NAME: &'static str = "extract";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("extract") }
}
