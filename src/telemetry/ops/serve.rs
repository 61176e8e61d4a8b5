use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Serve;

#[derive(Copy, Clone, Debug)]
pub enum Phase { ReadFrame, Decode, Fetch, Dispatch, WriteFrame }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::ReadFrame => "read_frame",
        Phase::Decode => "decode",
        Phase::Fetch => "fetch",
        Phase::Dispatch => "dispatch",
        Phase::WriteFrame => "write_frame",
    }}
    fn span(&self) -> Span { match self {
        Phase::ReadFrame => info_span!("read_frame"),
        Phase::Decode => info_span!("decode"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Dispatch => info_span!("dispatch"),
        Phase::WriteFrame => info_span!("write_frame"),
    }}
}

impl OpMarker for Serve {
    const NAME: &'static str = "serve";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("serve") }
}
