use anyhow::Result;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{debug, error, info, warn, Span};

use super::emit;

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

/// Logging handle for one operation. JSON logs carry `op` and the key/value
/// details as fields; text logs append the details to the message.
pub struct LogCtx<O: OpMarker> {
    pub(crate) json: bool,
    pub(crate) _marker: PhantomData<O>,
}

// One event at a fixed level; tracing needs the level at the call site.
macro_rules! kv_event {
    ($level:ident, $ctx:expr, $msg:expr, $kv:expr) => {{
        let (op, json, msg) = ($ctx.op_name(), $ctx.json, $msg);
        let details = kv_to_string($kv);
        match (json, details.is_empty()) {
            (true, true) => $level!(op = %op, "{}", msg),
            (true, false) => $level!(op = %op, details = %details, "{}", msg),
            (false, true) => $level!("{}", msg),
            (false, false) => $level!("{} ({})", msg, details),
        }
    }};
}

impl<O: OpMarker> LogCtx<O> {
    fn op_name(&self) -> &'static str { O::NAME }

    pub fn root_span(&self) -> Span { O::root_span() }

    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.root_span();
        let details = kv_to_string(fields);
        if details.is_empty() { info!(op = %self.op_name(), "start"); }
        else { info!(op = %self.op_name(), details = %details, "start"); }
        span
    }

    pub fn span(&self, ph: &O::Phase) -> Span { ph.span() }

    pub fn span_kv<'a, T>(&self, ph: &O::Phase, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let details = kv_to_string(fields);
        debug!(op = %self.op_name(), phase = ph.name(), details = %details, "span_start");
        ph.span()
    }

    pub fn info(&self, msg: impl AsRef<str>) { kv_event!(info, self, msg.as_ref(), None::<(&str, String)>) }
    pub fn warn(&self, msg: impl AsRef<str>) { kv_event!(warn, self, msg.as_ref(), None::<(&str, String)>) }

    pub fn info_kv<'a, D: IntoIterator<Item = (&'a str, String)>>(&self, msg: &str, kv: D) { kv_event!(info, self, msg, kv) }
    pub fn debug_kv<'a, D: IntoIterator<Item = (&'a str, String)>>(&self, msg: &str, kv: D) { kv_event!(debug, self, msg, kv) }
    pub fn warn_kv<'a, D: IntoIterator<Item = (&'a str, String)>>(&self, msg: &str, kv: D) { kv_event!(warn, self, msg, kv) }
    pub fn error_kv<'a, D: IntoIterator<Item = (&'a str, String)>>(&self, msg: &str, kv: D) { kv_event!(error, self, msg, kv) }

    pub fn plan<T: Serialize>(&self, plan: &T) -> Result<()> { emit::print_plan(self.op_name(), plan) }
    pub fn result<T: Serialize>(&self, result: &T) -> Result<()> { emit::print_result(self.op_name(), result) }
}

impl LogCtx<crate::telemetry::ops::serve::Serve> {
    pub fn request_summary(&self, action: &str, status: &str) {
        if self.json { info!(op = %self.op_name(), action, status, "request"); }
        else { info!("📨 {} → {}", action, status); }
    }

    pub fn totals(&self, handled: usize, errors: usize) {
        if self.json { info!(op = %self.op_name(), handled, errors, "serve_totals"); }
        else { info!("📊 Host totals: handled={} errors={}", handled, errors); }
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    kv.into_iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(" ")
}
