use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "jobscout.v1";

/// One CLI answer on stdout. Plan-only runs carry `plan`; `--apply` runs and
/// read-only commands carry `result`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub jobscout_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    pub apply: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Envelope {
    fn new(op: &'static str, apply: bool) -> Self {
        Envelope {
            schema_version: SCHEMA_VERSION,
            jobscout_version: env!("CARGO_PKG_VERSION"),
            time: Utc::now(),
            request_id: Uuid::new_v4(),
            op,
            apply,
            plan: None,
            result: None,
        }
    }

    pub fn plan<T: Serialize>(op: &'static str, plan: &T) -> Result<Self, serde_json::Error> {
        Ok(Envelope { plan: Some(serde_json::to_value(plan)?), ..Envelope::new(op, false) })
    }

    pub fn result<T: Serialize>(op: &'static str, result: &T) -> Result<Self, serde_json::Error> {
        Ok(Envelope { result: Some(serde_json::to_value(result)?), ..Envelope::new(op, true) })
    }
}
