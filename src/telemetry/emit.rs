use anyhow::Result;
use serde::Serialize;

use crate::output::config::OutputConfig;
use crate::output::types::Envelope;
use crate::output::Emitter;

pub fn print_plan<T: Serialize>(op: &'static str, plan: &T) -> Result<()> {
    Emitter::from_config(OutputConfig::from_env()).emit(&Envelope::plan(op, plan)?)?;
    Ok(())
}

pub fn print_result<T: Serialize>(op: &'static str, result: &T) -> Result<()> {
    Emitter::from_config(OutputConfig::from_env()).emit(&Envelope::result(op, result)?)?;
    Ok(())
}
