pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

// Factory helpers, one per operation
pub fn classify() -> LogCtx<ops::classify::Classify> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn scan() -> LogCtx<ops::scan::Scan> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn sites() -> LogCtx<ops::sites::Sites> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn current() -> LogCtx<ops::current::Current> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn serve() -> LogCtx<ops::serve::Serve> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn extract() -> LogCtx<ops::extract::Extract> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn controller() -> LogCtx<ops::controller::Controller> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
