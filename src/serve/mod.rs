use anyhow::Result;
use clap::Args;
use tokio::io::{self, AsyncBufRead, AsyncWrite, BufReader};

use crate::config::AppConfig;
use crate::controller::{Controller, Message, Response, Status};
use crate::fetch;
use crate::store::JobStore;
use crate::telemetry::{self};
use crate::telemetry::ops::serve::Phase as ServePhase;

pub mod framing;

use framing::Framing;

/// jobscout serve: answer runtime messages on stdin/stdout
#[derive(Args)]
pub struct ServeCmd {
    #[arg(long, value_enum, default_value_t = Framing::Native)]
    pub framing: Framing,
}

pub async fn run(cfg: &AppConfig, args: ServeCmd) -> Result<()> {
    let log = telemetry::serve();
    let _g = log.root_span_kv([
        ("framing", format!("{:?}", args.framing)),
        ("store", cfg.store_path.display().to_string()),
    ]).entered();

    let client = fetch::client(cfg)?;
    let mut controller = Controller::new(JobStore::new(cfg.store_path.clone()));
    let mut stdin = BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    let totals = serve_stream(args.framing, &client, &mut controller, &mut stdin, &mut stdout).await?;

    log.info("👋 Input closed");
    log.totals(totals.handled, totals.errors);
    Ok(())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub handled: usize,
    pub errors: usize,
}

/// Answer every frame on `input` until EOF. Bad requests get an error
/// response; only I/O failures end the loop early.
pub async fn serve_stream<R, W>(
    mode: Framing,
    client: &reqwest::Client,
    controller: &mut Controller,
    input: &mut R,
    output: &mut W,
) -> Result<Totals>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let log = telemetry::serve();
    let mut totals = Totals::default();

    loop {
        let frame = {
            let _s = log.span(&ServePhase::ReadFrame).entered();
            match mode {
                Framing::Native => framing::read_native(input).await?,
                Framing::Lines => framing::read_line(input).await?,
            }
        };
        let Some(frame) = frame else { break };

        let decoded = { let _s = log.span(&ServePhase::Decode).entered(); serde_json::from_slice::<Message>(&frame) };
        let (action, response) = match decoded {
            Ok(msg) => {
                let action = msg.action();
                (action, dispatch(client, controller, msg).await)
            }
            Err(e) => {
                log.warn_kv("⚠️ malformed message", [("error", e.to_string())]);
                ("?", Response::error(format!("malformed message: {e}")))
            }
        };

        totals.handled += 1;
        if response.status == Status::Error { totals.errors += 1; }
        log.request_summary(action, response.status_str());

        let bytes = serde_json::to_vec(&response)?;
        let _s = log.span(&ServePhase::WriteFrame).entered();
        match mode {
            Framing::Native => framing::write_native(output, &bytes).await?,
            Framing::Lines => framing::write_line(output, &bytes).await?,
        }
    }

    Ok(totals)
}

async fn dispatch(client: &reqwest::Client, controller: &mut Controller, mut msg: Message) -> Response {
    let log = telemetry::serve();
    if let Message::UrlChanged(nav) = &mut msg {
        if nav.html.is_none() {
            let _s = log.span_kv(&ServePhase::Fetch, [("url", nav.url.clone())]).entered();
            match fetch::fetch_page(client, &nav.url).await {
                Ok(html) => nav.html = Some(html),
                Err(e) => {
                    log.error_kv("❌ fetch failed", [("url", nav.url.clone()), ("error", format!("{e:#}"))]);
                    return Response::error(format!("could not load page: {e}"));
                }
            }
        }
    }
    let _s = log.span(&ServePhase::Dispatch).entered();
    let response = controller.handle(msg);
    if let Some(site) = controller.site_name() {
        log.debug_kv("session", [("site", site.to_string()), ("page_type", controller.page_type().as_str().to_string())]);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::time::Duration;

    const POSTING: &str = r#"<html><head><title>Acme - Engineer</title></head><body>
        <div class="posting-headline"><h2>Engineer</h2></div></body></html>"#;

    fn setup() -> (tempfile::TempDir, reqwest::Client, Controller) {
        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::builder().timeout(Duration::from_secs(2)).build().unwrap();
        let controller = Controller::new(JobStore::new(dir.path().join("current_job.json")));
        (dir, client, controller)
    }

    fn responses(out: &[u8]) -> Vec<Value> {
        out.split(|b| *b == b'\n')
            .filter(|l| !l.is_empty())
            .map(|l| serde_json::from_slice(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn bad_lines_get_errors_and_the_loop_continues() {
        let (_dir, client, mut controller) = setup();
        let nav = json!({"action": "urlChanged", "data": {"url": "https://jobs.lever.co/acme/1", "html": POSTING}});
        let mut input: Vec<u8> = Vec::new();
        input.extend_from_slice(b"not json\n\xff\xfe\n");
        input.extend_from_slice(serde_json::to_string(&nav).unwrap().as_bytes());
        input.extend_from_slice(b"\n{\"action\":\"getJobInfo\"}\n");

        let mut reader = BufReader::new(&input[..]);
        let mut out: Vec<u8> = Vec::new();
        let totals = serve_stream(Framing::Lines, &client, &mut controller, &mut reader, &mut out).await.unwrap();

        assert_eq!(totals, Totals { handled: 4, errors: 2 });
        let got = responses(&out);
        assert_eq!(got[0]["status"], "error");
        assert_eq!(got[1]["status"], "error");
        assert_eq!(got[2]["status"], "handled");
        assert_eq!(got[2]["pageType"], "JOB_VIEW");
        assert_eq!(got[3]["jobInfo"]["title"], "Engineer");
    }

    #[tokio::test]
    async fn fetch_failure_leaves_session_alone() {
        let (_dir, client, mut controller) = setup();
        let mut input: Vec<u8> = Vec::new();
        for msg in [
            json!({"action": "urlChanged", "data": {"url": "https://jobs.lever.co/acme/1", "html": POSTING}}),
            json!({"action": "urlChanged", "data": {"url": "http://127.0.0.1:1/unreachable"}}),
            json!({"action": "getJobInfo"}),
        ] {
            framing::write_native(&mut input, &serde_json::to_vec(&msg).unwrap()).await.unwrap();
        }

        let mut reader = BufReader::new(&input[..]);
        let mut out: Vec<u8> = Vec::new();
        let totals = serve_stream(Framing::Native, &client, &mut controller, &mut reader, &mut out).await.unwrap();
        assert_eq!(totals, Totals { handled: 3, errors: 1 });

        let mut r = &out[..];
        let mut got = Vec::new();
        while let Some(frame) = framing::read_native(&mut r).await.unwrap() {
            got.push(serde_json::from_slice::<Value>(&frame).unwrap());
        }
        assert_eq!(got[1]["status"], "error");
        assert!(got[1]["message"].as_str().unwrap().starts_with("could not load page"));
        assert_eq!(controller.site_name(), Some("Lever"));
        assert_eq!(controller.page_type(), crate::sites::PageType::JobView);
        assert_eq!(got[2]["jobInfo"]["title"], "Engineer");
    }

    #[tokio::test]
    async fn empty_native_frame_is_answered() {
        let (_dir, client, mut controller) = setup();
        let mut input = 0u32.to_ne_bytes().to_vec();
        framing::write_native(&mut input, br#"{"action":"isJobSite","data":{"url":"https://jobs.lever.co/a/1"}}"#).await.unwrap();

        let mut reader = BufReader::new(&input[..]);
        let mut out: Vec<u8> = Vec::new();
        let totals = serve_stream(Framing::Native, &client, &mut controller, &mut reader, &mut out).await.unwrap();
        assert_eq!(totals, Totals { handled: 2, errors: 1 });
    }
}
