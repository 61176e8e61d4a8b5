use std::io::{self, Write};

use serde_json::Value;

use super::config::{OutputConfig, OutputFormat};
use super::types::Envelope;

pub trait Presenter: Send + Sync {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()>;
}

pub struct JsonPresenter { pub pretty: bool }
impl Presenter for JsonPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        if self.pretty { serde_json::to_writer_pretty(&mut *w, env).map_err(to_io)? } else { serde_json::to_writer(&mut *w, env).map_err(to_io)? }
        writeln!(w)
    }
}

pub struct TextPresenter { pub pretty: bool }
impl Presenter for TextPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        let (label, body) = if env.apply { ("Result", &env.result) } else { ("Plan", &env.plan) };
        writeln!(w, "{}: {}", label, env.op)?;
        let Some(body) = body else { return Ok(()) };
        if self.pretty {
            serde_json::to_writer_pretty(&mut *w, body).map_err(to_io)?;
            return writeln!(w);
        }
        write_fields(w, body, 1)
    }
}

// key: value lines; nested objects indent, arrays of scalars join with ", "
fn write_fields(w: &mut dyn Write, v: &Value, depth: usize) -> io::Result<()> {
    let pad = "  ".repeat(depth);
    match v {
        Value::Object(map) => {
            for (k, val) in map {
                match val {
                    Value::Object(_) => { writeln!(w, "{pad}{k}:")?; write_fields(w, val, depth + 1)?; }
                    Value::Array(items) if items.iter().any(|i| i.is_object()) => {
                        writeln!(w, "{pad}{k}:")?;
                        for item in items { write_fields(w, item, depth + 1)?; writeln!(w)?; }
                    }
                    _ => writeln!(w, "{pad}{k}: {}", scalar(val))?,
                }
            }
            Ok(())
        }
        other => writeln!(w, "{pad}{}", scalar(other)),
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::Null => "-".to_string(),
        Value::String(s) => s.replace('\n', " | "),
        Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

pub struct Emitter {
    presenter: Box<dyn Presenter>,
}

impl Emitter {
    pub fn from_config(cfg: OutputConfig) -> Self {
        let presenter: Box<dyn Presenter> = match cfg.format {
            OutputFormat::Json => Box::new(JsonPresenter { pretty: cfg.pretty }),
            OutputFormat::Text => Box::new(TextPresenter { pretty: cfg.pretty }),
        };
        Emitter { presenter }
    }

    pub fn emit(&self, env: &Envelope) -> io::Result<()> {
        let mut out = io::stdout();
        self.presenter.emit(env, &mut out)?;
        out.flush()
    }
}

fn to_io(e: serde_json::Error) -> io::Error { io::Error::new(io::ErrorKind::Other, e) }

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(p: &dyn Presenter, env: &Envelope) -> String {
        let mut buf = Vec::new();
        p.emit(env, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_presenter_lists_fields() {
        let result = json!({"site": "Lever", "pageType": "JOB_VIEW", "job": {"title": "Engineer", "location": null}});
        let env = Envelope::result("classify", &result).unwrap();
        let out = render(&TextPresenter { pretty: false }, &env);
        assert!(out.starts_with("Result: classify\n"));
        assert!(out.contains("  site: Lever\n"));
        assert!(out.contains("  job:\n    title: Engineer\n"));
        assert!(out.contains("    location: -\n"));
    }

    #[test]
    fn json_presenter_is_one_line() {
        let env = Envelope::plan("scan", &json!({"persist": false})).unwrap();
        let out = render(&JsonPresenter { pretty: false }, &env);
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("\"apply\":false"));
    }
}
