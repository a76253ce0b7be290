//! A trivial, insecure SCION bootstrap server.
//!
//! Publishes an AS configuration directory over HTTP: the topology file
//! (with each border-router interface's `underlay.local` renamed to
//! `underlay.public`) and the TRC files found under `certs/`. Everything is
//! loaded once at startup.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::{Context as _, Result};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Trivial insecure SCION bootstrap server.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the AS configuration directory.
    directory: PathBuf,

    /// Bind address.
    bind: String,

    /// Server port.
    port: u16,
}

struct AppState {
    isd_as: String,
    topology: String,
    trc_index: String,
    trcs: HashMap<String, String>,
}

#[derive(Serialize)]
struct TrcEntry {
    id: TrcId,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
struct TrcId {
    isd: u32,
    base_number: u32,
    serial_number: u32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let state = Arc::new(load_files(&cli.directory)?);

    let router = Router::new()
        .route("/topology", get(topology))
        .route("/trcs", get(trc_index))
        .route("/trcs/{id}", get(trc))
        .with_state(state.clone());

    let listener = TcpListener::bind((cli.bind.as_str(), cli.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", cli.bind, cli.port))?;

    tracing::info!(
        "Serving topology of AS {} at http://{}",
        state.isd_as,
        listener.local_addr()?
    );

    axum::serve(listener, router).await?;

    Ok(())
}

async fn topology(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ok("application/json", state.topology.clone())
}

async fn trc_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ok("application/json", state.trc_index.clone())
}

async fn trc(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> impl IntoResponse {
    match state.trcs.get(&id) {
        Some(content) => ok("text/plain", content.clone()),
        None => (StatusCode::NOT_FOUND, "File not found").into_response(),
    }
}

fn ok(content_type: &'static str, body: String) -> Response<Body> {
    let last_modified = chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::LAST_MODIFIED, last_modified)
        .body(Body::from(body))
        .expect("static header values are valid")
}

fn load_files(directory: &std::path::Path) -> Result<AppState> {
    let topology_path = directory.join("topology.json");
    let mut topology: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(&topology_path)
            .with_context(|| format!("Failed to read {}", topology_path.display()))?,
    )
    .context("Invalid topology file")?;

    rewrite_underlays(&mut topology);

    let isd_as = topology
        .get("isd_as")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("<unknown>")
        .to_owned();

    let mut index = Vec::new();
    let mut trcs = HashMap::new();

    let certs = directory.join("certs");
    if let Ok(entries) = fs::read_dir(&certs) {
        for entry in entries {
            let path = entry?.path();

            if !path.is_file() || path.extension().is_none_or(|ext| ext != "trc") {
                continue;
            }

            // Non-conforming file names are ignored.
            let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(parse_trc_stem)
            else {
                continue;
            };

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            index.push(id);
            trcs.insert(
                format!("isd{}-b{}-s{}", id.isd, id.base_number, id.serial_number),
                content,
            );
        }
    }

    index.sort();

    Ok(AppState {
        isd_as,
        topology: serde_json::to_string_pretty(&topology)?,
        trc_index: serde_json::to_string_pretty(
            &index.into_iter().map(|id| TrcEntry { id }).collect::<Vec<_>>(),
        )?,
        trcs,
    })
}

/// Border-router interfaces publish their underlay address under the key
/// `public`, while on-disk topologies call it `local`.
fn rewrite_underlays(topology: &mut serde_json::Value) {
    use serde_json::Value;

    let Some(routers) = topology
        .get_mut("border_routers")
        .and_then(Value::as_object_mut)
    else {
        return;
    };

    for router in routers.values_mut() {
        let Some(interfaces) = router.get_mut("interfaces").and_then(Value::as_object_mut) else {
            continue;
        };

        for interface in interfaces.values_mut() {
            let Some(underlay) = interface.get_mut("underlay").and_then(Value::as_object_mut)
            else {
                continue;
            };

            if let Some(local) = underlay.remove("local") {
                underlay.insert("public".to_owned(), local);
            }
        }
    }
}

fn parse_trc_stem(stem: &str) -> Option<TrcId> {
    let rest = stem.strip_prefix("ISD")?;
    let (isd, rest) = split_number(rest)?;
    let rest = rest.strip_prefix("-B")?;
    let (base_number, rest) = split_number(rest)?;
    let rest = rest.strip_prefix("-S")?;
    let (serial_number, rest) = split_number(rest)?;

    rest.is_empty().then_some(TrcId {
        isd,
        base_number,
        serial_number,
    })
}

fn split_number(s: &str) -> Option<(u32, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, rest) = s.split_at(end);

    Some((digits.parse().ok()?, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_trc_file_names() {
        assert_eq!(
            parse_trc_stem("ISD1-B1-S1"),
            Some(TrcId {
                isd: 1,
                base_number: 1,
                serial_number: 1
            })
        );
        assert_eq!(
            parse_trc_stem("ISD17-B2-S30"),
            Some(TrcId {
                isd: 17,
                base_number: 2,
                serial_number: 30
            })
        );
        assert_eq!(parse_trc_stem("ISD1-B1"), None);
        assert_eq!(parse_trc_stem("ISD1-B1-S1-extra"), None);
        assert_eq!(parse_trc_stem("trc"), None);
        assert_eq!(parse_trc_stem("ISDx-B1-S1"), None);
    }

    #[test]
    fn renames_underlay_local_to_public() {
        let mut topology = json!({
            "isd_as": "1-ff00:0:110",
            "border_routers": {
                "br1": {
                    "interfaces": {
                        "1": {"underlay": {"local": "10.128.0.2:50000", "remote": "10.128.0.3:50000"}}
                    }
                }
            }
        });

        rewrite_underlays(&mut topology);

        let underlay = &topology["border_routers"]["br1"]["interfaces"]["1"]["underlay"];
        assert_eq!(underlay["public"], "10.128.0.2:50000");
        assert_eq!(underlay["remote"], "10.128.0.3:50000");
        assert!(underlay.get("local").is_none());
    }

    #[test]
    fn loads_configuration_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("topology.json"),
            json!({"isd_as": "1-ff00:0:110", "border_routers": {}}).to_string(),
        )
        .unwrap();
        fs::create_dir(dir.path().join("certs")).unwrap();
        fs::write(dir.path().join("certs/ISD1-B1-S1.trc"), "trc payload").unwrap();
        fs::write(dir.path().join("certs/README.trc"), "not a trc").unwrap();
        fs::write(dir.path().join("certs/ISD1-B1-S2.txt"), "wrong suffix").unwrap();

        let state = load_files(dir.path()).unwrap();

        assert_eq!(state.isd_as, "1-ff00:0:110");
        assert_eq!(state.trcs.len(), 1);
        assert_eq!(state.trcs["isd1-b1-s1"], "trc payload");

        let index: serde_json::Value = serde_json::from_str(&state.trc_index).unwrap();
        assert_eq!(
            index,
            json!([{"id": {"isd": 1, "base_number": 1, "serial_number": 1}}])
        );
    }
}
