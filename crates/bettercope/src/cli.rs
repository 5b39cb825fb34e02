//! Command-line front end. Argument parsing and command execution live here
//! so the binary stays a thin shell around them.

use crate::events::SearchEvent;
use crate::service::{SubtitleService, split_sources};
use anyhow::{Context as _, Error, anyhow, bail};
use log::info;
use sources::{DownloadRequest, SearchRequest, SubtitleFile};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio_util::sync::CancellationToken;

pub const USAGE: &str = "\
usage: bettercope <command>

commands:
  search <query> [--sources a,b]        stream results as JSON lines
  sources                               list reachable sources
  download <source> <post-url> [--out DIR]
  bundle <source>=<post-url>... [--out DIR]
                                        zip several downloads into bulk_subtitles.zip";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Search {
        request: SearchRequest,
    },
    Sources,
    Download {
        request: DownloadRequest,
        out_dir: PathBuf,
    },
    Bundle {
        requests: Vec<DownloadRequest>,
        out_dir: PathBuf,
    },
    Help,
}

enum Flag {
    Sources,
    Out,
}

impl Command {
    /// Parse arguments, program name excluded.
    ///
    /// # Errors
    /// Returns an error describing the first malformed argument.
    pub fn parse<I>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(command) = args.next() else {
            return Ok(Self::Help);
        };

        let mut positional = Vec::new();
        let mut sources = Vec::new();
        let mut out_dir = PathBuf::from(".");
        let mut pending = None;
        for arg in args {
            if let Some(flag) = pending.take() {
                match flag {
                    Flag::Sources => sources = split_sources(&arg),
                    Flag::Out => out_dir = PathBuf::from(arg),
                }
                continue;
            }
            if let Some(rest) = arg.strip_prefix("--sources=") {
                sources = split_sources(rest);
            } else if let Some(rest) = arg.strip_prefix("--out=") {
                out_dir = PathBuf::from(rest);
            } else if arg == "--sources" {
                pending = Some(Flag::Sources);
            } else if arg == "--out" {
                pending = Some(Flag::Out);
            } else {
                positional.push(arg);
            }
        }
        if pending.is_some() {
            bail!("missing value for the last flag");
        }

        match command.as_str() {
            "search" => {
                if positional.is_empty() {
                    bail!("search needs a query");
                }
                Ok(Self::Search {
                    request: SearchRequest {
                        query: positional.join(" "),
                        sources,
                    },
                })
            }
            "sources" => Ok(Self::Sources),
            "download" => {
                let [source, url] = <[String; 2]>::try_from(positional)
                    .map_err(|_| anyhow!("usage: download <source> <post-url>"))?;
                Ok(Self::Download {
                    request: DownloadRequest::new(source, url),
                    out_dir,
                })
            }
            "bundle" => {
                if positional.is_empty() {
                    bail!("bundle needs at least one <source>=<post-url>");
                }
                let requests = positional
                    .iter()
                    .map(|pair| {
                        pair.split_once('=')
                            .map(|(source, url)| DownloadRequest::new(source, url))
                            .ok_or_else(|| anyhow!("expected <source>=<post-url>, got {pair:?}"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Bundle { requests, out_dir })
            }
            "help" | "--help" | "-h" => Ok(Self::Help),
            other => bail!("unknown command {other:?}\n{USAGE}"),
        }
    }
}

/// Write `file` into `dir` under the last component of its name.
async fn save(dir: &Path, file: &SubtitleFile) -> Result<PathBuf, Error> {
    let name = Path::new(&file.filename)
        .file_name()
        .map_or_else(|| PathBuf::from("subtitle.zip"), PathBuf::from);
    let path = dir.join(name);
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&path, &file.content)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!("saved {} ({} bytes)", path.display(), file.size());
    Ok(path)
}

/// Run `command`, writing its output to `out`.
///
/// # Errors
/// Propagates service failures and output errors.
pub async fn run<W: Write>(
    command: Command,
    service: &SubtitleService,
    cancel: CancellationToken,
    out: &mut W,
) -> Result<(), Error> {
    match command {
        Command::Help => writeln!(out, "{USAGE}")?,
        Command::Search { request } => {
            let mut events = service.stream_search(request, cancel.clone())?;
            loop {
                let event = tokio::select! {
                    () = cancel.cancelled() => break,
                    event = events.recv() => event,
                };
                let Some(event) = event else {
                    break;
                };
                writeln!(out, "{}", serde_json::to_string(&event)?)?;
                if event == SearchEvent::End {
                    break;
                }
            }
        }
        Command::Sources => {
            for source in service.available_sources().await {
                writeln!(out, "{source}")?;
            }
        }
        Command::Download { request, out_dir } => {
            let file = service.download(request).await?;
            let path = save(&out_dir, &file).await?;
            writeln!(out, "{}", path.display())?;
        }
        Command::Bundle { requests, out_dir } => {
            let file = service.download_bundle(requests).await?;
            let path = save(&out_dir, &file).await?;
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}
