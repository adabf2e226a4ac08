// Module declarations
mod cli;
mod config_file;
mod error;
mod page_source;
mod progress;
mod sections;
mod server;
mod types;
mod util;

// Re-export every module's items at the crate root so modules can refer to
// each other as `crate::Item`.
#[allow(unused_imports)]
pub(crate) use cli::*;
#[allow(unused_imports)]
pub(crate) use config_file::*;
#[allow(unused_imports)]
pub(crate) use error::*;
#[allow(unused_imports)]
pub(crate) use page_source::*;
#[allow(unused_imports)]
pub(crate) use progress::*;
#[allow(unused_imports)]
pub(crate) use sections::*;
#[allow(unused_imports)]
pub(crate) use server::*;
#[allow(unused_imports)]
pub(crate) use types::*;
#[allow(unused_imports)]
pub(crate) use util::*;

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = load_file_config(&config_path)?;
    apply_env_overrides(&mut config)?;

    match cli.command {
        Command::Show {
            sections,
            page,
            source,
            field,
            json,
        } => {
            if let Some(sections) = sections {
                config.sections = sections;
            }
            if let Some(field) = field {
                config.page_field = field;
            }
            if source.is_some() {
                config.source = source;
            }
            let table = load_table(&config.sections)?;

            let source: Box<dyn PageSource> = match page {
                Some(raw) => Box::new(FixedPage(parse_page(&raw)?)),
                None => match config.remote_source() {
                    Some(remote) => Box::new(remote),
                    None => return Err("show requires --page or --source".into()),
                },
            };
            let page = source.current_page()?;
            let report = compute_progress(page, &table);

            if json {
                let response = ProgressResponse {
                    generated_at: Utc::now().to_rfc3339(),
                    source: source.describe(),
                    report: &report,
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }
            print!("{}", format_report(&report));
            Ok(())
        }

        Command::Serve {
            sections,
            source,
            field,
            bind,
            port,
        } => {
            if let Some(sections) = sections {
                config.sections = sections;
            }
            if let Some(field) = field {
                config.page_field = field;
            }
            if source.is_some() {
                config.source = source;
            }
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let table = load_table(&config.sections)?;
            let source = config
                .remote_source()
                .map(|remote| Box::new(remote) as Box<dyn PageSource>);
            if source.is_none() {
                tracing::info!("no page source configured; requests must pass ?page=");
            }
            let state = ServerState { table, source };
            run_server(state, &config.bind, config.port)
        }

        Command::Check { sections, json } => {
            let path = sections.unwrap_or(config.sections);
            let table = load_table(&path)?;
            let summary = TableSummary {
                acts: table.acts().len(),
                sub_acts: table.sub_act_count(),
                total_length: table.total_length(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "ok: {} acts, {} sub-acts, {} pages ({})",
                    summary.acts,
                    summary.sub_acts,
                    summary.total_length,
                    path.display()
                );
            }
            Ok(())
        }
    }
}

fn load_table(path: &Path) -> Result<SectionTable, TableError> {
    let table = SectionTable::from_file(path)?;
    tracing::debug!(
        path = %path.display(),
        acts = table.acts().len(),
        total = table.total_length(),
        "loaded section table"
    );
    Ok(table)
}

fn format_report(report: &ProgressReport) -> String {
    let mut out = format!(
        "Page {} of {} ({})\n",
        report.page,
        report.total_length,
        label(report.overall)
    );
    for act in &report.acts {
        out.push_str(&format!("{:<32} {:>7}\n", act.name, act.label));
        for sub in &act.sub {
            out.push_str(&format!("  {:<30} {:>7}\n", sub.name, sub.label));
        }
    }
    out
}
