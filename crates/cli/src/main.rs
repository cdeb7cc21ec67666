use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bodymap_core::config::{
    deselect_policy_from_env_value, min_query_len_from_env_value, resolve_catalogue,
    search_limit_from_env_value,
};
use bodymap_core::{CoreConfig, PartId, Session, Symptom, SymptomId, Target, ZoneKey};

#[derive(Parser)]
#[command(name = "bodymap")]
#[command(about = "Body-map symptom selection engine CLI")]
struct Cli {
    /// Catalogue file to load instead of the built-in one
    #[arg(long, global = true)]
    catalogue: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List zones and their parts
    Zones,
    /// Print the zone a part belongs to
    ZoneOf {
        /// Part identifier as emitted by the body model
        part: String,
    },
    /// Print the display name of a part
    Name {
        /// Part identifier as emitted by the body model
        part: String,
    },
    /// List the symptoms suggested for a part
    Suggest {
        /// Part identifier as emitted by the body model
        part: String,
    },
    /// Search symptoms by label or keyword
    Search {
        /// Free-text query
        query: String,
        /// Scope the search to a part (and its zone)
        #[arg(long)]
        part: Option<String>,
        /// Scope the search to a zone
        #[arg(long)]
        zone: Option<String>,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Apply an event script to a fresh session and print the JSON report
    Replay {
        /// YAML list of events
        script: PathBuf,
    },
}

/// One step of a replay script.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ScriptEvent {
    Click { part: String },
    Hover { part: String },
    Unhover,
    Activate { part: String },
    Add { part: String, symptom: String },
    Remove { part: String, symptom: String },
    Intensity { part: String, symptom: String, value: i64 },
    Clear,
}

fn config_from_env() -> anyhow::Result<CoreConfig> {
    let cfg = CoreConfig::new(
        search_limit_from_env_value(std::env::var("BODYMAP_SEARCH_LIMIT").ok())?,
        min_query_len_from_env_value(std::env::var("BODYMAP_MIN_QUERY_LEN").ok())?,
        true,
        deselect_policy_from_env_value(std::env::var("BODYMAP_DESELECT_POLICY").ok())?,
    )?;
    Ok(cfg)
}

fn print_symptoms(symptoms: &[&Symptom]) {
    if symptoms.is_empty() {
        println!("No matching symptoms.");
    }
    for symptom in symptoms {
        println!("{}\t{}", symptom.id(), symptom.label());
    }
}

fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("parsing script {}", path.display()))
}

fn parse_script(text: &str) -> anyhow::Result<Vec<ScriptEvent>> {
    Ok(serde_yaml::from_str(text)?)
}

fn replay(session: &mut Session, events: Vec<ScriptEvent>) -> anyhow::Result<()> {
    for (index, event) in events.into_iter().enumerate() {
        tracing::debug!("event {}: {:?}", index, event);
        match event {
            ScriptEvent::Click { part } => {
                session.on_part_clicked(&PartId::from(part));
            }
            ScriptEvent::Hover { part } => {
                session.on_part_hovered(&PartId::from(part));
            }
            ScriptEvent::Unhover => session.on_part_unhovered(),
            ScriptEvent::Activate { part } => {
                session.set_active(&PartId::from(part));
            }
            ScriptEvent::Add { part, symptom } => {
                session
                    .add_symptom(&PartId::from(part), &SymptomId::from(symptom))
                    .with_context(|| format!("event {index}"))?;
            }
            ScriptEvent::Remove { part, symptom } => {
                session
                    .remove_symptom(&PartId::from(part), &SymptomId::from(symptom))
                    .with_context(|| format!("event {index}"))?;
            }
            ScriptEvent::Intensity {
                part,
                symptom,
                value,
            } => {
                session
                    .set_intensity(&PartId::from(part), &SymptomId::from(symptom), value)
                    .with_context(|| format!("event {index}"))?;
            }
            ScriptEvent::Clear => session.clear_all(),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bodymap_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let catalogue_path = cli
        .catalogue
        .or_else(|| std::env::var_os("BODYMAP_CATALOGUE").map(PathBuf::from));
    let data = resolve_catalogue(catalogue_path)?;
    let mut session = Session::from_catalogue(&data, config_from_env()?)?;

    match cli.command {
        Some(Commands::Zones) => {
            for zone in session.registry().zones() {
                let parts: Vec<&str> = zone.parts().iter().map(PartId::as_str).collect();
                println!("{}\t{}\t{}", zone.key(), zone.label(), parts.join(", "));
            }
        }
        Some(Commands::ZoneOf { part }) => {
            let registry = session.registry();
            let key = registry.zone_of(&PartId::from(part));
            println!("{}\t{}", key, registry.zone_label(key));
        }
        Some(Commands::Name { part }) => {
            println!("{}", session.registry().display_name(&PartId::from(part)));
        }
        Some(Commands::Suggest { part }) => {
            print_symptoms(&session.suggestions_for(&PartId::from(part), ""));
        }
        Some(Commands::Search {
            query,
            part,
            zone,
            limit,
        }) => {
            let target = match (part, zone) {
                (Some(part), zone) => {
                    let part = PartId::from(part);
                    let zone = zone
                        .map(ZoneKey::from)
                        .unwrap_or_else(|| session.registry().zone_of(&part).clone());
                    Some(Target::part(part, zone))
                }
                (None, Some(zone)) => Some(Target::zone(ZoneKey::from(zone))),
                (None, None) => None,
            };
            match target {
                Some(target) => print_symptoms(&session.search_target(&query, &target, limit)),
                None => print_symptoms(&session.search(&query, limit)),
            }
        }
        Some(Commands::Replay { script }) => {
            let events = load_script(&script)?;
            replay(&mut session, events)?;
            println!("{}", session.report().to_json_pretty()?);
        }
        None => {
            println!("Use 'bodymap --help' for commands");
        }
    }

    Ok(())
}
