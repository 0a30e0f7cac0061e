use std::sync::Arc;

use chrono::Local;

use crate::cli::config::{AppConfig, build_tracker_config};
use crate::form::form_model::{FieldKind, Surface};
use crate::form::surfaces::format_record;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::ReplayReport;
use crate::scenario::error::ScenarioError;
use crate::scenario::runner::ScenarioRunner;
use crate::scenario::scenario_model::Scenario;
use crate::snapshot::codec::{fingerprint, serialize};
use crate::snapshot::snapshot_model::FieldMap;
use crate::trace::logger::TraceLogger;

// ============================================================================
// replay subcommand
// ============================================================================

/// Replay scenarios and return whether all passed.
pub fn cmd_replay(
    scenario_path: &str,
    format: &str,
    output: Option<&str>,
    config: &AppConfig,
    tracer: Option<Arc<TraceLogger>>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let scenarios = load_scenarios(scenario_path)?;

    if scenarios.is_empty() {
        eprintln!("No scenarios found at: {}", scenario_path);
        return Ok(true);
    }

    if verbose > 0 {
        eprintln!("Replaying {} scenarios...", scenarios.len());
    }

    let tracker_config = build_tracker_config(config, false);
    let start = std::time::Instant::now();

    let mut results = Vec::new();
    for scenario in &scenarios {
        if verbose > 0 {
            eprintln!("  Replaying: {} ({})", scenario.name, scenario.surface);
        }
        results.push(ScenarioRunner::run(scenario, &tracker_config, tracer.clone()));
    }

    let duration = start.elapsed().as_millis();
    let report = ReplayReport::from_results(scenario_path, results).with_duration(duration);
    let all_passed = report.all_passed();

    let content = match format {
        "junit" => generate_junit_xml(&report),
        _ => format_console_report(&report),
    };

    match output {
        Some(path) => std::fs::write(path, &content)?,
        None => print!("{}", content),
    }

    Ok(all_passed)
}

/// Load scenarios from a YAML file or a directory of YAML files.
pub fn load_scenarios(path: &str) -> Result<Vec<Scenario>, ScenarioError> {
    let io_err = |source| ScenarioError::Io {
        path: path.to_string(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(io_err)?;
    if !metadata.is_dir() {
        return Ok(vec![read_yaml(path)?]);
    }

    let mut scenarios = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_err)? {
        let p = entry.map_err(io_err)?.path();
        if p.extension().map_or(false, |e| e == "yaml" || e == "yml") {
            scenarios.push(read_yaml(&p.to_string_lossy())?);
        }
    }
    // Sort by name for deterministic order
    scenarios.sort_by(|a: &Scenario, b: &Scenario| a.name.cmp(&b.name));
    Ok(scenarios)
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, ScenarioError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ScenarioError::Yaml {
        path: path.to_string(),
        source,
    })
}

// ============================================================================
// snapshot subcommand
// ============================================================================

/// Render the snapshot a surface would capture for `fields_path` (or a blank
/// form), followed by its fingerprint.
pub fn cmd_snapshot(
    surface_name: &str,
    fields_path: Option<&str>,
    sorted_keys: bool,
    config: &AppConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let surface = Surface::from_name(surface_name)
        .ok_or_else(|| ScenarioError::UnknownSurface(surface_name.to_string()))?;
    let schema = surface.schema();
    let today = Local::now().date_naive();

    let fields = match fields_path {
        Some(path) => {
            let record: FieldMap = read_yaml(path)?;
            format_record(&schema, &record, today)
        }
        None => schema.blank(today),
    };

    let mode = build_tracker_config(config, sorted_keys).snapshot_mode;
    let snapshot = serialize(&fields, mode);

    Ok(format!("{}\nsha1: {}\n", snapshot, fingerprint(&snapshot)))
}

// ============================================================================
// surfaces subcommand
// ============================================================================

pub fn cmd_surfaces() -> String {
    let mut out = String::new();

    for surface in Surface::ALL {
        let schema = surface.schema();
        out.push_str(&format!("{} (capture: {:?})\n", surface, schema.capture));
        if !schema.categories.is_empty() {
            out.push_str(&format!("  categories: {}\n", schema.categories.join(", ")));
        }
        for field in &schema.fields {
            let required = if field.required { " *" } else { "" };
            out.push_str(&format!(
                "  {:<22} {:<12} {}{}\n",
                field.key,
                kind_name(&field.kind),
                field.label,
                required
            ));
        }
    }

    out
}

fn kind_name(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Number { .. } => "number",
        FieldKind::Date { .. } => "date",
        FieldKind::Select(_) => "select",
        FieldKind::Ids => "ids",
        FieldKind::RichText => "rich_text",
    }
}
