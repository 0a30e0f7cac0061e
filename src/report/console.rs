use crate::report::report_model::ReplayReport;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a replay report for the terminal.
///
/// ```text
/// === Replay: scenarios ===
///
/// ✓ PASS  Edit then revert password (6 steps, 2 expectations)
/// ✗ FAIL  Close while dirty (4 steps, 1 expectations)
///     [FAIL] Step 3: prompting is false, expected true
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &ReplayReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Replay: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} expectations)\n",
            marker,
            result.scenario_name,
            result.steps_run,
            result.expectation_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for er in result.expectation_results.iter().filter(|er| !er.passed) {
            let detail = er.message.as_deref().unwrap_or("expectation failed");
            out.push_str(&format!("    [FAIL] Step {}: {}\n", er.step_index, detail));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
