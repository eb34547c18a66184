//! Terminal rendering of evaluation results.

use strength_core::calculations::EvaluationResult;
use strength_core::project::CoreSample;
use strength_core::report::format_number;

const RULE: &str = "═══════════════════════════════════════════════════";

pub fn print_summary(result: &EvaluationResult) {
    println!("{}", RULE);
    println!("  EVALUATION SUMMARY");
    println!("{}", RULE);
    println!();
    println!(
        "L/D Ratio: {} | Diameter Correction Factor: {} | Graph Factor: {}",
        format_number(result.ld_ratio_display()),
        format_number(result.dia_correction_factor),
        format_number(result.graph_correction_factor)
    );
    println!();
    println!("  Raw Strength:           {:>8.2} MPa", result.raw_strength_mpa);
    println!("  After Dia Correction:   {:>8.2} MPa", result.corrected_strength_mpa);
    println!("  After Graph Correction: {:>8.2} MPa", result.graph_corrected_strength_mpa);
    println!("  Cube Equivalent:        {:>8.2} MPa", result.cube_equivalent_strength_mpa);
    println!("  % Strength vs Grade:    {:>8.2} %", result.percent_strength);
    println!();
    println!("{}", RULE);
    println!(
        "  RESULT: {} (corrected {:.2} MPa vs required {:.2} MPa)",
        result.status, result.corrected_strength_mpa, result.required_strength_mpa
    );
    println!("{}", RULE);
}

pub fn print_breakdown(result: &EvaluationResult) {
    println!();
    println!("Detailed Calculation:");
    let fields = result.report_fields();
    let width = fields.iter().map(|f| f.label.chars().count()).max().unwrap_or(0);
    for field in &fields {
        let pad = width - field.label.chars().count();
        println!("  {}{}  {}", field.label, " ".repeat(pad), field.value);
    }
}

pub fn print_project_table(rows: &[(&CoreSample, EvaluationResult)]) {
    println!(
        "{:<4} {:<12} {:<20} {:>10} {:>10} {:>10}  {}",
        "No.", "Sample", "Location", "Corr.", "Req.", "Cube", "Status"
    );
    for (i, (sample, result)) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<12} {:<20} {:>10.2} {:>10.2} {:>10.2}  {}",
            i + 1,
            sample.label,
            sample.location.as_deref().unwrap_or("-"),
            result.corrected_strength_mpa,
            result.required_strength_mpa,
            result.cube_equivalent_strength_mpa,
            status_icon(result.passes())
        );
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[PASS]"
    } else {
        "[FAIL]"
    }
}
