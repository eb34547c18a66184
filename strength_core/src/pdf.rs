//! # PDF Generation Module
//!
//! Generates core strength reports using Typst.
//!
//! ## Architecture
//!
//! - Typst sources are built with `format!` from the report field mapping
//! - Compilation happens in-process against a minimal [`World`] with the
//!   fonts bundled in `typst-assets`
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use strength_core::calculations::evaluate;
//! use strength_core::pdf::{render_evaluation_pdf, ReportHeader};
//!
//! let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
//! let header = ReportHeader::new("A. Engineer", "24-117", "C-1");
//! let pdf_bytes = render_evaluation_pdf(&result, &header).unwrap();
//! std::fs::write("core_strength_report.pdf", pdf_bytes).unwrap();
//! ```

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::core_strength::{
    ACCEPTANCE_FRACTION, CUBE_EQUIVALENCE_FACTOR, GRAPH_INTERCEPT, GRAPH_SLOPE, PI_APPROX,
};
use crate::calculations::EvaluationResult;
use crate::errors::{CalcError, CalcResult};
use crate::project::{CoreSample, Project};
use crate::report::format_number;

const FORMAT: &str = "PDF";

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.year(),
            u8::try_from(now.month()).ok()?,
            u8::try_from(now.day()).ok()?,
        )
    }
}

// ============================================================================
// Report Header
// ============================================================================

/// Who and what the report is for. Printed in the title block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportHeader {
    pub engineer: String,
    pub job_id: String,
    pub sample_label: String,
    /// Structure or element the core was drilled from
    pub structure: Option<String>,
}

impl ReportHeader {
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        sample_label: impl Into<String>,
    ) -> Self {
        ReportHeader {
            engineer: engineer.into(),
            job_id: job_id.into(),
            sample_label: sample_label.into(),
            structure: None,
        }
    }

    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = Some(structure.into());
        self
    }
}

// ============================================================================
// Typst Source Builders
// ============================================================================

fn page_setup(job_id: &str, date: &str) -> String {
    format!(
        r##"
#set page(
  paper: "a4",
  margin: (top: 2.5cm, bottom: 2.5cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Concrete Core Strength Evaluation]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {job_id}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{date}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt)
"##,
        job_id = escape_typst(job_id),
        date = date,
    )
}

/// Title block, breakdown table, calculation steps and verdict for one core.
fn evaluation_section(result: &EvaluationResult, sample_label: &str) -> String {
    let rows = result
        .report_fields()
        .iter()
        .map(|field| {
            format!(
                "  [{}], [{}],",
                escape_typst(&field.label),
                escape_typst(&field.value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let (status_color, status_text) = if result.passes() {
        ("rgb(\"#d4edda\")", "PASS")
    } else {
        ("rgb(\"#f8d7da\")", "FAIL")
    };

    let m = &result.measurement;
    let n = format_number;

    format!(
        r##"
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[Concrete Core Strength Report]
    #v(4pt)
    #text(size: 12pt)[{sample_label}]
  ]
]

#v(12pt)

== Detailed Calculation

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Quantity*], [*Value*]),
{rows}
)

#v(12pt)

== Calculation Steps

$ A = {pi} / 4 dot D^2 = {pi} / 4 dot {d}^2 = {area} "mm"^2 $

$ f_"raw" = P / A = {load_n} / {area} = {raw} "MPa" $

$ f_"corr" = f_"raw" dot k_"dia" = {raw} dot {k_dia} = {corr} "MPa" $

$ k_"graph" = {slope} dot L / D + {intercept} = {slope} dot {ld} + {intercept} = {k_graph} $

$ f_"graph" = f_"corr" dot k_"graph" = {graph} "MPa" $

$ f_"cube" = {cube_factor} dot f_"graph" = {cube} "MPa" $

$ f_"req" = {fraction} dot f_"ck" = {fraction} dot {grade} = {required} "MPa" $

Diameter bracket: {bracket}. Every intermediate value is rounded to 2 decimals before use.

#v(16pt)

#align(center)[
  #block(
    width: auto,
    fill: {status_color},
    inset: 16pt,
    radius: 4pt
  )[
    #text(size: 16pt, weight: "bold")[{status_text}]
    #v(4pt)
    #text(size: 10pt)[Corrected strength {corr} MPa vs required {required} MPa]
  ]
]
"##,
        sample_label = escape_typst(sample_label),
        rows = rows,
        pi = n(PI_APPROX),
        d = n(m.core_diameter_mm),
        area = n(result.area_mm2),
        load_n = n(result.load_n),
        raw = n(result.raw_strength_mpa),
        k_dia = n(result.dia_correction_factor),
        corr = n(result.corrected_strength_mpa),
        slope = n(GRAPH_SLOPE),
        intercept = n(GRAPH_INTERCEPT),
        ld = n(result.ld_ratio_display()),
        k_graph = n(result.graph_correction_factor),
        graph = n(result.graph_corrected_strength_mpa),
        cube_factor = n(CUBE_EQUIVALENCE_FACTOR),
        cube = n(result.cube_equivalent_strength_mpa),
        fraction = n(ACCEPTANCE_FRACTION),
        grade = n(m.grade_mpa),
        required = n(result.required_strength_mpa),
        bracket = escape_typst(result.diameter_bracket().description()),
        status_color = status_color,
        status_text = status_text,
    )
}

const FOOTNOTE: &str = r##"
#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

#text(size: 8pt, fill: gray)[
  Evaluated per IS 516 core correction methodology. \
  Results should be verified by a qualified engineer.
]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render a single core evaluation to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::ExportFailed)` - If Typst compilation or rendering fails
pub fn render_evaluation_pdf(result: &EvaluationResult, header: &ReportHeader) -> CalcResult<Vec<u8>> {
    let date = Utc::now().format("%Y-%m-%d").to_string();

    let mut source = page_setup(&header.job_id, &date);
    source.push_str(&format!(
        r##"
#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
  [Engineer:], [{engineer}],
  [Job ID:], [{job_id}],
  [Structure:], [{structure}],
  [Date:], [{date}],
)
"##,
        engineer = escape_typst(&header.engineer),
        job_id = escape_typst(&header.job_id),
        structure = escape_typst(header.structure.as_deref().unwrap_or("-")),
        date = date,
    ));
    source.push_str(&evaluation_section(result, &header.sample_label));
    source.push_str(FOOTNOTE);

    let pdf = compile_pdf(source)?;
    info!(sample = %header.sample_label, bytes = pdf.len(), "rendered evaluation PDF");
    Ok(pdf)
}

/// Render every sample of a project into one PDF: a cover page with a
/// summary table, then one page per core.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::InvalidMeasurement)` - A sample could not be evaluated
/// * `Err(CalcError::ExportFailed)` - Project is empty or rendering failed
pub fn render_project_pdf(project: &Project) -> CalcResult<Vec<u8>> {
    let evaluated = project.evaluate_all()?;
    if evaluated.is_empty() {
        return Err(CalcError::export_failed(FORMAT, "Project has no samples to export"));
    }

    let date = Utc::now().format("%Y-%m-%d").to_string();
    let meta = &project.meta;

    let mut source = page_setup(&meta.job_id, &date);
    source.push_str(&format!(
        r##"
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 20pt, radius: 4pt)[
    #text(size: 20pt, weight: "bold")[Core Strength Assessment]
    #v(8pt)
    #text(size: 14pt)[{structure}]
  ]
]

#v(24pt)

#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
  [Engineer:], [{engineer}],
  [Job ID:], [{job_id}],
  [Code:], [{code}],
  [Date:], [{date}],
)

#v(24pt)

== Summary

#table(
  columns: (auto, 1fr, 1fr, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, left, left, right, right, center),
  table.header([*No.*], [*Sample*], [*Location*], [*Corrected (MPa)*], [*Required (MPa)*], [*Status*]),
{summary_rows}
)
"##,
        structure = escape_typst(&meta.structure),
        engineer = escape_typst(&meta.engineer),
        job_id = escape_typst(&meta.job_id),
        code = escape_typst(&project.settings.code),
        date = date,
        summary_rows = build_summary_rows(&evaluated),
    ));

    for (sample, result) in &evaluated {
        source.push_str("\n#pagebreak()\n");
        source.push_str(&evaluation_section(result, &sample.label));
    }
    source.push_str(FOOTNOTE);

    let pdf = compile_pdf(source)?;
    info!(
        job_id = %meta.job_id,
        samples = evaluated.len(),
        bytes = pdf.len(),
        "rendered project PDF"
    );
    Ok(pdf)
}

fn build_summary_rows(evaluated: &[(&CoreSample, EvaluationResult)]) -> String {
    evaluated
        .iter()
        .enumerate()
        .map(|(i, (sample, result))| {
            format!(
                "  [{}], [{}], [{}], [{}], [{}], [{}],",
                i + 1,
                escape_typst(&sample.label),
                escape_typst(sample.location.as_deref().unwrap_or("-")),
                format_number(result.corrected_strength_mpa),
                format_number(result.required_strength_mpa),
                result.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    debug!(source_len = source.len(), "compiling Typst document");
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);
    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::export_failed(
            FORMAT,
            format!("Typst compilation failed: {}", error_msgs.join("; ")),
        )
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::export_failed(FORMAT, format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })
}

/// Escape special Typst markup characters in text
fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(
            c,
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '=' | '~' | '/'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{evaluate, Measurement};

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("C-1 #2"), "C-1 \\#2");
        assert_eq!(escape_typst("L/D Ratio"), "L\\/D Ratio");
        assert_eq!(escape_typst("[core]"), "\\[core\\]");
        assert_eq!(escape_typst("plain text"), "plain text");
    }

    #[test]
    fn test_section_contains_every_field() {
        let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
        let section = evaluation_section(&result, "C-1");
        assert!(section.contains("[Area (mm²)], [3629.84],"));
        assert!(section.contains("[Required Strength (75% of Grade)], [37.5],"));
        assert!(section.contains("[Status], [PASS],"));
        assert!(section.contains("#d4edda"));
    }

    #[test]
    fn test_evaluation_pdf_generation() {
        let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
        let header = ReportHeader::new("Test Engineer", "TEST-001", "C-1 Slab #3")
            .with_structure("Podium slab, grid B/4");

        let pdf = render_evaluation_pdf(&result, &header);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_project_pdf_generation() {
        let mut project = Project::new("Test Engineer", "TEST-002", "Transfer girder");
        project.add_sample("C-1", None, Measurement::new(68.0, 132.0, 175.0, 50.0));
        project.add_sample("C-2", Some("Gridline 4".to_string()), Measurement::new(75.0, 150.0, 100.0, 40.0));

        let pdf_bytes = render_project_pdf(&project).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_project_rejected() {
        let project = Project::new("Engineer", "25-001", "Empty");
        let err = render_project_pdf(&project).unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_FAILED");
    }
}
