//! Markdown rendering of incident reports.

use chrono::NaiveDateTime;

use medlens_contracts::report::IncidentReport;

/// Format of the **Time** row.
pub const TABLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the fixed human-readable template.
///
/// `created_at` is the same instant the report id was derived from. Section
/// bodies are inserted verbatim; nothing is escaped.
pub fn render(report: &IncidentReport, created_at: &NaiveDateTime) -> String {
    format!(
        "# Incident Report — {id}\n\
         \n\
         | Field | Details |\n\
         |---|---|\n\
         | **Time** | {time} |\n\
         | **Triage** | {triage} |\n\
         | **Patient** | {patient} |\n\
         \n\
         ## Injuries Observed\n\
         {injuries}\n\
         \n\
         ## First Aid Provided\n\
         {first_aid}\n\
         \n\
         ## Outcome\n\
         {outcome}\n\
         \n\
         ## Notes\n\
         {notes}\n",
        id = report.report_id,
        time = created_at.format(TABLE_TIME_FORMAT),
        triage = report.triage_category,
        patient = report.patient_description,
        injuries = report.injuries_observed,
        first_aid = report.first_aid_provided,
        outcome = report.outcome,
        notes = report.additional_notes,
    )
}
