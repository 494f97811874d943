use crate::models::Candidate;
use crate::services::enrich::{
    format_day_label, format_time_label, group_reminders_by_patient, parse_flexible_timestamp,
};

/// Render the outreach notification for one candidate. Pure: the same
/// candidate always yields the same text, which the user may edit freely
/// before sending.
pub fn compose_message(candidate: &Candidate) -> String {
    let first_name = candidate
        .client_name
        .split_whitespace()
        .next()
        .unwrap_or("there");

    let mut sections: Vec<String> = Vec::new();
    for group in group_reminders_by_patient(candidate) {
        if group.reminders.is_empty() {
            continue;
        }
        let lines: Vec<String> = group
            .reminders
            .iter()
            .map(|description| format!("- {}", description))
            .collect();
        sections.push(format!("{}:\n{}", group.patient_name, lines.join("\n")));
    }

    let proposed = parse_flexible_timestamp(&candidate.proposed_start);
    let date_label = proposed
        .map(format_day_label)
        .unwrap_or_else(|| candidate.proposed_start.clone());
    let time_label = proposed
        .map(format_time_label)
        .unwrap_or_else(|| candidate.proposed_start.clone());
    let window_start = parse_flexible_timestamp(&candidate.window_start)
        .map(format_time_label)
        .unwrap_or_else(|| candidate.window_start.clone());
    let window_end = parse_flexible_timestamp(&candidate.window_end)
        .map(format_time_label)
        .unwrap_or_else(|| candidate.window_end.clone());

    let held_for = candidate
        .patient_names
        .first()
        .cloned()
        .unwrap_or_else(|| "your pet".to_string());

    format!(
        "Hi {first_name}! An opening came up near you, and our records show \
the following care is due:\n\n{reminders}\n\nWe could visit on {date_label} \
at {time_label}, arriving between {window_start} and {window_end}. We are \
holding this opening for {held_for}, but it may be offered to other clients, \
so please reply soon to confirm.",
        reminders = sections.join("\n\n"),
    )
}
