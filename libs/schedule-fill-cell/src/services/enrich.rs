use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::models::{Candidate, CandidatePatient, CandidateView, PatientSummary};

/// Canonical reminder grouping for one patient, in candidate patient order.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientReminderGroup {
    pub patient_name: String,
    pub reminders: Vec<String>,
}

/// Resolve the two backend reminder-association shapes into one canonical
/// grouping, keyed by patient and ordered like the candidate's patient list.
///
/// The per-patient `reminders` structure is authoritative when present and
/// non-empty. Only patients missing it fall back to the legacy flat list,
/// where each reminder is attributed by the position of its id in the
/// parallel id list; reminders with no position match go to the first
/// patient. The two shapes are never merged for a single patient.
pub fn group_reminders_by_patient(candidate: &Candidate) -> Vec<PatientReminderGroup> {
    let patient_count = candidate.patient_names.len();

    let mut legacy: Vec<Vec<String>> = vec![Vec::new(); patient_count];
    if patient_count > 0 {
        for reminder in &candidate.reminders {
            let slot = candidate
                .reminder_ids
                .iter()
                .position(|id| id == &reminder.id)
                .filter(|index| *index < patient_count)
                .unwrap_or(0);
            legacy[slot].push(reminder.description.clone());
        }
    }

    candidate
        .patient_names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let reminders = match rich_patient(candidate, index, name)
                .and_then(|patient| patient.reminders.as_ref())
            {
                Some(rich) if !rich.is_empty() => {
                    rich.iter().map(|r| r.description.clone()).collect()
                }
                _ => legacy[index].clone(),
            };

            PatientReminderGroup {
                patient_name: name.clone(),
                reminders,
            }
        })
        .collect()
}

fn rich_patient<'a>(
    candidate: &'a Candidate,
    index: usize,
    name: &str,
) -> Option<&'a CandidatePatient> {
    let patients = candidate.patients.as_ref()?;
    candidate
        .patient_ids
        .get(index)
        .and_then(|patient_id| patients.iter().find(|p| &p.id == patient_id))
        .or_else(|| patients.iter().find(|p| p.name == name))
}

/// Whole years elapsed from date of birth, floored. None when the date is
/// missing or lies in the future (clock skew, malformed upstream data).
pub fn age_in_years(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    date_of_birth.and_then(|dob| today.years_since(dob))
}

/// Compact one-line descriptor: age, breed, species in parentheses, weight.
/// Each field is omitted independently when absent.
pub fn patient_descriptor(patient: &CandidatePatient, today: NaiveDate) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(age) = age_in_years(patient.date_of_birth, today) {
        parts.push(format!("{} yr", age));
    }
    if let Some(breed) = patient.breed.as_deref().filter(|b| !b.is_empty()) {
        parts.push(breed.to_string());
    }
    if let Some(species) = patient.species.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("({})", species));
    }
    if let Some(weight) = patient.weight_lbs {
        parts.push(format!("{} lb", weight));
    }

    parts.join(" ")
}

/// Optimizer timestamps arrive either with an offset or as bare local
/// datetimes. Treat bare values as UTC.
pub fn parse_flexible_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

pub fn format_day_label(dt: DateTime<Utc>) -> String {
    dt.format("%a, %b %d, %Y").to_string()
}

pub fn format_time_label(dt: DateTime<Utc>) -> String {
    dt.format("%-I:%M %p").to_string()
}

fn time_label_or_raw(raw: &str) -> String {
    parse_flexible_timestamp(raw)
        .map(format_time_label)
        .unwrap_or_else(|| raw.to_string())
}

/// Rounded whole minutes for display. The underlying seconds are never
/// mutated.
pub fn minutes_rounded(seconds: i64) -> i64 {
    (seconds as f64 / 60.0).round() as i64
}

/// Drive-time delta shown on the candidate card: zero stays zero, anything
/// non-zero shows at least one minute.
pub fn drive_minutes_label(added_drive_seconds: i64) -> i64 {
    if added_drive_seconds == 0 {
        0
    } else {
        minutes_rounded(added_drive_seconds).max(1)
    }
}

/// Build the render-ready view model for one candidate.
pub fn enrich_candidate(candidate: Candidate) -> CandidateView {
    enrich_candidate_at(candidate, Utc::now().date_naive())
}

pub fn enrich_candidate_at(candidate: Candidate, today: NaiveDate) -> CandidateView {
    let groups = group_reminders_by_patient(&candidate);

    let patient_summaries = groups
        .into_iter()
        .enumerate()
        .map(|(index, group)| {
            let descriptor = rich_patient(&candidate, index, &group.patient_name)
                .map(|patient| patient_descriptor(patient, today));
            PatientSummary {
                name: group.patient_name,
                descriptor,
                reminders: group.reminders,
            }
        })
        .collect();

    let proposed = parse_flexible_timestamp(&candidate.proposed_start);
    let proposed_date_label = proposed
        .map(format_day_label)
        .unwrap_or_else(|| candidate.proposed_start.clone());
    let proposed_time_label = proposed
        .map(format_time_label)
        .unwrap_or_else(|| candidate.proposed_start.clone());
    let arrival_window_label = format!(
        "{} - {}",
        time_label_or_raw(&candidate.window_start),
        time_label_or_raw(&candidate.window_end),
    );
    let added_drive_minutes = drive_minutes_label(candidate.added_drive_seconds);

    CandidateView {
        candidate,
        patient_summaries,
        proposed_date_label,
        proposed_time_label,
        arrival_window_label,
        added_drive_minutes,
    }
}
