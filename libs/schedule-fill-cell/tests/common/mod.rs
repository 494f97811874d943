use chrono::NaiveDate;

use schedule_fill_cell::models::{
    Candidate, CandidateAddress, CandidatePatient, Reminder,
};
use shared_config::{AppConfig, DeploymentMode};

pub fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        practice_api_url: base_url.to_string(),
        practice_api_key: "test-api-key".to_string(),
        build_mode: "development".to_string(),
        deployment_mode: DeploymentMode::NonProduction,
    }
}

pub fn reminder(id: &str, description: &str) -> Reminder {
    Reminder {
        id: id.to_string(),
        description: description.to_string(),
        due_date: NaiveDate::from_ymd_opt(2025, 1, 15),
    }
}

pub fn patient(id: &str, name: &str, reminders: Option<Vec<Reminder>>) -> CandidatePatient {
    CandidatePatient {
        id: id.to_string(),
        external_id: None,
        name: name.to_string(),
        species: Some("Canine".to_string()),
        breed: Some("Beagle".to_string()),
        weight_lbs: Some(32.0),
        date_of_birth: NaiveDate::from_ymd_opt(2018, 2, 1),
        alert: None,
        reminders,
    }
}

/// Two-patient candidate with the richer per-patient reminder shape.
pub fn sample_candidate() -> Candidate {
    Candidate {
        client_id: "cl-1001".to_string(),
        client_name: "Dana Whitfield".to_string(),
        client_external_id: Some("ext-77".to_string()),
        client_alert: None,
        address: CandidateAddress {
            street: Some("12 Alder Ln".to_string()),
            city: Some("Portland".to_string()),
            state: Some("OR".to_string()),
            postal_code: Some("97209".to_string()),
            full_address: "12 Alder Ln, Portland, OR 97209".to_string(),
        },
        latitude: Some(45.53),
        longitude: Some(-122.69),
        patient_ids: vec!["p-1".to_string(), "p-2".to_string()],
        patient_names: vec!["Biscuit".to_string(), "Mochi".to_string()],
        patients: Some(vec![
            patient(
                "p-1",
                "Biscuit",
                Some(vec![
                    reminder("r-1", "Rabies vaccine"),
                    reminder("r-2", "Annual wellness exam"),
                ]),
            ),
            patient("p-2", "Mochi", Some(vec![reminder("r-3", "Dental cleaning")])),
        ]),
        reminders: Vec::new(),
        reminder_ids: Vec::new(),
        proposed_start: "2025-03-05T14:30:00Z".to_string(),
        window_start: "2025-03-05T14:00:00Z".to_string(),
        window_end: "2025-03-05T15:30:00Z".to_string(),
        required_duration_seconds: 2700,
        added_drive_seconds: 480,
        hole_index: 2,
        score: 87.5,
        deep_link: "https://app.homevet.example/appointments/doctor/ext-301?date=2025-03-05"
            .to_string(),
        overdue_patient_count: 2,
    }
}

/// Candidate carrying only the legacy flat reminder shape.
pub fn legacy_candidate() -> Candidate {
    let mut candidate = sample_candidate();
    candidate.patients = None;
    candidate.reminders = vec![
        reminder("r-1", "Rabies vaccine"),
        reminder("r-3", "Dental cleaning"),
    ];
    candidate.reminder_ids = vec!["r-1".to_string(), "r-3".to_string()];
    candidate
}
