//! Integration tests for custom range scheduling

use ketone_sched::{
    apply_field_update, on_start_change, validate, DateInput, DateRangeEntry, DayOfMonth,
    DraftForm, FieldUpdate, Frequency, JobMode, MonthInterval, RowError, RowId, RowSchedule,
    SaveError, ScheduleDraft, SequentialIds, ValidatorOptions, Weekday,
};

fn row(id: &str, start: &str, end: &str, schedule: RowSchedule) -> DateRangeEntry {
    DateRangeEntry {
        id: RowId::new(id),
        start: DateInput::from(start),
        end: DateInput::from(end),
        schedule,
    }
}

fn daily(id: &str, start: &str, end: &str) -> DateRangeEntry {
    row(id, start, end, RowSchedule::Daily)
}

const OVERLAP: &str = "Overlaps another range";

#[test]
fn blank_start_always_reports_required_date() {
    let schedules = [
        RowSchedule::Daily,
        RowSchedule::Fortnight,
        RowSchedule::OneTime,
        RowSchedule::default(),
        RowSchedule::Monthly {
            day: DayOfMonth::new(1).ok(),
            interval: Some(MonthInterval::ONE),
        },
        RowSchedule::Unrecognized("Hourly".to_string()),
    ];
    for (i, schedule) in schedules.into_iter().enumerate() {
        let id = format!("r{i}");
        let one_time = schedule == RowSchedule::OneTime;
        let report = validate(&[row(&id, "", "2024-01-31", schedule)]);
        let expected = if one_time {
            RowError::DateRequired
        } else {
            RowError::StartRequired
        };
        assert!(report.contains(&RowId::new(id.as_str()), expected));
    }
}

#[test]
fn one_time_start_edit_forces_end() {
    let one_time = row("a", "2024-01-01", "2024-01-01", RowSchedule::OneTime);
    let edited = on_start_change(&one_time, DateInput::from("2024-03-01"));
    assert_eq!(edited.end.as_str(), "2024-03-01");

    let cleared = on_start_change(&edited, DateInput::blank());
    assert!(cleared.end.is_blank());
}

#[test]
fn end_before_start_without_overlap_in_isolation() {
    let weekly = row(
        "a",
        "2024-03-10",
        "2024-03-01",
        RowSchedule::Weekly {
            days: [Weekday::Mon].into_iter().collect(),
        },
    );
    let report = validate(&[weekly]);
    let messages = report.messages_for(&RowId::new("a"));
    assert_eq!(messages, vec!["End date must be on/after start date"]);
    assert!(!messages.contains(&OVERLAP));
}

#[test]
fn overlap_is_reported_on_both_rows() {
    let report = validate(&[
        daily("a", "2024-01-01", "2024-01-31"),
        daily("b", "2024-01-15", "2024-02-15"),
    ]);
    assert_eq!(report.messages_for(&RowId::new("a")), vec![OVERLAP]);
    assert_eq!(report.messages_for(&RowId::new("b")), vec![OVERLAP]);
}

#[test]
fn adjacent_ranges_do_not_overlap() {
    let report = validate(&[
        daily("a", "2024-01-01", "2024-01-31"),
        daily("b", "2024-02-01", "2024-02-28"),
    ]);
    assert!(report.is_empty());
}

#[test]
fn incomplete_rows_are_exempt_from_overlap() {
    let report = validate(&[
        daily("a", "2024-01-01", "2024-01-31"),
        daily("b", "", "2024-01-20"),
        daily("c", "2024-01-10", "whenever"),
    ]);
    assert!(report.errors_for(&RowId::new("a")).is_none());
    assert!(!report.contains(&RowId::new("b"), RowError::Overlap));
    assert!(!report.contains(&RowId::new("c"), RowError::Overlap));
    assert!(report.contains(&RowId::new("b"), RowError::StartRequired));
    assert!(report.contains(&RowId::new("c"), RowError::EndRequired));
}

#[test]
fn loosely_written_dates_are_incomplete() {
    let report = validate(&[
        daily("a", "2024-01-01", "2024-01-31"),
        daily("b", "2024-1-5", "+2024-01-20"),
    ]);
    assert!(report.errors_for(&RowId::new("a")).is_none());
    assert_eq!(
        report.messages_for(&RowId::new("b")),
        vec!["Start date is required", "End date is required"]
    );
}

#[test]
fn one_time_rows_overlap_on_the_same_date() {
    let report = validate(&[
        row("a", "2024-05-01", "", RowSchedule::OneTime),
        daily("b", "2024-04-01", "2024-05-01"),
    ]);
    assert_eq!(report.messages_for(&RowId::new("a")), vec![OVERLAP]);
    assert_eq!(report.messages_for(&RowId::new("b")), vec![OVERLAP]);
}

#[test]
fn monthly_missing_day_scenario() {
    let monthly = apply_field_update(
        &row(
            "m",
            "2024-05-01",
            "2024-05-31",
            RowSchedule::for_frequency(Frequency::Monthly),
        ),
        FieldUpdate::parse("monthlyDay", "").unwrap(),
    );
    let report = validate(&[monthly]);
    assert_eq!(report.len(), 1);
    assert_eq!(report.messages_for(&RowId::new("m")), vec!["Select day of month"]);
}

#[test]
fn weekly_without_days_scenario() {
    let report = validate(&[row("w", "2024-06-01", "2024-06-07", RowSchedule::default())]);
    assert_eq!(
        report.messages_for(&RowId::new("w")),
        vec!["Select at least one weekday"]
    );
}

#[test]
fn validation_does_not_touch_rows() {
    let rows = vec![
        daily("a", "2024-01-01", "2024-01-31"),
        daily("b", "2024-01-15", "2024-02-15"),
    ];
    let before = rows.clone();
    let first = validate(&rows);
    let second = validate(&rows);
    assert_eq!(rows, before);
    assert_eq!(first, second);
}

#[test]
fn draft_save_round() {
    let mut draft = ScheduleDraft::new(SequentialIds::new());
    draft.set_mode(JobMode::Custom);
    let first = draft.rows()[0].id.clone();
    let second = draft.add_row();

    draft.update_field(&first, "start", "2024-01-01").unwrap();
    draft.update_field(&first, "end", "2024-01-31").unwrap();
    draft.toggle_weekday(&first, Weekday::Mon).unwrap();

    draft.update_field(&second, "freq", "One time").unwrap();
    draft.update_field(&second, "start", "2024-01-20").unwrap();

    let options = ValidatorOptions::default();
    let Err(SaveError::Blocked(report)) = draft.save(&options) else {
        panic!("overlapping ranges must block saving");
    };
    assert!(report.contains(&first, RowError::Overlap));
    assert!(report.contains(&second, RowError::Overlap));

    draft.update_field(&second, "start", "2024-02-20").unwrap();
    let payload = draft.save(&options).unwrap();
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "jobFrequency": "Custom",
            "customRanges": [
                {
                    "start": "2024-01-01",
                    "end": "2024-01-31",
                    "frequency": "Weekly",
                    "weekly": { "days": ["Mon"] }
                },
                {
                    "start": "2024-02-20",
                    "end": "2024-02-20",
                    "frequency": "One time"
                }
            ]
        })
    );
}

#[test]
fn fixed_monthly_payload() {
    let mut draft = ScheduleDraft::new(SequentialIds::new());
    draft.set_mode(JobMode::Monthly);
    draft.selection_mut().monthly_day = DayOfMonth::new(10).ok();

    let payload = draft.save(&ValidatorOptions::default()).unwrap();
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        serde_json::json!({
            "jobFrequency": "Monthly",
            "monthly": { "day": 10, "intervalMonths": 1 }
        })
    );
}

#[test]
fn report_serializes_as_messages() {
    let report = validate(&[row("w", "", "", RowSchedule::OneTime)]);
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        serde_json::json!({ "w": ["Date is required"] })
    );
}

#[test]
fn form_replay_matches_manual_edits() {
    let json = r#"{
        "mode": "Custom",
        "ranges": [
            {"id": "q1", "start": "2024-01-01", "end": "2024-03-31", "frequency": "Monthly", "monthly_day": 5},
            {"id": "q2", "start": "2024-03-31", "end": "2024-06-30", "frequency": "Fortnight"}
        ]
    }"#;
    let form: DraftForm = serde_json::from_str(json).unwrap();
    let draft = form.into_draft(SequentialIds::new()).unwrap();

    let report = draft.validate(&ValidatorOptions::default());
    assert_eq!(report.messages_for(&RowId::new("q1")), vec![OVERLAP]);
    assert_eq!(report.messages_for(&RowId::new("q2")), vec![OVERLAP]);
}
