//! End-to-end tests for the extraction pipeline.

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Asia::Tokyo;
use appo_engine::holiday::NoHolidays;
use appo_engine::{extract_availability, CalendarEvent, Extractor, ExtractorConfig, TimeSlot};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// A timed event in Tokyo local time on the given date.
fn event(title: &str, (y, m, d): (i32, u32, u32), start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
    let s = format!("{:04}-{:02}-{:02}T{:02}:{:02}:00+09:00", y, m, d, start.0, start.1);
    let e = format!("{:04}-{:02}-{:02}T{:02}:{:02}:00+09:00", y, m, d, end.0, end.1);
    CalendarEvent::timed(title, &s, &e).unwrap()
}

fn local_slot((y, m, d): (i32, u32, u32), start: (u32, u32), end: (u32, u32)) -> TimeSlot {
    TimeSlot::new(
        Tokyo
            .with_ymd_and_hms(y, m, d, start.0, start.1, 0)
            .unwrap()
            .with_timezone(&chrono::Utc),
        Tokyo
            .with_ymd_and_hms(y, m, d, end.0, end.1, 0)
            .unwrap()
            .with_timezone(&chrono::Utc),
    )
}

fn extract(events: &[CalendarEvent]) -> appo_engine::Extraction {
    extract_availability(events, &ExtractorConfig::default()).unwrap()
}

const JUNE_10: (i32, u32, u32) = (2025, 6, 10);
const JUNE_11: (i32, u32, u32) = (2025, 6, 11);

// ── Slicing ─────────────────────────────────────────────────────────────────

#[test]
fn blocked_meeting_splits_the_day() {
    let events = vec![
        event("アポ可能", JUNE_10, (9, 0), (18, 0)),
        event("★ 会議", JUNE_10, (12, 0), (13, 0)),
    ];

    let result = extract(&events);

    assert_eq!(result.formatted, "・6/10 (火) 9:00~12:00、13:00~18:00");
    assert_eq!(result.raw.len(), 1);
    assert_eq!(
        result.raw[0].slots,
        vec![
            local_slot(JUNE_10, (9, 0), (12, 0)),
            local_slot(JUNE_10, (13, 0), (18, 0)),
        ]
    );
}

#[test]
fn blocked_events_on_other_days_are_ignored() {
    let events = vec![
        event("アポ可能", JUNE_10, (9, 0), (12, 0)),
        event("★ 会議", JUNE_11, (9, 0), (12, 0)),
    ];

    assert_eq!(extract(&events).formatted, "・6/10 (火) 9:00~12:00");
}

#[test]
fn unmarked_events_do_not_block() {
    let events = vec![
        event("アポ可能", JUNE_10, (9, 0), (12, 0)),
        event("ランチ", JUNE_10, (10, 0), (11, 0)),
    ];

    assert_eq!(extract(&events).formatted, "・6/10 (火) 9:00~12:00");
}

#[test]
fn marker_in_description_counts_as_available() {
    let events = vec![
        event("午後枠", JUNE_10, (14, 0), (16, 30)).with_description("アポ可能"),
    ];

    assert_eq!(extract(&events).formatted, "・6/10 (火) 14:00~16:30");
}

// ── Late-night rendering ────────────────────────────────────────────────────

#[test]
fn slot_ending_after_cutoff_is_open_ended() {
    let events = vec![event("アポ可能", JUNE_10, (18, 0), (23, 30))];

    assert_eq!(extract(&events).formatted, "・6/10 (火) 18:00以降");
}

#[test]
fn slot_ending_at_midnight_is_open_ended() {
    let events = vec![CalendarEvent::timed(
        "アポ可能",
        "2025-06-10T19:00:00+09:00",
        "2025-06-11T00:00:00+09:00",
    )
    .unwrap()];

    assert_eq!(extract(&events).formatted, "・6/10 (火) 19:00以降");
}

#[test]
fn slot_ending_just_before_cutoff_is_closed() {
    let events = vec![event("アポ可能", JUNE_10, (20, 0), (22, 59))];

    assert_eq!(extract(&events).formatted, "・6/10 (火) 20:00~22:59");
}

// ── All-day handling ────────────────────────────────────────────────────────

#[test]
fn long_available_event_reports_all_day() {
    let events = vec![event("アポ可能", JUNE_10, (9, 0), (22, 0))];

    let result = extract(&events);

    assert_eq!(result.formatted, "・6/10 (火) 終日");
    assert!(result.raw[0].is_all_day);
}

fn with_date_only_events() -> ExtractorConfig {
    ExtractorConfig {
        include_all_day_events: true,
        ..ExtractorConfig::default()
    }
}

#[test]
fn date_only_available_event_is_ignored_by_default() {
    let events = vec![CalendarEvent::all_day(
        "アポ可能",
        NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
    )];

    let result = extract(&events);

    assert_eq!(result.formatted, "");
    assert!(result.raw.is_empty());
}

#[test]
fn date_only_available_event_reports_all_day_when_enabled() {
    let events = vec![CalendarEvent::all_day(
        "アポ可能",
        NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
    )];

    let result = extract_availability(&events, &with_date_only_events()).unwrap();

    assert_eq!(result.formatted, "・6/11 (水) 終日");
}

#[test]
fn all_day_with_blocked_event_is_sliced() {
    // 13-hour window 09:00-22:00 with a blocked 15:00-16:00
    let events = vec![
        event("アポ可能", JUNE_10, (9, 0), (22, 0)),
        event("● 移動", JUNE_10, (15, 0), (16, 0)),
    ];

    let result = extract(&events);

    assert!(!result.raw[0].is_all_day);
    assert_eq!(
        result.raw[0].slots,
        vec![
            local_slot(JUNE_10, (9, 0), (15, 0)),
            local_slot(JUNE_10, (16, 0), (22, 0)),
        ]
    );
    assert_eq!(result.formatted, "・6/10 (火) 9:00~15:00、16:00~22:00");
}

#[test]
fn demoted_day_rebuilds_from_all_available_events() {
    let events = vec![
        event("アポ可能", JUNE_10, (7, 0), (8, 0)),
        event("アポ可能", JUNE_10, (9, 0), (23, 30)),
        event("⚫︎ 通院", JUNE_10, (10, 0), (11, 0)),
    ];

    assert_eq!(
        extract(&events).formatted,
        "・6/10 (火) 7:00~8:00、9:00~10:00、11:00以降"
    );
}

fn trip_on_june_10() -> Vec<CalendarEvent> {
    vec![
        event("アポ可能", JUNE_10, (9, 0), (18, 0)),
        CalendarEvent::all_day(
            "★ 出張",
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
        ),
    ]
}

#[test]
fn date_only_blocked_event_does_not_block_by_default() {
    let result = extract(&trip_on_june_10());

    assert_eq!(result.formatted, "・6/10 (火) 9:00~18:00");
}

#[test]
fn date_only_blocked_event_does_not_demote_all_day_by_default() {
    let events = vec![
        event("アポ可能", JUNE_10, (9, 0), (22, 0)),
        CalendarEvent::all_day(
            "● 休暇",
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
        ),
    ];

    assert_eq!(extract(&events).formatted, "・6/10 (火) 終日");
}

#[test]
fn date_only_blocked_event_removes_the_day_when_enabled() {
    let result = extract_availability(&trip_on_june_10(), &with_date_only_events()).unwrap();

    assert_eq!(result.formatted, "");
    assert_eq!(result.raw.len(), 1);
    assert!(result.raw[0].slots.is_empty());
}

// ── Output shape ────────────────────────────────────────────────────────────

#[test]
fn fully_blocked_day_produces_no_line() {
    let events = vec![
        event("アポ可能", JUNE_10, (9, 0), (12, 0)),
        event("★", JUNE_10, (8, 0), (13, 0)),
        event("アポ可能", JUNE_11, (9, 0), (12, 0)),
    ];

    let result = extract(&events);

    assert_eq!(result.formatted, "・6/11 (水) 9:00~12:00");
    assert_eq!(result.raw.len(), 2);
}

#[test]
fn days_are_sorted_by_date() {
    let events = vec![
        event("アポ可能", (2025, 6, 12), (9, 0), (10, 0)),
        event("アポ可能", JUNE_10, (9, 0), (10, 0)),
        event("アポ可能", JUNE_11, (9, 0), (10, 0)),
    ];

    let result = extract(&events);

    assert_eq!(
        result.formatted,
        "・6/10 (火) 9:00~10:00\n・6/11 (水) 9:00~10:00\n・6/12 (木) 9:00~10:00"
    );
    let dates: Vec<_> = result.raw.iter().map(|d| d.date.to_string()).collect();
    assert_eq!(dates, ["2025-06-10", "2025-06-11", "2025-06-12"]);
}

#[test]
fn holidays_are_marked_only_in_the_configured_year() {
    let events = vec![
        event("アポ可能", (2025, 11, 3), (10, 0), (12, 0)),
        event("アポ可能", (2026, 11, 3), (10, 0), (12, 0)),
    ];

    assert_eq!(
        extract(&events).formatted,
        "・11/3 (月祝) 10:00~12:00\n・11/3 (火) 10:00~12:00"
    );
}

#[test]
fn holiday_source_can_be_replaced() {
    let events = vec![event("アポ可能", JUNE_10, (9, 0), (10, 0))];
    let config = ExtractorConfig::default();

    let everything = Extractor::new(config.clone())
        .unwrap()
        .with_holidays(|_: NaiveDate| true);
    let nothing = Extractor::new(config)
        .unwrap()
        .with_holidays(NoHolidays);

    assert_eq!(everything.extract(&events).formatted, "・6/10 (火祝) 9:00~10:00");
    assert_eq!(nothing.extract(&events).formatted, "・6/10 (火) 9:00~10:00");
}

#[test]
fn events_without_times_are_skipped() {
    let mut no_end = event("アポ可能", JUNE_10, (9, 0), (10, 0));
    no_end.end = None;
    let events = vec![no_end, event("アポ可能", JUNE_11, (9, 0), (10, 0))];

    assert_eq!(extract(&events).formatted, "・6/11 (水) 9:00~10:00");
}

#[test]
fn event_with_both_markers_blocks_itself() {
    let events = vec![
        event("★アポ可能", JUNE_10, (9, 0), (12, 0)),
        event("アポ可能", JUNE_11, (9, 0), (12, 0)),
    ];

    assert_eq!(extract(&events).formatted, "・6/11 (水) 9:00~12:00");
}

#[test]
fn empty_input_yields_empty_report() {
    let result = extract(&[]);
    assert_eq!(result.formatted, "");
    assert!(result.raw.is_empty());
}

#[test]
fn custom_markers_and_cutoff() {
    let config = ExtractorConfig::from_toml_str(
        r#"
        available_marker = "[open]"
        blocked_markers = ["[busy]"]
        late_night_cutoff = "21:00"
        "#,
    )
    .unwrap();
    let events = vec![
        event("[open]", JUNE_10, (13, 0), (21, 30)),
        event("[busy] call", JUNE_10, (15, 0), (15, 30)),
        event("★ ignored", JUNE_10, (14, 0), (14, 30)),
    ];

    let result = extract_availability(&events, &config).unwrap();

    assert_eq!(result.formatted, "・6/10 (火) 13:00~15:00、15:30以降");
}

#[test]
fn raw_serializes_in_camel_case() {
    let result = extract(&[event("アポ可能", JUNE_10, (9, 0), (10, 0))]);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["raw"][0]["date"], "2025-06-10");
    assert_eq!(json["raw"][0]["isAllDay"], false);
    assert_eq!(json["raw"][0]["slots"][0]["start"], "2025-06-10T00:00:00Z");
}
