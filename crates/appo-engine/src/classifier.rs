//! Split events into available and blocked sets by marker substrings.
//!
//! The two sets are computed independently with case-sensitive substring
//! matching, so an event can land in both. Such an event is kept in both sets:
//! its own window is then subtracted from itself, which makes "blocked" win.
//!
//! Date-only events are dropped here unless
//! [`ExtractorConfig::include_all_day_events`] is set.

use crate::config::ExtractorConfig;
use crate::event::CalendarEvent;

/// Events partitioned by marker. Both lists preserve input order.
#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    pub available: Vec<&'a CalendarEvent>,
    pub blocked: Vec<&'a CalendarEvent>,
}

/// The title or description contains `marker`.
pub fn is_available(event: &CalendarEvent, marker: &str) -> bool {
    event.title.contains(marker)
        || event
            .description
            .as_deref()
            .is_some_and(|description| description.contains(marker))
}

/// The title contains any of `markers`.
pub fn is_blocked(event: &CalendarEvent, markers: &[String]) -> bool {
    markers.iter().any(|marker| event.title.contains(marker.as_str()))
}

pub fn classify<'a>(events: &'a [CalendarEvent], config: &ExtractorConfig) -> Classification<'a> {
    let mut classification = Classification::default();

    for event in events {
        let available = is_available(event, &config.available_marker);
        let blocked = is_blocked(event, &config.blocked_markers);

        if (available || blocked) && event.is_all_day() && !config.include_all_day_events {
            tracing::warn!(title = %event.title, "skipping date-only event");
            continue;
        }
        if available && blocked {
            tracing::warn!(title = %event.title, "event carries both available and blocked markers");
        }
        if available {
            classification.available.push(event);
        }
        if blocked {
            classification.blocked.push(event);
        }
    }

    tracing::debug!(
        total = events.len(),
        available = classification.available.len(),
        blocked = classification.blocked.len(),
        "classified events"
    );
    classification
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> CalendarEvent {
        CalendarEvent::timed(title, "2025-06-10T09:00:00+09:00", "2025-06-10T10:00:00+09:00")
            .unwrap()
    }

    #[test]
    fn markers_in_title_or_description() {
        let config = ExtractorConfig::default();
        let events = vec![
            titled("アポ可能"),
            titled("作業").with_description("本日アポ可能です"),
            titled("★ 会議"),
            titled("● 移動"),
            titled("⚫︎ 通院"),
            titled("ランチ"),
        ];
        let c = classify(&events, &config);
        assert_eq!(c.available.len(), 2);
        assert_eq!(c.blocked.len(), 3);
        assert_eq!(c.blocked[0].title, "★ 会議");
    }

    #[test]
    fn blocked_markers_ignore_description() {
        let config = ExtractorConfig::default();
        let event = titled("会議").with_description("★重要");
        assert!(!is_blocked(&event, &config.blocked_markers));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let markers = vec!["NG".to_string()];
        assert!(is_blocked(&titled("NG: dentist"), &markers));
        assert!(!is_blocked(&titled("ng: dentist"), &markers));
        assert!(!is_available(&titled("open"), "OPEN"));
    }

    #[test]
    fn date_only_events_need_opt_in() {
        let june10 = chrono::NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let events = vec![
            CalendarEvent::all_day("★ 出張", june10, june10.succ_opt().unwrap()),
            CalendarEvent::all_day("アポ可能", june10, june10.succ_opt().unwrap()),
            titled("アポ可能"),
        ];

        let c = classify(&events, &ExtractorConfig::default());
        assert_eq!(c.available.len(), 1);
        assert!(c.blocked.is_empty());

        let config = ExtractorConfig {
            include_all_day_events: true,
            ..ExtractorConfig::default()
        };
        let c = classify(&events, &config);
        assert_eq!(c.available.len(), 2);
        assert_eq!(c.blocked.len(), 1);
    }

    #[test]
    fn dual_marked_event_is_in_both_sets() {
        let config = ExtractorConfig::default();
        let events = vec![titled("★アポ可能")];
        let c = classify(&events, &config);
        assert_eq!(c.available.len(), 1);
        assert_eq!(c.blocked.len(), 1);
    }
}
