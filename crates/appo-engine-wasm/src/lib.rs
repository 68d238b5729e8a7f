//! WASM bindings for appo-engine.
//!
//! Exposes availability extraction and slot subtraction to JavaScript via
//! `wasm-bindgen`. All complex types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p appo-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/appo-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/appo_engine_wasm.wasm
//! ```

use appo_engine::{
    extract_availability, subtract_slots, CalendarEvent, ExtractResponse, ExtractorConfig,
    TimeSlot,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SlotDto {
    start: String,
    end: String,
}

impl From<&TimeSlot> for SlotDto {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            start: slot.start.to_rfc3339(),
            end: slot.end.to_rfc3339(),
        }
    }
}

/// Events arrive either as a Google events-list response or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum EventsInput {
    List { items: Vec<CalendarEvent> },
    Bare(Vec<CalendarEvent>),
}

impl EventsInput {
    fn into_events(self) -> Vec<CalendarEvent> {
        match self {
            EventsInput::List { items } => items,
            EventsInput::Bare(events) => events,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON-in, JSON-out implementations (native-testable)
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_slots_json(json: &str) -> Result<Vec<TimeSlot>, String> {
    let inputs: Vec<SlotDto> =
        serde_json::from_str(json).map_err(|e| format!("Invalid slots JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = parse_datetime(&input.start)?;
            let end = parse_datetime(&input.end)?;
            Ok(TimeSlot::new(start, end))
        })
        .collect()
}

fn extract_json(events_json: &str, config_json: Option<&str>) -> Result<String, String> {
    let events = serde_json::from_str::<EventsInput>(events_json)
        .map_err(|e| format!("Invalid events JSON: {}", e))?
        .into_events();
    let config = match config_json {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str::<ExtractorConfig>(raw)
            .map_err(|e| format!("Invalid config JSON: {}", e))?,
        _ => ExtractorConfig::default(),
    };

    let extraction = extract_availability(&events, &config).map_err(|e| e.to_string())?;
    let response = ExtractResponse::from(extraction);

    serde_json::to_string(&response).map_err(|e| format!("Serialization error: {}", e))
}

fn subtract_json(available_json: &str, blocked_json: &str) -> Result<String, String> {
    let available = parse_slots_json(available_json)?;
    let blocked = parse_slots_json(blocked_json)?;

    let dtos: Vec<SlotDto> = subtract_slots(&available, &blocked)
        .iter()
        .map(SlotDto::from)
        .collect();

    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Extract availability from calendar events.
///
/// `events_json` is either a Google Calendar events-list response
/// (`{"items": [...]}`) or a bare array of events. `config_json` optionally
/// overrides extraction settings using the same keys as the TOML config.
/// Returns the success response as a JSON string `{success, formatted, raw}`.
#[wasm_bindgen(js_name = "extractAvailability")]
pub fn extract_availability_js(
    events_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    extract_json(events_json, config_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Subtract blocked intervals from available ones.
///
/// Both arguments are JSON arrays of `{start, end}` objects with RFC 3339
/// datetime strings. Returns the remaining intervals in the same shape.
#[wasm_bindgen(js_name = "subtractSlots")]
pub fn subtract_slots_js(available_json: &str, blocked_json: &str) -> Result<String, JsValue> {
    subtract_json(available_json, blocked_json).map_err(|e| JsValue::from_str(&e))
}
