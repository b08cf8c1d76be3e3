use anyhow::Result;
use chrono::{DateTime, Utc};
use magam_core::{AssignmentRecord, deadline_to_utc};

pub struct CalendarEvent {
    pub uid: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub summary: String,
    pub description: String,
}

/// Resolve each record's wall-clock window to UTC in the given timezone and
/// shape it for export. Record ids double as stable UIDs.
pub fn records_to_events(records: &[AssignmentRecord], tz: &str) -> Result<Vec<CalendarEvent>> {
    let mut events = Vec::new();

    for r in records {
        let start_utc = deadline_to_utc(r.date, r.start_time, tz)?;
        let end_utc = deadline_to_utc(r.date, r.end_time, tz)?;

        let mut description = format!(
            "유형: {}\n중요도: {}\n예상 소요: {}시간",
            r.event_type.label_ko(),
            r.priority.label_ko(),
            r.estimated_hours
        );
        if !r.description.is_empty() {
            description.push('\n');
            description.push_str(&r.description);
        }

        events.push(CalendarEvent {
            uid: r.id.clone(),
            start_utc,
            end_utc,
            summary: format!("[{}] {}", r.event_type.label_ko(), r.title),
            description,
        });
    }

    Ok(events)
}

/// Emit a minimal ICS calendar containing VEVENT blocks. DTSTART/DTEND are
/// UTC.
pub fn events_to_ics(events: &[CalendarEvent]) -> String {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//magam//EN\n");

    for e in events {
        let dtstart = e.start_utc.format("%Y%m%dT%H%M%SZ");
        let dtend = e.end_utc.format("%Y%m%dT%H%M%SZ");

        s.push_str("BEGIN:VEVENT\n");
        s.push_str(&format!("UID:{}@magam\n", e.uid));
        s.push_str(&format!("DTSTART:{}\n", dtstart));
        s.push_str(&format!("DTEND:{}\n", dtend));
        s.push_str(&format!("SUMMARY:{}\n", escape_ics(&e.summary)));
        s.push_str(&format!("DESCRIPTION:{}\n", escape_ics(&e.description)));
        s.push_str("END:VEVENT\n");
    }

    s.push_str("END:VCALENDAR\n");
    s
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
