// File: ./src/calendar.rs
// Accumulates events and serializes them as an iCalendar feed.
use crate::config::Config;
use crate::model::Event;
use anyhow::{Context, Result};
use icalendar::{Calendar, Component};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn format_iso_duration(duration: chrono::Duration) -> String {
    let mins = duration.num_minutes().max(0);
    if mins > 0 && mins % (24 * 60) == 0 {
        format!("P{}D", mins / (24 * 60))
    } else if mins > 0 && mins % 60 == 0 {
        format!("PT{}H", mins / 60)
    } else {
        format!("PT{}M", mins)
    }
}

fn to_vevent(event: &Event) -> icalendar::Event {
    let mut vevent = icalendar::Event::new();
    vevent.uid(&event.uid());
    vevent.summary(event.title());
    // DTSTAMP is pinned to the start so the feed only changes when the listing does.
    vevent.timestamp(event.start_utc());

    // UTC form: a TZID would need a matching VTIMEZONE. X-WR-TIMEZONE still
    // tells clients which zone to display.
    vevent.add_property(
        "DTSTART",
        &event.start_utc().format("%Y%m%dT%H%M%SZ").to_string(),
    );

    vevent.add_property("DURATION", &format_iso_duration(event.duration()));
    vevent.add_property("LOCATION", event.location());
    vevent.add_property("URL", event.url().as_str());
    if let Some(description) = event.description() {
        vevent.description(description);
    }
    vevent
}

pub struct CalendarWriter {
    name: String,
    timezone: String,
    events: Vec<Event>,
    uids: HashSet<String>,
}

impl CalendarWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            name: config.calendar_name.clone(),
            timezone: config.timezone.clone(),
            events: Vec::new(),
            uids: HashSet::new(),
        }
    }

    /// Adds an event unless one with the same UID (same page, same start)
    /// is already present. Returns whether it was added.
    pub fn add(&mut self, event: Event) -> bool {
        if !self.uids.insert(event.uid()) {
            log::debug!("Duplicate event skipped: {} at {}", event.title(), event.start());
            return false;
        }
        self.events.push(event);
        true
    }

    /// Returns the number of events actually added.
    pub fn extend<I: IntoIterator<Item = Event>>(&mut self, events: I) -> usize {
        let mut added = 0;
        for event in events {
            if self.add(event) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn to_ics_string(&self) -> String {
        let mut calendar = Calendar::new();
        calendar.name(&self.name);
        calendar.timezone(self.timezone.as_str());
        for event in &self.events {
            calendar.push(to_vevent(event));
        }
        calendar.to_string()
    }

    /// Writes the feed to `path`, creating its directory if needed. The file
    /// is replaced atomically so readers never see a half-written feed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        }
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, self.to_ics_string())
            .with_context(|| format!("Failed to write {:?}", tmp_path))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to move {:?} into place", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chrono_tz::America::New_York;
    use url::Url;

    fn event(title: &str, path: &str, description: Option<&str>) -> Event {
        Event::new(
            title.to_string(),
            New_York.with_ymd_and_hms(2025, 11, 1, 20, 0, 0).unwrap(),
            Duration::hours(2),
            "Roulette Intermedium, 509 Atlantic Ave, Brooklyn, NY".to_string(),
            Url::parse(&format!("https://roulette.org{}", path)).unwrap(),
            description.map(str::to_string),
        )
    }

    #[test]
    fn test_iso_duration() {
        assert_eq!(format_iso_duration(Duration::hours(2)), "PT2H");
        assert_eq!(format_iso_duration(Duration::minutes(90)), "PT90M");
        assert_eq!(format_iso_duration(Duration::days(1)), "P1D");
    }

    #[test]
    fn test_vevent_fields() {
        let mut writer = CalendarWriter::new(&Config::default());
        writer.add(event("Show A", "/e/1", Some("Tickets $20")));
        let ics = writer.to_ics_string();

        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("SUMMARY:Show A"));
        // 8 pm EDT
        assert!(ics.contains("DTSTART:20251102T000000Z"));
        assert!(ics.contains("DTSTAMP:20251102T000000Z"));
        assert!(ics.contains("DURATION:PT2H"));
        assert!(ics.contains("URL:https://roulette.org/e/1"));
        assert!(ics.contains("DESCRIPTION:Tickets $20"));
        assert!(ics.contains("X-WR-TIMEZONE:America/New_York"));
    }

    #[test]
    fn test_start_is_utc_without_tzid_reference() {
        let mut writer = CalendarWriter::new(&Config::default());
        writer.add(Event::new(
            "Winter Show".to_string(),
            New_York.with_ymd_and_hms(2026, 1, 10, 19, 30, 0).unwrap(),
            Duration::hours(2),
            "Roulette".to_string(),
            Url::parse("https://roulette.org/e/9").unwrap(),
            None,
        ));
        let ics = writer.to_ics_string();
        // EST is UTC-5
        assert!(ics.contains("DTSTART:20260111T003000Z"));
        assert!(!ics.contains("TZID="));
        assert!(!ics.contains("BEGIN:VTIMEZONE"));
    }

    #[test]
    fn test_event_without_description_has_no_field() {
        let mut writer = CalendarWriter::new(&Config::default());
        writer.add(event("Show A", "/e/1", None));
        assert!(!writer.to_ics_string().contains("DESCRIPTION"));
    }

    #[test]
    fn test_duplicates_are_ignored() {
        let mut writer = CalendarWriter::new(&Config::default());
        assert!(writer.add(event("Show A", "/e/1", None)));
        assert!(!writer.add(event("Show A (again)", "/e/1", None)));
        assert_eq!(
            writer.extend(vec![event("Show B", "/e/2", None), event("Show A", "/e/1", None)]),
            1
        );
        assert_eq!(writer.len(), 2);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let build = || {
            let mut writer = CalendarWriter::new(&Config::default());
            writer.add(event("Show A", "/e/1", Some("Tickets $20")));
            writer.add(event("Show B", "/e/2", None));
            writer.to_ics_string()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs").join("roulette.ics");
        let mut writer = CalendarWriter::new(&Config::default());
        writer.add(event("Show A", "/e/1", None));
        writer.write(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("BEGIN:VCALENDAR"));
        assert!(written.contains("SUMMARY:Show A"));
        assert!(!path.with_extension("tmp").exists());
    }
}
