// Static event reference data.
use once_cell::sync::Lazy;
use serde::Serialize;

/// Attendance event id used for the initial check-in at the registration desk.
pub const REGISTRATION_DESK: &str = "registration-desk";

/// The only online (gaming) event; every other event is held on site.
pub const ONLINE_EVENT_ID: &str = "pixel-showdown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventMode {
    Online,
    Offline,
}

impl EventMode {
    pub fn of(event_id: &str) -> EventMode {
        if event_id == ONLINE_EVENT_ID {
            EventMode::Online
        } else {
            EventMode::Offline
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventMode::Online => "Online",
            EventMode::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub registration_fee: u32,
}

impl Event {
    pub fn new(id: &str, title: &str, registration_fee: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            registration_fee,
        }
    }

    pub fn mode(&self) -> EventMode {
        EventMode::of(&self.id)
    }
}

static CATALOG: Lazy<EventCatalog> = Lazy::new(|| {
    EventCatalog::new(vec![
        Event::new("code-quest", "Code Quest", 250),
        Event::new("web-weave", "Web Weave", 250),
        Event::new("tech-quiz", "Tech Quiz", 150),
        Event::new("paper-trail", "Paper Trail", 200),
        Event::new("circuit-craft", "Circuit Craft", 200),
        Event::new("pixel-showdown", "Pixel Showdown", 300),
    ])
});

/// Ordered list of known events, looked up by id.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// The festival's built-in catalog.
    pub fn standard() -> &'static EventCatalog {
        &CATALOG
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Display title, falling back to the raw id for unknown events.
    pub fn title_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|e| e.title.as_str()).unwrap_or(id)
    }

    /// Comma-joined display titles for a selection.
    pub fn titles(&self, ids: &[String]) -> String {
        ids.iter()
            .map(|id| self.title_of(id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pixel_showdown_is_online() {
        let catalog = EventCatalog::standard();
        for event in catalog.events() {
            let expected = if event.id == "pixel-showdown" {
                EventMode::Online
            } else {
                EventMode::Offline
            };
            assert_eq!(event.mode(), expected, "{}", event.id);
        }
        assert_eq!(EventMode::of("unknown-event"), EventMode::Offline);
    }

    #[test]
    fn titles_fall_back_to_ids() {
        let catalog = EventCatalog::standard();
        let ids = vec!["code-quest".to_string(), "mystery".to_string()];
        assert_eq!(catalog.titles(&ids), "Code Quest, mystery");
        assert_eq!(catalog.titles(&[]), "");
    }
}
