//! Rendering records for the list and the map.
//!
//! List entries are HTML fragments tagged with the record id in a `data-id`
//! attribute; a click anywhere inside an entry resolves back to the record
//! through [`ClickTarget::closest`].

use std::fmt::Write as _;

use crate::map::{Popup, PopupOptions};
use crate::record::{Record, RecordId};

/// CSS class that marks a list entry.
pub const ENTRY_CLASS: &str = "earthquake";

/// Text of the informational panel shown by the report button.
pub const ABOUT_TEXT: &str = "EarthRep is an app for reporting earthquakes.\n\
Make a click on the map, fill the form and press enter to report!\n\
If you have any questions or advice feel free to get in touch:\n\
roko.pivac@gmail.com or https://github.com/rpivac00";

/// A rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Record the entry shows.
    pub id: RecordId,
    /// HTML fragment.
    pub html: String,
}

impl ListEntry {
    /// Render the entry for a record.
    #[must_use]
    pub fn for_record(record: &Record) -> Self {
        Self {
            id: record.id().clone(),
            html: list_entry_html(record),
        }
    }

    /// A click on a value inside this entry, as the DOM would report it.
    #[must_use]
    pub fn click_target(&self) -> ClickTarget {
        ClickTarget::new(vec![
            Element::with_class("earthquake__value"),
            Element::with_class("earthquake__details"),
            Element::with_class(ENTRY_CLASS).data_id(self.id.as_str()),
            Element::with_class("earthquakes"),
        ])
    }
}

/// An element on a click path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// CSS classes.
    pub classes: Vec<String>,
    /// Value of the `data-id` attribute.
    pub data_id: Option<String>,
}

impl Element {
    /// Element with one class.
    #[must_use]
    pub fn with_class(class: &str) -> Self {
        Self {
            classes: vec![class.to_string()],
            data_id: None,
        }
    }

    /// Set the `data-id` attribute.
    #[must_use]
    pub fn data_id(mut self, id: &str) -> Self {
        self.data_id = Some(id.to_string());
        self
    }

    /// Whether the element has `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// The element path of a click, from the clicked element outward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    path: Vec<Element>,
}

impl ClickTarget {
    /// Build a click path, innermost element first.
    #[must_use]
    pub fn new(path: Vec<Element>) -> Self {
        Self { path }
    }

    /// The nearest element on the path (the target itself included) that
    /// has `class`.
    #[must_use]
    pub fn closest(&self, class: &str) -> Option<&Element> {
        self.path.iter().find(|element| element.has_class(class))
    }

    /// Id of the list entry the click landed in.
    #[must_use]
    pub fn entry_id(&self) -> Option<RecordId> {
        self.closest(ENTRY_CLASS)?
            .data_id
            .as_deref()
            .map(RecordId::from)
    }
}

/// Popup content for a record's marker.
#[must_use]
pub fn popup(record: &Record) -> Popup {
    Popup {
        content: format!("⚡️{}", escape_html(&record.label())),
        options: PopupOptions::default(),
    }
}

/// HTML list entry for a record.
#[must_use]
pub fn list_entry_html(record: &Record) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<li class="{ENTRY_CLASS} {ENTRY_CLASS}--list" data-id="{}">"#,
        escape_html(record.id().as_str())
    );
    let _ = write!(
        html,
        r#"<h2 class="earthquake__title">{}</h2>"#,
        escape_html(&record.label())
    );
    for (icon, value, unit) in [
        ("⚡️", record.strength().to_string(), "strength"),
        ("⏱", record.duration_secs().to_string(), "sec"),
        ("⏰", record.minutes_ago().to_string(), "min ago"),
        ("🌆", record.material_damage().to_string(), "material damage"),
    ] {
        let _ = write!(
            html,
            r#"<div class="earthquake__details"><span class="earthquake__icon">{icon}</span><span class="earthquake__value">{}</span><span class="earthquake__unit">{unit}</span></div>"#,
            escape_html(&value)
        );
    }
    html.push_str("</li>");
    html
}

/// One-line plain-text summary of a record.
#[must_use]
pub fn list_entry_line(record: &Record) -> String {
    let mut line = format!(
        "[{}] {} at {}: strength {}, {} sec, {} min ago",
        record.id(),
        record.label(),
        record.coords(),
        record.strength(),
        record.duration_secs(),
        record.minutes_ago()
    );
    if !record.material_damage().is_empty() {
        let _ = write!(line, ", damage: {}", record.material_damage());
    }
    line
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Coordinates;
    use chrono::{TimeZone, Utc};

    fn sample_record(note: &str) -> Record {
        Record::new_at(
            Utc.timestamp_millis_opt(1_700_000_123_456).unwrap(),
            Coordinates::new(45.0, 15.0),
            4.5,
            30.0,
            10.0,
            note.to_string(),
        )
    }

    #[test]
    fn test_list_entry_html_carries_id_and_values() {
        let record = sample_record("minor cracks");
        let html = list_entry_html(&record);

        assert!(html.starts_with(r#"<li class="earthquake earthquake--list" data-id="0000123456">"#));
        assert!(html.contains(&record.label()));
        assert!(html.contains(r#"<span class="earthquake__value">4.5</span>"#));
        assert!(html.contains(r#"<span class="earthquake__value">30</span>"#));
        assert!(html.contains(r#"<span class="earthquake__value">10</span>"#));
        assert!(html.contains("minor cracks"));
        assert!(html.ends_with("</li>"));
    }

    #[test]
    fn test_list_entry_html_escapes_note() {
        let html = list_entry_html(&sample_record("<script>alert(1)</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_popup_content() {
        let record = sample_record("");
        let popup = popup(&record);
        assert_eq!(popup.content, format!("⚡️{}", record.label()));
        assert_eq!(popup.options, PopupOptions::default());
    }

    #[test]
    fn test_list_entry_line() {
        let line = list_entry_line(&sample_record("minor cracks"));
        assert!(line.starts_with("[0000123456] Earthquake on"));
        assert!(line.contains("45,15"));
        assert!(line.contains("strength 4.5"));
        assert!(line.ends_with("damage: minor cracks"));

        let line = list_entry_line(&sample_record(""));
        assert!(!line.contains("damage"));
    }

    #[test]
    fn test_click_inside_entry_resolves_id() {
        let entry = ListEntry::for_record(&sample_record(""));
        let target = entry.click_target();

        assert_eq!(target.entry_id(), Some(RecordId::from("0000123456")));
    }

    #[test]
    fn test_click_outside_entry() {
        let target = ClickTarget::new(vec![
            Element::with_class("form__input"),
            Element::with_class("earthquakes"),
        ]);
        assert!(target.closest(ENTRY_CLASS).is_none());
        assert!(target.entry_id().is_none());

        assert!(ClickTarget::default().entry_id().is_none());
    }

    #[test]
    fn test_entry_without_data_id() {
        let target = ClickTarget::new(vec![Element::with_class(ENTRY_CLASS)]);
        assert!(target.closest(ENTRY_CLASS).is_some());
        assert!(target.entry_id().is_none());
    }

    #[test]
    fn test_closest_includes_target() {
        let target = ClickTarget::new(vec![Element::with_class(ENTRY_CLASS).data_id("1")]);
        assert_eq!(target.entry_id(), Some(RecordId::from("1")));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"a & b < c > "d" 'e'"#),
            "a &amp; b &lt; c &gt; &quot;d&quot; &#39;e&#39;"
        );
    }
}
