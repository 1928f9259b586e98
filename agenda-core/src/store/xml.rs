//! XML file storage.
//!
//! Layout:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <appointments>
//!   <appointment id="...">
//!     <title>...</title>
//!     <dateStart>TICKS</dateStart>
//!     <dateEnd>TICKS</dateEnd>
//!   </appointment>
//! </appointments>
//! ```

use std::io::Cursor;
use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use roxmltree::Node;

use super::AppointmentStore;
use crate::appointment::Appointment;
use crate::error::{StoreError, StoreResult};
use crate::ticks;

const ROOT: &str = "appointments";
const APPOINTMENT: &str = "appointment";
const ID: &str = "id";
const TITLE: &str = "title";
const DATE_START: &str = "dateStart";
const DATE_END: &str = "dateEnd";

/// Stores appointments in a single XML file that is replaced on every save.
#[derive(Debug, Clone)]
pub struct XmlFileStore {
    path: PathBuf,
}

impl XmlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        XmlFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "appointments.xml".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl AppointmentStore for XmlFileStore {
    fn save(&self, appointments: &[Appointment]) -> StoreResult<()> {
        let content = to_xml(appointments)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        // Write next to the target, then swap it in
        let temp = self.temp_path();
        std::fs::write(&temp, content)?;
        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), count = appointments.len(), "saved appointments");
        Ok(())
    }

    fn load(&self) -> StoreResult<Vec<Appointment>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no appointment file yet");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let appointments = from_xml(&content)?;

        tracing::debug!(path = %self.path.display(), count = appointments.len(), "loaded appointments");
        Ok(appointments)
    }
}

// =============================================================================
// Serialization
// =============================================================================

/// Serialize the full collection to an XML document.
pub fn to_xml(appointments: &[Appointment]) -> StoreResult<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(&mut writer, Event::Start(BytesStart::new(ROOT)))?;

    for appointment in appointments {
        let id = escape(appointment.id(), true)?;
        let mut elem = BytesStart::new(APPOINTMENT);
        elem.push_attribute((ID.as_bytes(), id.as_bytes()));
        write(&mut writer, Event::Start(elem))?;

        write_text_element(&mut writer, TITLE, &escape(appointment.title(), false)?)?;
        write_text_element(
            &mut writer,
            DATE_START,
            &ticks::to_ticks(&appointment.start())?.to_string(),
        )?;
        write_text_element(
            &mut writer,
            DATE_END,
            &ticks::to_ticks(&appointment.end())?.to_string(),
        )?;

        write(&mut writer, Event::End(BytesEnd::new(APPOINTMENT)))?;
    }

    write(&mut writer, Event::End(BytesEnd::new(ROOT)))?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| StoreError::Xml(e.to_string()))
}

/// Write `<name>text</name>`, where `text` is already escaped.
fn write_text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) -> StoreResult<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::from_escaped(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

/// Escape a value for the file, rejecting characters XML 1.0 cannot represent.
///
/// Carriage returns become character references so the parser's line-end
/// normalization leaves them alone. In attributes the same goes for tabs and
/// newlines, which would otherwise be read back as spaces.
fn escape(value: &str, attribute: bool) -> StoreResult<String> {
    if let Some(c) = value.chars().find(|c| !is_xml_char(*c)) {
        return Err(StoreError::InvalidCharacter(c));
    }

    let escaped = quick_xml::escape::escape(value);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '\r' => out.push_str("&#xD;"),
            '\n' if attribute => out.push_str("&#xA;"),
            '\t' if attribute => out.push_str("&#x9;"),
            c => out.push(c),
        }
    }
    Ok(out)
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event) -> StoreResult<()> {
    writer
        .write_event(event)
        .map_err(|e| StoreError::Xml(e.to_string()))
}

// =============================================================================
// Deserialization
// =============================================================================

/// Parse an XML document into appointments.
///
/// Every child element of the root is read as one appointment record. A single
/// bad record fails the whole parse.
pub fn from_xml(content: &str) -> StoreResult<Vec<Appointment>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let doc = roxmltree::Document::parse(content).map_err(|e| StoreError::Xml(e.to_string()))?;

    doc.root_element()
        .children()
        .filter(|n| n.is_element())
        .map(parse_appointment)
        .collect()
}

fn parse_appointment(node: Node) -> StoreResult<Appointment> {
    let id = node.attribute(ID).ok_or_else(|| {
        StoreError::MalformedRecord(format!("<{}> without '{}' attribute", node.tag_name().name(), ID))
    })?;

    let title = child(node, TITLE)?.text().unwrap_or_default();
    let start = ticks::from_ticks(parse_ticks(node, DATE_START)?)?;
    let end = ticks::from_ticks(parse_ticks(node, DATE_END)?)?;

    Ok(Appointment::new(id, title, start, end))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> StoreResult<Node<'a, 'input>> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .ok_or_else(|| StoreError::MalformedRecord(format!("appointment without <{name}>")))
}

fn parse_ticks(node: Node, name: &str) -> StoreResult<i64> {
    let text = child(node, name)?.text().unwrap_or_default();

    text.trim()
        .parse::<i64>()
        .map_err(|e| StoreError::MalformedRecord(format!("<{name}> value '{text}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, Timelike};
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn sample() -> Vec<Appointment> {
        vec![
            Appointment::new("1-a", "Standup", at(2024, 1, 2, 9, 0), at(2024, 1, 2, 9, 30)),
            Appointment::new("2-b", "Gym & <Sauna>", at(2024, 1, 1, 18, 0), at(2024, 1, 1, 19, 0)),
            Appointment::new("2-b", "Gym & <Sauna>", at(2024, 1, 8, 18, 0), at(2024, 1, 8, 19, 0)),
            Appointment::new(
                "3-\"c\"",
                "  padded  ",
                at(2024, 2, 29, 0, 0),
                at(2024, 2, 29, 23, 59).with_nanosecond(999_999_900).unwrap(),
            ),
        ]
    }

    #[test]
    fn file_layout_matches_expected_format() {
        let xml = to_xml(&sample()[..1]).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#), "{xml}");
        assert!(xml.contains(r#"<appointment id="1-a">"#), "{xml}");
        assert!(xml.contains("<title>Standup</title>"), "{xml}");
        assert!(xml.contains("<dateStart>638397828000000000</dateStart>"), "{xml}");
        assert!(xml.contains("<dateEnd>638397846000000000</dateEnd>"), "{xml}");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = XmlFileStore::new(dir.path().join("appointments.xml"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn empty_title_round_trips() {
        let appts = vec![Appointment::new("x", "", at(2024, 1, 2, 9, 0), at(2024, 1, 2, 10, 0))];
        assert_eq!(from_xml(&to_xml(&appts).unwrap()).unwrap(), appts);
    }

    #[test]
    fn save_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let store = XmlFileStore::new(dir.path().join("appointments.xml"));

        store.save(&sample()).unwrap();
        store.save(&sample()[..1]).unwrap();

        assert_eq!(store.load().unwrap(), sample()[..1].to_vec());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = XmlFileStore::new(dir.path().join("nested/deeper/appointments.xml"));

        store.save(&sample()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = XmlFileStore::new(blocker.join("appointments.xml"));

        assert!(store.save(&sample()).is_err());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = XmlFileStore::new(dir.path().join("missing.xml"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn reads_file_written_by_previous_versions() {
        let content = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n\
            <appointments>\r\n\
            \x20 <appointment id=\"638397000000000000-3f2b\">\r\n\
            \x20   <title>Standup</title>\r\n\
            \x20   <dateStart>638397828000000000</dateStart>\r\n\
            \x20   <dateEnd>638397846000000000</dateEnd>\r\n\
            \x20 </appointment>\r\n\
            </appointments>";

        let appts = from_xml(content).unwrap();
        assert_eq!(appts.len(), 1);
        assert_eq!(appts[0].id(), "638397000000000000-3f2b");
        assert_eq!(appts[0].start(), at(2024, 1, 2, 9, 0));
        assert_eq!(appts[0].end(), at(2024, 1, 2, 9, 30));
    }

    #[test]
    fn truncated_file_fails() {
        let xml = to_xml(&sample()).unwrap();
        let truncated = &xml[..xml.len() / 2];
        assert!(matches!(from_xml(truncated), Err(StoreError::Xml(_))));
    }

    #[test]
    fn record_without_id_fails_whole_load() {
        let xml = r#"<appointments>
            <appointment id="ok"><title>A</title><dateStart>0</dateStart><dateEnd>0</dateEnd></appointment>
            <appointment><title>B</title><dateStart>0</dateStart><dateEnd>0</dateEnd></appointment>
        </appointments>"#;
        assert!(matches!(from_xml(xml), Err(StoreError::MalformedRecord(_))));
    }

    #[test]
    fn record_without_end_fails() {
        let xml = r#"<appointments>
            <appointment id="x"><title>A</title><dateStart>0</dateStart></appointment>
        </appointments>"#;
        assert!(matches!(from_xml(xml), Err(StoreError::MalformedRecord(_))));
    }

    #[test]
    fn non_numeric_ticks_fail() {
        let xml = r#"<appointments>
            <appointment id="x"><title>A</title><dateStart>02.01.2024</dateStart><dateEnd>0</dateEnd></appointment>
        </appointments>"#;
        assert!(matches!(from_xml(xml), Err(StoreError::MalformedRecord(_))));
    }

    #[test]
    fn negative_ticks_fail() {
        let xml = r#"<appointments>
            <appointment id="x"><title>A</title><dateStart>-5</dateStart><dateEnd>0</dateEnd></appointment>
        </appointments>"#;
        assert!(matches!(from_xml(xml), Err(StoreError::InvalidTicks(-5))));
    }

    #[test]
    fn control_characters_fail_the_save_and_keep_the_old_file() {
        let dir = TempDir::new().unwrap();
        let store = XmlFileStore::new(dir.path().join("appointments.xml"));
        store.save(&sample()).unwrap();

        let mut appts = sample();
        appts.push(Appointment::new(
            "4-d",
            "bad\u{1b}[0m title",
            at(2024, 3, 1, 9, 0),
            at(2024, 3, 1, 10, 0),
        ));

        assert!(matches!(store.save(&appts), Err(StoreError::InvalidCharacter('\u{1b}'))));
        assert_eq!(store.load().unwrap(), sample());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn control_character_in_id_is_rejected() {
        let appts = vec![Appointment::new("a\u{0}b", "ok", at(2024, 1, 2, 9, 0), at(2024, 1, 2, 10, 0))];
        assert!(matches!(to_xml(&appts), Err(StoreError::InvalidCharacter('\u{0}'))));
    }

    #[test]
    fn line_breaks_and_tabs_round_trip() {
        let appts = vec![
            Appointment::new("x", "a\rb", at(2024, 1, 2, 9, 0), at(2024, 1, 2, 10, 0)),
            Appointment::new("y", "one\r\ntwo\tthree\n", at(2024, 1, 2, 9, 0), at(2024, 1, 2, 10, 0)),
            Appointment::new("id\twith\nbreaks\r", "z", at(2024, 1, 2, 9, 0), at(2024, 1, 2, 10, 0)),
        ];

        let xml = to_xml(&appts).unwrap();
        assert!(xml.contains("<title>a&#xD;b</title>"), "{xml}");
        assert_eq!(from_xml(&xml).unwrap(), appts);
    }

    #[test]
    fn load_of_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("appointments.xml");
        std::fs::write(&path, "<appointments><appointment id=").unwrap();

        assert!(XmlFileStore::new(path).load().is_err());
    }
}
