//! Document information read from the PDF trailer's `/Info` dictionary and the
//! catalog's `/Lang` entry.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Utc};
use lopdf::{Dictionary, Document, Object};

use crate::models::DocumentInfo;

/// Raw `/Info` values as found in the document, already decoded to text.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InfoFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub keywords: Option<String>,
    pub language: Option<String>,
}

impl InfoFields {
    pub fn read(doc: &Document) -> Self {
        let mut fields = InfoFields {
            language: catalog_language(doc),
            ..Default::default()
        };

        let Some(info) = info_dictionary(doc) else {
            tracing::debug!("PDF has no /Info dictionary");
            return fields;
        };

        fields.title = string_entry(doc, info, b"Title");
        fields.author = string_entry(doc, info, b"Author");
        fields.subject = string_entry(doc, info, b"Subject");
        fields.creator = string_entry(doc, info, b"Creator");
        fields.producer = string_entry(doc, info, b"Producer");
        fields.creation_date = string_entry(doc, info, b"CreationDate");
        fields.mod_date = string_entry(doc, info, b"ModDate");
        fields.keywords = string_entry(doc, info, b"Keywords");
        fields
    }

    /// Resolve every field to its display value. `fallback_title` is used
    /// when the document carries no title of its own.
    pub fn into_document_info(self, fallback_title: &str) -> DocumentInfo {
        DocumentInfo {
            title: self.title.unwrap_or_else(|| fallback_title.to_string()),
            author: self.author.unwrap_or_else(|| "Unknown".to_string()),
            subject: self.subject.unwrap_or_default(),
            creator: self.creator.unwrap_or_default(),
            producer: self.producer.unwrap_or_default(),
            creation_date: self.creation_date.as_deref().map(display_date).unwrap_or_default(),
            mod_date: self.mod_date.as_deref().map(display_date).unwrap_or_default(),
            keywords: self.keywords.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
        }
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    resolve(doc, info)?.as_dict().ok()
}

fn catalog_language(doc: &Document) -> Option<String> {
    let root = doc.trailer.get(b"Root").ok()?;
    let catalog = resolve(doc, root)?.as_dict().ok()?;
    string_entry(doc, catalog, b"Lang")
}

fn string_entry(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = resolve(doc, dict.get(key).ok()?)?;
    match value {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        Object::Name(bytes) => decode_pdf_string(bytes),
        _ => None,
    }
}

/// Decode a PDF text string. Strings with a byte order mark (or that look like
/// UTF-16) are decoded as UTF-16; anything else is read as UTF-8, falling back
/// to Latin-1. Returns `None` for blank strings.
pub fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    let decoded = if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        decode_utf16(rest, u16::from_be_bytes)
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        decode_utf16(rest, u16::from_le_bytes)
    } else if looks_like_utf16(bytes) {
        decode_utf16(bytes, u16::from_be_bytes)
    } else {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        }
    };

    let trimmed = decoded.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// More than a third of the bytes being NUL suggests BOM-less UTF-16.
fn looks_like_utf16(bytes: &[u8]) -> bool {
    if bytes.len() < 2 {
        return false;
    }
    let null_count = bytes.iter().filter(|&&b| b == 0).count();
    null_count > bytes.len() / 3
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .filter(|&c| c != '\0')
        .collect()
}

/// Render a PDF date as RFC 3339 UTC with millisecond precision. Values that
/// do not parse are returned as written.
pub fn display_date(raw: &str) -> String {
    match parse_pdf_date(raw) {
        Some(date) => date.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => raw.trim().to_string(),
    }
}

/// Parse the PDF date format `D:YYYYMMDDHHmmSSOHH'mm'`. Everything after the
/// year is optional; a missing offset means UTC.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, zone) = s.split_at(digits_end);
    if digits.len() < 4 || digits.len() > 14 || digits.len() % 2 != 0 {
        return None;
    }

    let field = |start: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + 2) {
            Some(part) => part.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = digits[..4].parse().ok()?;
    let month = field(4, 1)?;
    let day = field(6, 1)?;
    let hour = field(8, 0)?;
    let minute = field(10, 0)?;
    let second = field(12, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = parse_offset(zone)?;
    let local = offset.from_local_datetime(&naive).single()?;
    Some(local.with_timezone(&Utc))
}

fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let mut chars = zone.chars();
    let sign = match chars.next() {
        None | Some('Z') | Some('z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let rest: String = chars.filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = rest.get(..2)?.parse().ok()?;
    let minutes: i32 = match rest.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
