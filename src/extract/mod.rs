pub mod schema;

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{AssemblyError, FieldError};
use crate::page::CardPage;

// Thousands separators the wiki uses for stat values: ASCII comma,
// full-width comma, and any stray whitespace.
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,，\s]+").unwrap());

/// How a page-bound field's raw text is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Base-10 integer after separator removal.
    Integer,
    /// Verbatim text after label stripping.
    Text,
    /// First line only; trailing footnote lines are dropped.
    FirstLine,
}

/// A field read from the document: where, what to strip, how to coerce.
#[derive(Debug)]
pub struct PageField {
    pub locator: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug)]
pub enum FieldSource {
    Page(PageField),
    /// Substituted from the card name the caller searched for, never read
    /// from the page (the page titles the upgraded variant, the caller
    /// wants the name they typed).
    QueryLabel,
}

/// One schema column: output header label plus where its value comes from.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub source: FieldSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(u32),
    Text(String),
}

/// One fully populated output row, in schema order. Either all 13 fields
/// extracted or the record does not exist — partial rows are never built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    values: Vec<FieldValue>,
}

impl CardRecord {
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn csv_cells(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| match v {
                FieldValue::Int(n) => n.to_string(),
                FieldValue::Text(t) => t.clone(),
            })
            .collect()
    }
}

/// Extract one page-bound field: locate, read text, strip label, coerce.
pub fn extract(page: &CardPage, field: &PageField) -> Result<FieldValue, FieldError> {
    let raw = page
        .element_text(field.locator)
        .ok_or(FieldError::NotFound {
            locator: field.locator,
        })?;
    let text = strip_label(&raw, field.label);

    match field.kind {
        FieldKind::Integer => parse_stat(text).map(FieldValue::Int),
        FieldKind::Text => Ok(FieldValue::Text(text.to_string())),
        FieldKind::FirstLine => Ok(FieldValue::Text(first_line(text).to_string())),
    }
}

/// Build the full record for one card, fail-fast on the first bad field.
/// Nothing partial ever leaves this function: a record either has all 13
/// fields or does not exist.
pub fn assemble(page: &CardPage, card_name: &str) -> Result<CardRecord, AssemblyError> {
    let mut values = Vec::with_capacity(schema::SCHEMA.len());
    for spec in &schema::SCHEMA {
        let value = match &spec.source {
            FieldSource::QueryLabel => FieldValue::Text(card_name.to_string()),
            FieldSource::Page(field) => {
                extract(page, field).map_err(|source| AssemblyError {
                    card: card_name.to_string(),
                    field: spec.name,
                    source,
                })?
            }
        };
        values.push(value);
    }
    Ok(CardRecord { values })
}

/// Strip a leading label plus its separator whitespace. A missing label is
/// not an error: some card variants omit the label line entirely, so the
/// text is used as-is.
fn strip_label<'a>(text: &'a str, label: &str) -> &'a str {
    match text.strip_prefix(label) {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

fn parse_stat(text: &str) -> Result<u32, FieldError> {
    SEPARATOR_RE
        .replace_all(text, "")
        .parse()
        .map_err(|_| FieldError::NotNumeric {
            text: text.to_string(),
        })
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn load(name: &str) -> CardPage {
        CardPage::parse(&fixture(name))
    }

    #[test]
    fn strip_label_present() {
        assert_eq!(strip_label("カード番号\n1,234", "カード番号"), "1,234");
        assert_eq!(strip_label("タイプ\n Cu", "タイプ"), "Cu");
    }

    #[test]
    fn strip_label_absent_is_noop() {
        assert_eq!(strip_label("1,234", "カード番号"), "1,234");
    }

    #[test]
    fn strip_label_idempotent() {
        let once = strip_label("カード番号\n1,234", "カード番号");
        assert_eq!(strip_label(once, "カード番号"), once);
    }

    #[test]
    fn parse_stat_separators() {
        assert_eq!(parse_stat("4,621").unwrap(), 4621);
        assert_eq!(parse_stat("4621").unwrap(), 4621);
        assert_eq!(parse_stat("4，621").unwrap(), 4621);
        assert_eq!(parse_stat(" 38 ").unwrap(), 38);
    }

    #[test]
    fn parse_stat_rejects_non_numbers() {
        let err = parse_stat("たくさん").unwrap_err();
        assert!(matches!(err, FieldError::NotNumeric { text } if text == "たくさん"));
    }

    #[test]
    fn first_line_only() {
        assert_eq!(first_line("A\nB\nC"), "A");
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn full_page_assembles() {
        let page = load("ssr_cute");
        let record = assemble(&page, "小日向美穂").unwrap();
        let cells = record.csv_cells();
        assert_eq!(cells.len(), 13);
        assert_eq!(
            cells,
            vec![
                "1234",
                "小日向美穂",
                "Cu",
                "38",
                "3200",
                "2706",
                "4621",
                "41",
                "5706",
                "4823",
                "8237",
                "キュートボイス：キュートタイプ全員のボーカルアピール値30%アップ",
                "クリティカルボーカル",
            ]
        );
    }

    #[test]
    fn numeric_fields_are_integers() {
        let page = load("ssr_cute");
        let record = assemble(&page, "小日向美穂").unwrap();
        let ints = record
            .values()
            .iter()
            .filter(|v| matches!(v, FieldValue::Int(_)))
            .count();
        // カード番号 + 4 initial + 4 max stats
        assert_eq!(ints, 9);
    }

    #[test]
    fn missing_field_names_the_field() {
        // Drop the カード番号 paragraph so its locator matches nothing.
        let html = fixture("ssr_cute").replace("<p>カード番号<br> 1,234</p>", "");
        let page = CardPage::parse(&html);
        let err = assemble(&page, "小日向美穂").unwrap_err();
        assert_eq!(err.field, "カード番号");
        assert_eq!(err.card, "小日向美穂");
        assert!(matches!(err.source, FieldError::NotFound { .. }));
    }

    #[test]
    fn garbled_stat_aborts_the_record() {
        let html = fixture("ssr_cute").replace("初期ボーカル<br> 3,200", "初期ボーカル<br> 未公開");
        let page = CardPage::parse(&html);
        let err = assemble(&page, "小日向美穂").unwrap_err();
        assert_eq!(err.field, "初期ボーカル");
        assert!(matches!(err.source, FieldError::NotNumeric { .. }));
    }

    #[test]
    fn missing_label_line_is_tolerated() {
        // Some layouts drop the label line; the value must still parse.
        let html = fixture("ssr_cute").replace("カード番号<br> 1,234", "1,234");
        let page = CardPage::parse(&html);
        let record = assemble(&page, "小日向美穂").unwrap();
        assert_eq!(record.csv_cells()[0], "1234");
    }

    #[test]
    fn inline_link_in_ability_keeps_the_whole_line() {
        // The wiki wraps type names in links inside ability text; that must
        // not split the line and truncate the extracted value.
        let html = fixture("ssr_cute").replace(
            "キュートボイス：",
            "キュート<a href=\"/type/cute\">ボイス</a>：",
        );
        let page = CardPage::parse(&html);
        let record = assemble(&page, "小日向美穂").unwrap();
        assert_eq!(
            record.csv_cells()[11],
            "キュートボイス：キュートタイプ全員のボーカルアピール値30%アップ"
        );
    }

    #[test]
    fn footnote_lines_dropped_from_abilities() {
        let page = load("ssr_cute");
        let record = assemble(&page, "小日向美穂").unwrap();
        let cells = record.csv_cells();
        assert!(!cells[11].contains("※"));
        assert!(!cells[12].contains("一定確率"));
    }
}
