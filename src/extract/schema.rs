//! Locator table for the card layout on the wiki.
//!
//! Every card page shares one structural skeleton under the async main
//! column. A layout change on the site means updating this table and
//! nothing else; locators never live anywhere but here.

use super::{FieldKind, FieldSource, FieldSpec, PageField};

/// Root of the asynchronously rendered main column. Also used as the
/// readiness probe when fetching.
pub const MAIN_COLUMN: &str = "#js_async_main_column_text";

/// The fixed output schema, in column order. カード名 is the only field not
/// read from the page: it echoes the name the caller searched for.
pub static SCHEMA: [FieldSpec; 13] = [
    FieldSpec {
        name: "カード番号",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(1) > p:nth-of-type(2)",
            label: "カード番号",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "カード名",
        source: FieldSource::QueryLabel,
    },
    FieldSpec {
        name: "タイプ",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(1) > div > p:nth-of-type(2)",
            label: "タイプ",
            kind: FieldKind::Text,
        }),
    },
    FieldSpec {
        name: "初期ライフ",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > div > p:nth-of-type(1)",
            label: "初期ライフ",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "初期ボーカル",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > div > p:nth-of-type(2)",
            label: "初期ボーカル",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "初期ダンス",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > div > p:nth-of-type(3)",
            label: "初期ダンス",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "初期ビジュアル",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > div > p:nth-of-type(4)",
            label: "初期ビジュアル",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "最大ライフ",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > p:nth-of-type(1)",
            label: "最大ライフ",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "最大ボーカル",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > p:nth-of-type(2)",
            label: "最大ボーカル",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "最大ダンス",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > p:nth-of-type(3)",
            label: "最大ダンス",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "最大ビジュアル",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > p:nth-of-type(4)",
            label: "最大ビジュアル",
            kind: FieldKind::Integer,
        }),
    },
    FieldSpec {
        name: "センター効果",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(2) > p:nth-of-type(1)",
            label: "センター効果",
            kind: FieldKind::FirstLine,
        }),
    },
    FieldSpec {
        name: "特技",
        source: FieldSource::Page(PageField {
            locator: "#js_async_main_column_text > div:nth-of-type(2) > p:nth-of-type(3)",
            label: "特技分類",
            kind: FieldKind::FirstLine,
        }),
    },
];

/// CSV header row, derived from the schema so the two can never drift.
pub fn header() -> Vec<&'static str> {
    SCHEMA.iter().map(|f| f.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_output_contract() {
        assert_eq!(
            header(),
            vec![
                "カード番号",
                "カード名",
                "タイプ",
                "初期ライフ",
                "初期ボーカル",
                "初期ダンス",
                "初期ビジュアル",
                "最大ライフ",
                "最大ボーカル",
                "最大ダンス",
                "最大ビジュアル",
                "センター効果",
                "特技",
            ]
        );
    }

    #[test]
    fn card_name_is_the_only_query_field() {
        let query_fields: Vec<&str> = SCHEMA
            .iter()
            .filter(|f| matches!(f.source, FieldSource::QueryLabel))
            .map(|f| f.name)
            .collect();
        assert_eq!(query_fields, vec!["カード名"]);
        assert!(matches!(SCHEMA[1].source, FieldSource::QueryLabel));
    }

    #[test]
    fn all_locators_rooted_in_main_column() {
        for field in &SCHEMA {
            if let FieldSource::Page(page) = &field.source {
                assert!(
                    page.locator.starts_with(MAIN_COLUMN),
                    "{} locator escapes the main column",
                    field.name
                );
            }
        }
    }

    #[test]
    fn stat_fields_are_numeric() {
        for field in &SCHEMA {
            if field.name.contains("ライフ")
                || field.name.contains("ボーカル")
                || field.name.contains("ダンス")
                || field.name.contains("ビジュアル")
            {
                let FieldSource::Page(page) = &field.source else {
                    panic!("{} should be page-bound", field.name);
                };
                assert!(matches!(page.kind, FieldKind::Integer));
            }
        }
    }
}
