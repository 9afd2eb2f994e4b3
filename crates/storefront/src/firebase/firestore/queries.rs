//! Firestore `runQuery` request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::values::{decode_fields, encode_value};
use crate::firebase::types::{Document, FieldFilter};

/// Body of a `documents:runQuery` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    structured_query: StructuredQuery,
}

#[derive(Debug, Serialize)]
struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Filter {
    FieldFilter(FieldFilterBody),
    CompositeFilter(CompositeFilterBody),
}

#[derive(Debug, Serialize)]
struct FieldFilterBody {
    field: FieldReference,
    op: &'static str,
    value: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference {
    field_path: String,
}

#[derive(Debug, Serialize)]
struct CompositeFilterBody {
    op: &'static str,
    filters: Vec<Filter>,
}

impl RunQueryRequest {
    /// Query `collection`, AND-ing every equality filter.
    #[must_use]
    pub fn new(collection: &str, filters: &[FieldFilter]) -> Self {
        let mut field_filters: Vec<Filter> = filters
            .iter()
            .map(|f| {
                Filter::FieldFilter(FieldFilterBody {
                    field: FieldReference {
                        field_path: f.field.clone(),
                    },
                    op: "EQUAL",
                    value: encode_value(&f.value),
                })
            })
            .collect();

        let filter = match field_filters.len() {
            0 => None,
            1 => field_filters.pop(),
            _ => Some(Filter::CompositeFilter(CompositeFilterBody {
                op: "AND",
                filters: field_filters,
            })),
        };

        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                filter,
            },
        }
    }
}

/// One row of a `runQuery` response stream.
///
/// Rows carrying only `readTime` (empty results, progress markers) have no
/// document.
#[derive(Debug, Deserialize)]
pub struct RunQueryRow {
    document: Option<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Convert response rows into documents, preserving order.
pub fn convert_rows(rows: Vec<RunQueryRow>) -> Vec<Document> {
    rows.into_iter()
        .filter_map(|row| row.document)
        .map(|doc| {
            let id = doc
                .name
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            Document::new(id, decode_fields(&doc.fields))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unfiltered_query_has_no_where() {
        let body = serde_json::to_value(RunQueryRequest::new("Categories", &[])).unwrap();
        assert_eq!(
            body,
            json!({"structuredQuery": {"from": [{"collectionId": "Categories"}]}})
        );
    }

    #[test]
    fn test_single_filter_query() {
        let body = serde_json::to_value(RunQueryRequest::new(
            "Items",
            &[FieldFilter::equal("categoryId", "c1")],
        ))
        .unwrap();

        assert_eq!(
            body,
            json!({"structuredQuery": {
                "from": [{"collectionId": "Items"}],
                "where": {"fieldFilter": {
                    "field": {"fieldPath": "categoryId"},
                    "op": "EQUAL",
                    "value": {"stringValue": "c1"}
                }}
            }})
        );
    }

    #[test]
    fn test_multiple_filters_are_anded() {
        let body = serde_json::to_value(RunQueryRequest::new(
            "Items",
            &[
                FieldFilter::equal("categoryId", "c1"),
                FieldFilter::equal("active", true),
            ],
        ))
        .unwrap();

        let composite = &body["structuredQuery"]["where"]["compositeFilter"];
        assert_eq!(composite["op"], json!("AND"));
        assert_eq!(composite["filters"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_convert_rows_skips_read_time_rows() {
        let rows: Vec<RunQueryRow> = serde_json::from_value(json!([
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/Items/p1",
                    "fields": {
                        "name": {"stringValue": "Shirt"},
                        "price": {"integerValue": "20"},
                        "categoryId": {"stringValue": "c1"}
                    },
                    "createTime": "2024-01-01T00:00:00Z",
                    "updateTime": "2024-01-01T00:00:00Z"
                },
                "readTime": "2024-06-01T00:00:00Z"
            },
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/Items/p2"
                },
                "readTime": "2024-06-01T00:00:00Z"
            },
            {"readTime": "2024-06-01T00:00:00Z"}
        ]))
        .unwrap();

        let docs = convert_rows(rows);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "p1");
        assert_eq!(docs[0].fields["price"], json!(20));
        assert_eq!(docs[0].str_field("categoryId"), Some("c1"));
        assert_eq!(docs[1].id, "p2");
        assert!(docs[1].fields.is_empty());
    }
}
