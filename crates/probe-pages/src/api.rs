//! Check an add-on API response against the payload that produced it.
//!
//! Comparison is by field name. Each submitted field is looked up at its
//! response location:
//!
//! | payload field           | response location                     |
//! |-------------------------|---------------------------------------|
//! | `homepage`              | `homepage.url`                        |
//! | `contributions_url`     | `contributions_url.url`, query removed |
//! | `version.license`       | `current_version.license.slug`        |
//! | `version.<other>`       | `current_version.<other>`             |
//! | `version.upload`        | not compared                          |
//! | anything else           | same name                             |
//!
//! `version` is only flattened for [`RequestKind::Create`].

use serde::Serialize;
use serde_json::{Map, Value};

/// Kind of request the payload was sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// New add-on, payload carries a nested `version` object
    Create,
    /// Edit of an existing add-on
    Edit,
}

/// A submitted field whose value was not echoed back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMismatch {
    /// Response location that was checked
    pub field: String,
    /// Submitted value
    pub expected: Value,
    /// Value in the response, `None` when the location is missing
    pub actual: Option<Value>,
}

/// Outcome of [`verify_addon_response_details`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseComparison {
    /// Response locations that were checked, in payload order
    pub compared: Vec<String>,
    /// Checked locations whose value differed
    pub mismatches: Vec<FieldMismatch>,
}

impl ResponseComparison {
    /// Every submitted value was found unchanged
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn check(&mut self, field: String, expected: &Value, actual: Option<Value>) {
        if actual.as_ref() != Some(expected) {
            self.mismatches.push(FieldMismatch {
                field: field.clone(),
                expected: expected.clone(),
                actual,
            });
        }
        self.compared.push(field);
    }
}

/// Field the server consumes without echoing back
const UPLOAD_FIELD: &str = "upload";

fn lookup<'a>(response: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(response, |value, key| value.get(key))
}

fn strip_query(value: Value) -> Value {
    match value {
        Value::String(url) => Value::String(
            url.split_once('?')
                .map_or(url.as_str(), |(base, _)| base)
                .to_string(),
        ),
        other => other,
    }
}

fn compare_version(version: &Map<String, Value>, response: &Value, out: &mut ResponseComparison) {
    for (key, expected) in version {
        match key.as_str() {
            UPLOAD_FIELD => {}
            "license" => out.check(
                "current_version.license.slug".to_string(),
                expected,
                lookup(response, &["current_version", "license", "slug"]).cloned(),
            ),
            other => out.check(
                format!("current_version.{other}"),
                expected,
                lookup(response, &["current_version", other]).cloned(),
            ),
        }
    }
}

/// Compare `payload` with the API `response` it produced
///
/// A `payload` that is not a JSON object compares nothing and matches.
pub fn verify_addon_response_details(
    payload: &Value,
    response: &Value,
    request: RequestKind,
) -> ResponseComparison {
    let mut out = ResponseComparison::default();
    let Some(fields) = payload.as_object() else {
        return out;
    };

    for (key, expected) in fields {
        match (key.as_str(), expected) {
            ("version", Value::Object(version)) if request == RequestKind::Create => {
                compare_version(version, response, &mut out);
            }
            ("homepage", _) => out.check(
                "homepage.url".to_string(),
                expected,
                lookup(response, &["homepage", "url"]).cloned(),
            ),
            ("contributions_url", _) => out.check(
                "contributions_url.url".to_string(),
                expected,
                lookup(response, &["contributions_url", "url"])
                    .cloned()
                    .map(strip_query),
            ),
            (other, _) => out.check(other.to_string(), expected, response.get(other).cloned()),
        }
    }

    tracing::debug!(
        ?request,
        compared = out.compared.len(),
        mismatches = out.mismatches.len(),
        "addon response compared"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn create_payload() -> Value {
        json!({
            "categories": ["bookmarks"],
            "slug": "my-addon",
            "name": {"en-US": "My Addon"},
            "summary": {"en-US": "Summary"},
            "homepage": {"en-US": "https://example.com"},
            "contributions_url": "https://www.paypal.me/addon",
            "is_experimental": false,
            "version": {
                "upload": "c0ffee",
                "license": "MPL-2.0",
                "release_notes": {"en-US": "First"},
                "compatibility": ["firefox"]
            }
        })
    }

    fn create_response() -> Value {
        json!({
            "categories": ["bookmarks"],
            "slug": "my-addon",
            "name": {"en-US": "My Addon"},
            "summary": {"en-US": "Summary"},
            "homepage": {"url": {"en-US": "https://example.com"}, "outgoing": {}},
            "contributions_url": {
                "url": "https://www.paypal.me/addon?utm_content=product-page-contribute",
                "outgoing": "x"
            },
            "is_experimental": false,
            "current_version": {
                "license": {"slug": "MPL-2.0", "name": {"en-US": "Mozilla Public License"}},
                "release_notes": {"en-US": "First"},
                "compatibility": ["firefox"],
                "file": {"id": 1}
            }
        })
    }

    mod create_tests {
        use super::*;

        #[test]
        fn test_matching_response() {
            let result =
                verify_addon_response_details(&create_payload(), &create_response(), RequestKind::Create);
            assert!(result.is_match(), "{:?}", result.mismatches);
            assert!(result.compared.contains(&"current_version.license.slug".to_string()));
            assert!(result.compared.contains(&"homepage.url".to_string()));
        }

        #[test]
        fn test_upload_token_is_not_compared() {
            let result =
                verify_addon_response_details(&create_payload(), &create_response(), RequestKind::Create);
            assert!(!result.compared.iter().any(|f| f.contains("upload")));
        }

        #[test]
        fn test_changed_release_notes_reported() {
            let mut response = create_response();
            response["current_version"]["release_notes"] = json!({"en-US": "Other"});
            let result =
                verify_addon_response_details(&create_payload(), &response, RequestKind::Create);
            assert_eq!(result.mismatches.len(), 1);
            let mismatch = &result.mismatches[0];
            assert_eq!(mismatch.field, "current_version.release_notes");
            assert_eq!(mismatch.actual, Some(json!({"en-US": "Other"})));
        }

        #[test]
        fn test_missing_field_reported_as_absent() {
            let mut response = create_response();
            let _ = response.as_object_mut().unwrap().remove("slug");
            let result =
                verify_addon_response_details(&create_payload(), &response, RequestKind::Create);
            assert_eq!(result.mismatches.len(), 1);
            assert_eq!(result.mismatches[0].field, "slug");
            assert_eq!(result.mismatches[0].actual, None);
        }

        #[test]
        fn test_contribution_query_kept_in_payload_fails() {
            let mut payload = create_payload();
            payload["contributions_url"] = json!("https://www.paypal.me/addon?x=1");
            let result =
                verify_addon_response_details(&payload, &create_response(), RequestKind::Create);
            assert_eq!(result.mismatches.len(), 1);
            assert_eq!(result.mismatches[0].field, "contributions_url.url");
        }
    }

    mod edit_tests {
        use super::*;

        #[test]
        fn test_edit_compares_top_level_only() {
            let payload = json!({
                "summary": {"en-US": "Edited"},
                "tags": ["privacy"],
                "developer_comments": {"en-US": "Note"}
            });
            let response = json!({
                "summary": {"en-US": "Edited"},
                "tags": ["privacy"],
                "developer_comments": {"en-US": "Note"},
                "current_version": {"release_notes": null}
            });
            let result = verify_addon_response_details(&payload, &response, RequestKind::Edit);
            assert!(result.is_match());
            assert_eq!(result.compared, vec!["summary", "tags", "developer_comments"]);
        }

        #[test]
        fn test_edit_does_not_flatten_version() {
            let payload = json!({"version": {"license": "MPL-2.0"}});
            let response = json!({"current_version": {"license": {"slug": "MPL-2.0"}}});
            let result = verify_addon_response_details(&payload, &response, RequestKind::Edit);
            assert_eq!(result.compared, vec!["version"]);
            assert!(!result.is_match());
        }

        #[test]
        fn test_non_object_payload_matches_trivially() {
            let result = verify_addon_response_details(&json!(null), &json!({}), RequestKind::Edit);
            assert!(result.is_match());
            assert!(result.compared.is_empty());
        }
    }

    mod property_tests {
        use super::*;

        fn field_map() -> impl Strategy<Value = Vec<(String, String)>> {
            proptest::collection::btree_map("[a-z]{1,8}_field", "[ -~]{0,16}", 0..8)
                .prop_map(|m| m.into_iter().collect())
        }

        proptest! {
            #[test]
            fn echoed_payload_always_matches(fields in field_map(), extra in "[a-z]{1,8}") {
                let payload: Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                let mut response = payload.clone();
                let _ = response.insert(format!("{extra}_server_only"), json!(1));

                let result = verify_addon_response_details(
                    &Value::Object(payload),
                    &Value::Object(response),
                    RequestKind::Edit,
                );
                prop_assert!(result.is_match());
                prop_assert_eq!(result.compared.len(), fields.len());
            }

            #[test]
            fn one_changed_value_is_one_mismatch(fields in field_map(), pick in any::<prop::sample::Index>()) {
                prop_assume!(!fields.is_empty());
                let payload: Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                let (changed, _) = &fields[pick.index(fields.len())];
                let mut response = payload.clone();
                let _ = response.insert(changed.clone(), json!(null));

                let result = verify_addon_response_details(
                    &Value::Object(payload),
                    &Value::Object(response),
                    RequestKind::Create,
                );
                prop_assert_eq!(result.mismatches.len(), 1);
                prop_assert_eq!(&result.mismatches[0].field, changed);
            }

            #[test]
            fn upload_value_never_matters(upload in "[ -~]{0,32}") {
                let payload = json!({"version": {"upload": upload, "license": "MIT"}});
                let response = json!({"current_version": {"license": {"slug": "MIT"}}});
                let result = verify_addon_response_details(&payload, &response, RequestKind::Create);
                prop_assert!(result.is_match());
                prop_assert_eq!(result.compared.len(), 1);
            }
        }
    }
}
