use crate::state::AppState;
use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
pub struct MarksResponse {
    // One entry per requested name, in request order; null for unknown names.
    pub marks: Vec<Option<Value>>,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Collects every `name` parameter in the order it appears. axum's `Query`
/// would deserialize into a map and keep only one value per key.
fn requested_names(query: Option<&str>) -> Vec<String> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .filter(|(key, _)| key == "name")
                .map(|(_, value)| value.into_owned())
                .collect()
        })
        .unwrap_or_default()
}

pub async fn marks_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Json<MarksResponse> {
    let names = requested_names(query.as_deref());
    debug!("Received marks request for {} name(s)", names.len());

    let marks = names
        .iter()
        .map(|name| {
            let found = state.table.get(name).cloned();
            if found.is_none() {
                info!("No marks recorded for '{}'", name);
            }
            found
        })
        .collect();

    Json(MarksResponse { marks })
}

pub async fn root_handler(State(state): State<Arc<AppState>>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: state.welcome_message.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{self, LookupTable};
    use serde_json::json;

    fn state_with(dataset: Value) -> Arc<AppState> {
        let table = dataset::from_value(dataset).expect("valid dataset");
        Arc::new(AppState::new(table, "welcome"))
    }

    async fn query(state: &Arc<AppState>, q: Option<&str>) -> Value {
        let Json(resp) = marks_handler(State(state.clone()), RawQuery(q.map(String::from))).await;
        serde_json::to_value(resp).expect("serialize")
    }

    #[test]
    fn requested_names_keeps_order_and_duplicates() {
        assert_eq!(
            requested_names(Some("name=B&other=x&name=A&name=B")),
            vec!["B", "A", "B"]
        );
        assert!(requested_names(None).is_empty());
        assert!(requested_names(Some("")).is_empty());
    }

    #[test]
    fn requested_names_decodes_values() {
        assert_eq!(
            requested_names(Some("name=Mary+Ann&name=J%C3%BCrgen&name=")),
            vec!["Mary Ann", "Jürgen", ""]
        );
    }

    #[tokio::test]
    async fn resolves_names_in_request_order() {
        let state = state_with(json!([
            { "name": "Alice", "marks": 90 },
            { "name": "Bob", "marks": 75 },
            { "name": "Alice", "marks": 95 }
        ]));
        let v = query(&state, Some("name=Alice&name=Bob&name=Carol")).await;
        assert_eq!(v, json!({ "marks": [95, 75, null] }));
    }

    #[tokio::test]
    async fn no_names_gives_empty_marks() {
        let state = state_with(json!([{ "name": "Alice", "marks": 90 }]));
        assert_eq!(query(&state, None).await, json!({ "marks": [] }));
        assert_eq!(query(&state, Some("other=1")).await, json!({ "marks": [] }));
    }

    #[tokio::test]
    async fn empty_table_resolves_everything_to_null() {
        let state = Arc::new(AppState::new(LookupTable::default(), "welcome"));
        let v = query(&state, Some("name=X&name=Y&name=X")).await;
        assert_eq!(v, json!({ "marks": [null, null, null] }));
    }

    #[tokio::test]
    async fn response_length_matches_request_length() {
        let state = state_with(json!({ "A": 1, "B": 2 }));
        let q = "name=A&name=Z&name=B&name=A&name=Q";
        let v = query(&state, Some(q)).await;
        let marks = v["marks"].as_array().expect("marks array");
        assert_eq!(marks.len(), 5);
        assert_eq!(marks, &vec![json!(1), Value::Null, json!(2), json!(1), Value::Null]);
    }

    #[tokio::test]
    async fn root_returns_configured_message() {
        let state = state_with(json!([]));
        let Json(resp) = root_handler(State(state)).await;
        assert_eq!(resp.message, "welcome");
    }
}
