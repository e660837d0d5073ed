//! HTTP fetch tests against a mock statement API.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_log::test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use statement_scope::api::{FetchError, StatementClient, StatementProvider};
use statement_scope::models::Config;
use statement_scope::schema::{StatementType, DATE_KEY};
use statement_scope::ui::state::ViewState;

use crate::common::{envelope, income_json};

fn client_for(server: &MockServer) -> StatementClient {
    StatementClient::new(&Config {
        api_base: server.uri(),
        request_timeout_secs: 5,
    })
    .expect("client builds against mock server uri")
}

#[test(tokio::test)]
async fn test_fetch_parses_envelope_into_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/income-statement"))
        .and(query_param("symbol", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            income_json(1, "2022-09-30", 100.0),
            income_json(2, "2023-09-30", 300.0),
        ])))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .fetch(StatementType::Income, "AAPL")
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Some(1));
    assert_eq!(records[1].value("revenue"), Some(300.0));
}

#[test(tokio::test)]
async fn test_each_statement_type_hits_its_own_endpoint() {
    let server = MockServer::start().await;
    for statement in StatementType::ALL {
        Mock::given(method("GET"))
            .and(path(format!("/{}", statement.endpoint())))
            .and(query_param("symbol", "AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    for statement in StatementType::ALL {
        let records = client.fetch(statement, "AAPL").await.unwrap();
        assert!(records.is_empty());
    }
}

#[test(tokio::test)]
async fn test_empty_symbol_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/income-statement"))
        .and(query_param("symbol", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client_for(&server)
        .fetch(StatementType::Income, "")
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[test(tokio::test)]
async fn test_absent_data_field_reads_as_no_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/income-statement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Records retrieved successfully"
        })))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .fetch(StatementType::Income, "AAPL")
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[test(tokio::test)]
async fn test_server_error_is_a_status_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/income-statement"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(StatementType::Income, "AAPL")
        .await
        .unwrap_err();
    assert_matches!(err, FetchError::Status(status) if status.as_u16() == 500);
}

#[test(tokio::test)]
async fn test_non_json_body_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/income-statement"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(StatementType::Income, "AAPL")
        .await
        .unwrap_err();
    assert_matches!(err, FetchError::Parse(_));
}

#[test(tokio::test)]
async fn test_malformed_records_are_dropped_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/income-statement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            income_json(1, "2023-09-30", 300.0),
            income_json(2, "not a date", 100.0),
            json!({"id": 3, "date": "2022-09-30"}), // missing every value field
        ])))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .fetch(StatementType::Income, "AAPL")
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, Some(1));
}

#[test(tokio::test)]
async fn test_fetched_records_flow_through_the_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/income-statement"))
        .and(query_param("symbol", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            income_json(1, "2022-09-30", 100.0),
            income_json(2, "2023-09-30", 300.0),
        ])))
        .mount(&server)
        .await;

    let mut view = ViewState::new(StatementType::Income);
    view.symbol = "AAPL".to_string();
    let generation = view.begin_fetch();
    let result = client_for(&server)
        .fetch(StatementType::Income, &view.symbol)
        .await;
    view.apply_fetch(generation, result);

    assert_eq!(view.sort.key.as_deref(), Some(DATE_KEY));
    let rows = view.visible_rows();
    assert_eq!(rows.len(), 2);
    // Newest period first after a fresh fetch.
    assert_eq!(rows[0].value("revenue"), Some(300.0));
}
