//! Echo service suite.
//!
//! Exercises httpbin's echo endpoints: plain GET, HEAD, query-parameter
//! round-trip, and JSON body round-trip for every body-carrying method.
//! The cases are mutually independent, so each is its own child Scope under
//! one suite root.

use std::sync::Arc;

use serde_json::{Value, json};
use sonda_application::{HttpClient, Scope};
use sonda_domain::{CallSpec, HttpMethod, QueryParams, expect_eq, expect_exists};

use super::response_vars;

const BASE_URL: &str = "https://httpbin.org";

/// Query fixture echoed back verbatim by `/get`.
fn query_fixture() -> QueryParams {
    [("name", "John"), ("age", "31"), ("city", "New York")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// JSON body fixture echoed back verbatim by the body endpoints.
fn body_fixture() -> Value {
    json!({
        "name": "Sebastián",
        "age": 23,
        "city": "Medellin"
    })
}

/// Builds the echo suite.
#[must_use]
pub fn suite(client: Arc<dyn HttpClient>) -> Scope {
    Scope::new("echo service")
        .with_child(get_ip(Arc::clone(&client)))
        .with_child(head_headers(Arc::clone(&client)))
        .with_child(get_with_query(Arc::clone(&client)))
        .with_child(echo_with_body(Arc::clone(&client), HttpMethod::Post))
        .with_child(echo_with_body(Arc::clone(&client), HttpMethod::Put))
        .with_child(echo_with_body(Arc::clone(&client), HttpMethod::Patch))
        .with_child(echo_with_body(client, HttpMethod::Delete))
}

fn status_ok(vars: &sonda_application::Vars) -> Result<(), sonda_domain::CheckFailure> {
    expect_eq("status", vars.get("status"), &json!(200))
}

fn get_ip(client: Arc<dyn HttpClient>) -> Scope {
    Scope::new("consume GET service")
        .with_setup(move |_vars| {
            let client = Arc::clone(&client);
            async move {
                let response = client.call(&CallSpec::get(format!("{BASE_URL}/ip"))).await?;
                Ok(response_vars(&response))
            }
        })
        .with_check("status is 200 OK", status_ok)
        .with_check("body has an origin property", |vars| {
            expect_exists(
                "body.origin",
                vars.get("body").and_then(|body| body.pointer("/origin")),
            )
        })
}

fn head_headers(client: Arc<dyn HttpClient>) -> Scope {
    Scope::new("consume HEAD service")
        .with_setup(move |_vars| {
            let client = Arc::clone(&client);
            async move {
                let response = client
                    .call(&CallSpec::head(format!("{BASE_URL}/headers")))
                    .await?;
                Ok(response_vars(&response))
            }
        })
        .with_check("status is 200 OK", status_ok)
        .with_check("content-type header is application/json", |vars| {
            expect_eq(
                "headers.content-type",
                vars.get("headers").and_then(|h| h.pointer("/content-type")),
                &json!("application/json"),
            )
        })
        .with_check("body is an empty object", |vars| {
            expect_eq("body", vars.get("body"), &json!({}))
        })
}

fn get_with_query(client: Arc<dyn HttpClient>) -> Scope {
    Scope::new("consume GET service with query parameters")
        .with_setup(move |_vars| {
            let client = Arc::clone(&client);
            async move {
                let spec =
                    CallSpec::get(format!("{BASE_URL}/get")).with_query(query_fixture());
                let response = client.call(&spec).await?;
                Ok(response_vars(&response))
            }
        })
        .with_check("status is 200 OK", status_ok)
        .with_check("echoed args match the query sent", |vars| {
            expect_eq(
                "body.args",
                vars.get("body").and_then(|body| body.pointer("/args")),
                &json!({"name": "John", "age": "31", "city": "New York"}),
            )
        })
}

fn echo_with_body(client: Arc<dyn HttpClient>, method: HttpMethod) -> Scope {
    let path = method.as_str().to_lowercase();

    Scope::new(format!("consume {method} service with a body"))
        .with_setup(move |_vars| {
            let client = Arc::clone(&client);
            let url = format!("{BASE_URL}/{path}");
            async move {
                let spec = CallSpec::new(method, url).with_json_body(body_fixture());
                let response = client.call(&spec).await?;
                Ok(response_vars(&response))
            }
        })
        .with_check("status is 200 OK", status_ok)
        .with_check("echoed json matches the body sent", |vars| {
            expect_eq(
                "body.json",
                vars.get("body").and_then(|body| body.pointer("/json")),
                &body_fixture(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct NeverCalled;

    #[async_trait::async_trait]
    impl HttpClient for NeverCalled {
        async fn call(
            &self,
            _spec: &CallSpec,
        ) -> Result<sonda_domain::CapturedResponse, sonda_application::HttpClientError> {
            Err(sonda_application::HttpClientError::Other(
                "suite building must not issue calls".to_string(),
            ))
        }
    }

    #[test]
    fn test_suite_shape() {
        let suite = suite(Arc::new(NeverCalled));
        assert_eq!(suite.name(), "echo service");

        let names: Vec<_> = suite.children().iter().map(Scope::name).collect();
        assert_eq!(
            names,
            vec![
                "consume GET service",
                "consume HEAD service",
                "consume GET service with query parameters",
                "consume POST service with a body",
                "consume PUT service with a body",
                "consume PATCH service with a body",
                "consume DELETE service with a body",
            ]
        );

        for case in suite.children() {
            assert!(case.children().is_empty());
            assert!(!case.checks().is_empty());
        }
    }

    #[test]
    fn test_fixtures_match_the_echo_contract() {
        assert_eq!(
            query_fixture().encode().ok().as_deref(),
            Some("name=John&age=31&city=New+York")
        );
        assert_eq!(body_fixture()["age"], 23);
    }
}
