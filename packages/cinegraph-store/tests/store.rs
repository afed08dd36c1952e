use cinegraph_config::GraphDb;
use cinegraph_store::{Error, SparqlStore};
use cinegraph_testkit::{MockSparql, ask_response, row, select_response};

fn graphdb(endpoint: String) -> GraphDb {
	GraphDb { endpoint, timeout_ms: 2_000, max_results: 5_000, retry_attempts: 0 }
}

#[tokio::test]
async fn select_round_trips_binding_rows() {
	let server = MockSparql::new()
		.respond(
			"dbo:Film",
			select_response(vec![
				row(&[
					("movie", "http://x.test/a"),
					("title", "Movie A"),
					("graphScore", "12"),
				]),
				row(&[("movie", "http://x.test/b"), ("title", "Movie B")]),
			]),
		)
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let store = SparqlStore::new(&graphdb(server.endpoint())).expect("Failed to build store.");
	let rows = store
		.select("SELECT ?movie ?title WHERE { ?movie a dbo:Film . }")
		.await
		.expect("SELECT failed.");

	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0].get("graphScore").map(String::as_str), Some("12"));

	let received = server.received_queries();

	assert_eq!(received.len(), 1);
	assert!(received[0].contains("dbo:Film"));
}

#[tokio::test]
async fn ask_parses_boolean() {
	let server = MockSparql::new()
		.respond("ASK", ask_response(true))
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let store = SparqlStore::new(&graphdb(server.endpoint())).expect("Failed to build store.");

	assert!(store.ask("ASK WHERE { ?s ?p ?o }").await.expect("ASK failed."));
}

#[tokio::test]
async fn bad_request_surfaces_as_query_rejected() {
	let server = MockSparql::new()
		.respond_status("BROKEN", 400, "MALFORMED QUERY: unexpected token")
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let store = SparqlStore::new(&graphdb(server.endpoint())).expect("Failed to build store.");
	let err = store.select("BROKEN").await.expect_err("Expected rejection.");

	match err {
		Error::QueryRejected { body } => assert!(body.contains("MALFORMED QUERY")),
		other => panic!("Expected QueryRejected, got {other:?}."),
	}
}

#[tokio::test]
async fn server_errors_surface_as_http() {
	let server = MockSparql::new()
		.respond_status("SELECT", 503, "maintenance")
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let store = SparqlStore::new(&graphdb(server.endpoint())).expect("Failed to build store.");
	let err = store.select("SELECT ?s WHERE { ?s ?p ?o }").await.expect_err("Expected failure.");

	assert!(matches!(err, Error::Http { status: 503 }));
	assert!(!err.is_retryable());
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
	// Reserved TEST-NET-1 address; nothing listens there.
	let store = SparqlStore::new(&GraphDb {
		endpoint: "http://192.0.2.1:7200/repositories/test".to_string(),
		timeout_ms: 200,
		max_results: 100,
		retry_attempts: 0,
	})
	.expect("Failed to build store.");
	let err = store.select("SELECT ?s WHERE { ?s ?p ?o }").await.expect_err("Expected failure.");

	assert!(err.is_retryable());
}

#[tokio::test]
async fn non_json_success_is_malformed_response() {
	let server = MockSparql::new()
		.respond_status("SELECT", 200, "<html>not sparql json</html>")
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let store = SparqlStore::new(&graphdb(server.endpoint())).expect("Failed to build store.");
	let err = store.select("SELECT ?s WHERE { ?s ?p ?o }").await.expect_err("Expected failure.");

	assert!(matches!(err, Error::MalformedResponse { .. }));
}
