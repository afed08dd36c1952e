mod error;

pub use error::{Error, Result};

use std::{
	net::SocketAddr,
	sync::{Arc, Mutex},
};

use axum::{Form, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};

/// In-process stand-in for a SPARQL endpoint. Rules are matched against the
/// submitted query text in registration order; the first rule whose needle
/// occurs in the query answers it. Received queries are recorded so tests
/// can assert on what was actually sent.
#[derive(Default)]
pub struct MockSparql {
	rules: Vec<Rule>,
}

pub struct MockSparqlServer {
	addr: SocketAddr,
	state: Arc<ServerState>,
	handle: JoinHandle<()>,
}

struct Rule {
	needle: Option<String>,
	response: CannedResponse,
}

enum CannedResponse {
	Json(Value),
	Status(StatusCode, String),
}

struct ServerState {
	rules: Vec<Rule>,
	received: Mutex<Vec<String>>,
}

#[derive(Deserialize)]
struct SparqlForm {
	query: String,
}

impl MockSparql {
	pub fn new() -> Self {
		Self::default()
	}

	/// Answers queries containing `needle` with the given JSON body.
	pub fn respond(mut self, needle: &str, body: Value) -> Self {
		self.rules
			.push(Rule { needle: Some(needle.to_string()), response: CannedResponse::Json(body) });

		self
	}

	/// Answers queries containing `needle` with an HTTP error.
	pub fn respond_status(mut self, needle: &str, status: u16, body: &str) -> Self {
		self.rules.push(Rule {
			needle: Some(needle.to_string()),
			response: CannedResponse::Status(
				StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
				body.to_string(),
			),
		});

		self
	}

	/// Fallback for queries no earlier rule matched.
	pub fn respond_default(mut self, body: Value) -> Self {
		self.rules.push(Rule { needle: None, response: CannedResponse::Json(body) });

		self
	}

	pub async fn start(self) -> Result<MockSparqlServer> {
		let state = Arc::new(ServerState { rules: self.rules, received: Mutex::new(Vec::new()) });
		let app = Router::new()
			.route("/", post(handle_query))
			.route("/repositories/{repo}", post(handle_query))
			.with_state(state.clone());
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let handle = tokio::spawn(async move {
			axum::serve(listener, app).await.ok();
		});

		Ok(MockSparqlServer { addr, state, handle })
	}
}

impl MockSparqlServer {
	/// Endpoint URL shaped like a GraphDB repository.
	pub fn endpoint(&self) -> String {
		format!("http://{}/repositories/test", self.addr)
	}

	pub fn received_queries(&self) -> Vec<String> {
		self.state.received.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}

impl Drop for MockSparqlServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

async fn handle_query(
	State(state): State<Arc<ServerState>>,
	Form(form): Form<SparqlForm>,
) -> axum::response::Response {
	state.received.lock().unwrap_or_else(|err| err.into_inner()).push(form.query.clone());

	for rule in &state.rules {
		let matched =
			rule.needle.as_deref().map(|needle| form.query.contains(needle)).unwrap_or(true);

		if !matched {
			continue;
		}

		return match &rule.response {
			CannedResponse::Json(body) => axum::Json(body.clone()).into_response(),
			CannedResponse::Status(status, body) => (*status, body.clone()).into_response(),
		};
	}

	(StatusCode::BAD_REQUEST, "No canned response matches the query.".to_string()).into_response()
}

/// Builds a `sparql-results+json` SELECT body from pre-built rows.
pub fn select_response(rows: Vec<Value>) -> Value {
	json!({
		"head": { "vars": [] },
		"results": { "bindings": rows }
	})
}

pub fn ask_response(answer: bool) -> Value {
	json!({ "boolean": answer })
}

/// One binding row of plain values: `[("movie", "http://..."), ("title", "X")]`.
pub fn row(pairs: &[(&str, &str)]) -> Value {
	let mut object = serde_json::Map::new();

	for (var, value) in pairs {
		object.insert((*var).to_string(), json!({ "type": "literal", "value": value }));
	}

	Value::Object(object)
}
