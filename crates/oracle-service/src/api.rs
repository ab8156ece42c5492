//! HTTP query API.
//!
//! A single read endpoint serving attestations on demand. Any failure —
//! bad parameters, unknown transaction, no qualifying event, signing — is
//! collapsed to a JSON `null` body with the same 200 status as success;
//! callers treat `null` as "no attestation available". This is the
//! documented compatibility contract with existing relayers, so the only
//! place failure classes stay distinguishable is the warn-level log.

use axum::{extract::Query, extract::State, response::Json, routing::get, Router};
use oracle_core::AttestationPipeline;
use oracle_types::{Attestation, OracleError, Result};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
	/// Protocol tag a request's `type` parameter must match.
	pub protocol: String,
	pub pipeline: Arc<AttestationPipeline>,
}

/// Query parameters of an attestation request.
#[derive(Debug, Default, Deserialize)]
pub struct AttestationQuery {
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub index: Option<String>,
}

/// Query API server.
pub struct ApiServer {
	host: String,
	port: u16,
	state: AppState,
}

impl ApiServer {
	pub fn new(
		host: String,
		port: u16,
		protocol: String,
		pipeline: Arc<AttestationPipeline>,
	) -> Self {
		Self {
			host,
			port,
			state: AppState { protocol, pipeline },
		}
	}

	pub async fn run(self) -> anyhow::Result<()> {
		let app = router(self.state);

		let listener = tokio::net::TcpListener::bind(format!("{}:{}", self.host, self.port)).await?;
		info!("Query API listening on {}:{}", self.host, self.port);

		axum::serve(listener, app).await?;
		Ok(())
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(handle_attestations))
		.with_state(state)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
}

async fn handle_attestations(
	State(state): State<AppState>,
	Query(params): Query<AttestationQuery>,
) -> Json<Option<Vec<Attestation>>> {
	match process_query(&state, &params).await {
		Ok(attestations) => Json(Some(attestations)),
		Err(e) => {
			warn!(index = ?params.index, "Attestation request failed: {}", e);
			Json(None)
		}
	}
}

/// Validates the request parameters, then runs the on-demand pipeline.
/// Validation happens first: a bad `type` or missing `index` never reaches
/// the chain.
pub async fn process_query(
	state: &AppState,
	params: &AttestationQuery,
) -> Result<Vec<Attestation>> {
	let kind = params
		.kind
		.as_deref()
		.ok_or_else(|| OracleError::RequestValidation("missing type parameter".to_string()))?;

	if kind != state.protocol {
		return Err(OracleError::RequestValidation(format!(
			"unsupported type {:?}",
			kind
		)));
	}

	let index = params
		.index
		.as_deref()
		.ok_or_else(|| OracleError::RequestValidation("missing index parameter".to_string()))?;

	state.pipeline.attest_transaction(index).await
}
