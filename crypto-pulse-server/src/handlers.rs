use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, CryptoApi, LoginRequest, RegisterRequest};
use crate::history::{percent_change, price_history, PricePoint, TimeInterval};
use crate::pipeline;
use crate::price_updater::PriceUpdater;
use crate::session::{Session, SessionError};
use crate::sparkline::{self, Point};
use crate::stats::market_stats;
use crate::storage::{AssetSnapshotStorage, Highlights};
use crate::types::{AssetRecord, ConnectionStatus, SortDirection, SortField, SortSpec, User};
use crate::wallet::{Wallet, WalletError, WalletEvent, INSTALL_URL};

pub type SharedApi = dyn CryptoApi + Send + Sync;

pub struct AppState {
	pub storage: Arc<AssetSnapshotStorage>,
	pub updater: Arc<PriceUpdater<SharedApi>>,
	pub api: Arc<SharedApi>,
	pub session: Session,
	pub wallet: Wallet,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(assets_get)
		.service(asset_get)
		.service(sparkline_get)
		.service(history_get)
		.service(stats_get)
		.service(status_get)
		.service(refresh_post)
		.service(login_post)
		.service(register_post)
		.service(logout_post)
		.service(session_get)
		.service(wallet_get)
		.service(wallet_connect_post)
		.service(wallet_disconnect_post)
		.service(wallet_events_post);
}

fn failure(message: String) -> ApiResponse<()> {
	ApiResponse { success: false, data: None, message: Some(message), count: None }
}

#[derive(Deserialize, Debug, Default)]
pub struct AssetQuery {
	sort: Option<SortField>,
	direction: Option<SortDirection>,
	#[serde(default)]
	filter: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AssetsView {
	pub assets: Vec<AssetRecord>,
	pub highlights: Highlights,
	pub status: ConnectionStatus,
	pub error: Option<String>,
	pub sort: SortSpec,
	pub filter: String,
}

#[get("/assets")]
async fn assets_get(state: web::Data<AppState>, query: web::Query<AssetQuery>) -> impl Responder {
	let query = query.into_inner();
	let sort = SortSpec {
		field: query.sort.unwrap_or_default(),
		direction: query.direction.unwrap_or_default(),
	};

	let snapshot = state.storage.snapshot();
	let view = AssetsView {
		assets: pipeline::apply(&snapshot, sort, &query.filter),
		highlights: state.storage.highlights().as_ref().clone(),
		status: state.storage.status(),
		error: state.storage.last_error(),
		sort,
		filter: query.filter,
	};
	HttpResponse::Ok().json(view)
}

#[get("/assets/{id}")]
async fn asset_get(state: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
	match state.storage.get_asset(&id) {
		Some(asset) => HttpResponse::Ok().json(asset),
		None => HttpResponse::NotFound().json(failure(format!("Unknown asset '{}'", id))),
	}
}

#[derive(Deserialize, Debug)]
pub struct SparklineQuery {
	width: Option<f64>,
	height: Option<f64>,
}

#[derive(Serialize, Debug)]
pub struct SparklineView {
	pub path: String,
	pub area: String,
	pub end: Option<Point>,
}

#[get("/assets/{id}/sparkline")]
async fn sparkline_get(
	state: web::Data<AppState>,
	id: web::Path<String>,
	query: web::Query<SparklineQuery>,
) -> impl Responder {
	let asset = match state.storage.get_asset(&id) {
		Some(asset) => asset,
		None => return HttpResponse::NotFound().json(failure(format!("Unknown asset '{}'", id))),
	};
	let width = query.width.unwrap_or(sparkline::DEFAULT_WIDTH);
	let height = query.height.unwrap_or(sparkline::DEFAULT_HEIGHT);

	HttpResponse::Ok().json(SparklineView {
		path: sparkline::to_path(&asset.sparkline, width, height),
		area: sparkline::to_area_path(&asset.sparkline, width, height),
		end: sparkline::end_point(&asset.sparkline, width, height),
	})
}

#[derive(Deserialize, Debug)]
pub struct HistoryQuery {
	interval: Option<TimeInterval>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
	pub interval: TimeInterval,
	pub points: Vec<PricePoint>,
	pub change_percent: f64,
}

#[get("/assets/{id}/history")]
async fn history_get(
	state: web::Data<AppState>,
	id: web::Path<String>,
	query: web::Query<HistoryQuery>,
) -> impl Responder {
	let asset = match state.storage.get_asset(&id) {
		Some(asset) => asset,
		None => return HttpResponse::NotFound().json(failure(format!("Unknown asset '{}'", id))),
	};
	let interval = query.interval.unwrap_or_default();
	let points = price_history(asset.price_usd, interval, Utc::now(), asset.rank);
	let prices: Vec<f64> = points.iter().map(|p| p.price_usd).collect();

	HttpResponse::Ok().json(HistoryView { interval, change_percent: percent_change(&prices), points })
}

#[get("/stats")]
async fn stats_get(state: web::Data<AppState>) -> impl Responder {
	HttpResponse::Ok().json(market_stats(&state.storage.snapshot()))
}

#[get("/status")]
async fn status_get(state: web::Data<AppState>) -> impl Responder {
	HttpResponse::Ok().json(state.storage.status())
}

#[post("/refresh")]
async fn refresh_post(state: web::Data<AppState>) -> impl Responder {
	info!("Manual refresh requested");
	match state.updater.update_prices().await {
		Ok(count) => HttpResponse::Ok().json(ApiResponse {
			success: true,
			data: Some(state.storage.status()),
			message: None,
			count: Some(count as u64),
		}),
		// The fallback dataset is already installed; report the failure without faulting.
		Err(e) => HttpResponse::Ok().json(ApiResponse {
			success: false,
			data: Some(state.storage.status()),
			message: Some(e.to_string()),
			count: None,
		}),
	}
}

fn session_response(result: Result<User, SessionError>) -> HttpResponse {
	match result {
		Ok(user) => HttpResponse::Ok().json(ApiResponse {
			success: true,
			data: Some(user),
			message: None,
			count: None,
		}),
		Err(SessionError::Api(ApiError::Payload(message))) =>
			HttpResponse::Unauthorized().json(failure(message)),
		Err(SessionError::Api(e)) => HttpResponse::BadGateway().json(failure(e.to_string())),
		Err(SessionError::Store(e)) => HttpResponse::InternalServerError().json(failure(e.to_string())),
	}
}

#[post("/auth/login")]
async fn login_post(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
	session_response(state.session.login(state.api.as_ref(), &body).await)
}

#[post("/auth/register")]
async fn register_post(state: web::Data<AppState>, body: web::Json<RegisterRequest>) -> impl Responder {
	session_response(state.session.register(state.api.as_ref(), &body).await)
}

#[post("/auth/logout")]
async fn logout_post(state: web::Data<AppState>) -> impl Responder {
	match state.session.logout() {
		Ok(()) => HttpResponse::NoContent().finish(),
		Err(e) => HttpResponse::InternalServerError().json(failure(e.to_string())),
	}
}

#[get("/session")]
async fn session_get(state: web::Data<AppState>) -> impl Responder {
	HttpResponse::Ok().json(state.session.user())
}

fn wallet_failure(error: WalletError) -> HttpResponse {
	match error {
		WalletError::ProviderUnavailable => HttpResponse::ServiceUnavailable().json(serde_json::json!({
			"success": false,
			"message": error.to_string(),
			"installUrl": INSTALL_URL,
		})),
		WalletError::ProviderRejected(_) => HttpResponse::Forbidden().json(failure(error.to_string())),
		WalletError::Rpc(_) => HttpResponse::BadGateway().json(failure(error.to_string())),
	}
}

#[get("/wallet")]
async fn wallet_get(state: web::Data<AppState>) -> impl Responder {
	HttpResponse::Ok().json(state.wallet.state())
}

#[post("/wallet/connect")]
async fn wallet_connect_post(state: web::Data<AppState>) -> impl Responder {
	match state.wallet.connect().await {
		Ok(wallet) => HttpResponse::Ok().json(wallet),
		Err(e) => wallet_failure(e),
	}
}

#[post("/wallet/disconnect")]
async fn wallet_disconnect_post(state: web::Data<AppState>) -> impl Responder {
	state.wallet.disconnect();
	HttpResponse::Ok().json(state.wallet.state())
}

/// Entry point for `accountsChanged` / `chainChanged` pushed by the provider host.
#[post("/wallet/events")]
async fn wallet_events_post(state: web::Data<AppState>, event: web::Json<WalletEvent>) -> impl Responder {
	match state.wallet.handle_event(event.into_inner()).await {
		Ok(()) => HttpResponse::Ok().json(state.wallet.state()),
		Err(e) => wallet_failure(e),
	}
}
