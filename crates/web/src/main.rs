use std::sync::Arc;

use anyhow::Context;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use config::Config;
use features::{info, leaderboard, races, results, season};
use middleware::auth::ApiKeys;
use state::{AppState, GameSettings};

#[derive(OpenApi)]
#[openapi(
    paths(
        races::handlers::list_races,
        races::handlers::current_race,
        races::handlers::get_race,
        races::handlers::race_locks,
        races::handlers::race_bets,
        races::handlers::race_bets_for_viewer,
        races::handlers::submit_race_bets,
        races::handlers::race_score,
        results::handlers::get_result,
        results::handlers::load_result,
        results::handlers::evaluate_race,
        season::handlers::get_standings,
        season::handlers::season_score,
        season::handlers::season_bets,
        season::handlers::season_bets_for_viewer,
        season::handlers::submit_season_bets,
        season::handlers::update_standings,
        season::handlers::evaluate_season,
        leaderboard::handlers::get_leaderboard,
        info::handlers::get_info,
    ),
    components(
        schemas(
            storage::dto::race::RaceResponse,
            storage::dto::race::RaceLocksResponse,
            storage::dto::race::CategoryLockResponse,
            storage::dto::race::RaceBetView,
            storage::dto::race::RaceBetInput,
            storage::dto::race::SubmitRaceBetsRequest,
            storage::dto::race::SubmitRaceBetsResponse,
            storage::dto::result::ResultEntryInput,
            storage::dto::result::LoadResultRequest,
            storage::dto::result::ResultEntryView,
            storage::dto::result::RaceResultResponse,
            storage::dto::result::BonusVerdictInput,
            storage::dto::result::EvaluateRaceRequest,
            storage::dto::result::EvaluationResponse,
            storage::dto::score::RaceScoreResponse,
            storage::dto::score::SlotScore,
            storage::dto::score::DuelScore,
            storage::dto::score::SeasonScoreResponse,
            storage::dto::season::SeasonBetInput,
            storage::dto::season::SubmitSeasonBetsRequest,
            storage::dto::season::SubmitSeasonBetsResponse,
            storage::dto::season::SeasonBetView,
            storage::dto::season::StandingsEntryInput,
            storage::dto::season::UpdateStandingsRequest,
            storage::dto::season::StandingsRow,
            storage::dto::season::StandingsResponse,
            storage::dto::leaderboard::LeaderboardRowResponse,
            storage::dto::leaderboard::LeaderboardResponse,
            info::handlers::InfoResponse,
            info::handlers::DuelPairResponse,
        )
    ),
    tags(
        (name = "races", description = "Race weekends, bets and live race scores"),
        (name = "results", description = "Official race results"),
        (name = "season", description = "Standings, season bets and live season scores"),
        (name = "leaderboard", description = "Ranked tables of stored points"),
        (name = "info", description = "Game rules in force"),
        (name = "admin", description = "Result loading and evaluation batches"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting F1 tipping API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!(
        season_lock = config.season_lock,
        registration_lock = config.registration_lock,
        duels = config.duel_roster.len(),
        excluded = config.standings_exclude.len(),
        "Configuration loaded successfully"
    );

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, every protected endpoint will answer 401");
    }

    let state = AppState {
        db,
        game: Arc::new(GameSettings::from(&config)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let app = routes::api_router(api_keys)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
