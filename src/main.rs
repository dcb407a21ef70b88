use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use choice_love::config::{Settings, StorageBackend};
use choice_love::core::Matcher;
use choice_love::routes::{self, handle_json_payload_error, AppState};
use choice_love::services::{
    HttpNotifier, JsonFileStore, LogNotifier, MessageStore, NotificationQueue, Notifier,
    PostgresClient, ProfileStore, RedisStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Choice Love matching service...");
    info!("Configuration loaded successfully (storage: {:?})", settings.storage.backend);

    let (profiles, messages) = open_stores(&settings).await.map_err(|e| {
        error!("Failed to open record store: {}", e);
        std::io::Error::other(e)
    })?;

    let notifier = build_notifier(&settings);
    let (notifications, _worker) =
        NotificationQueue::start(notifier, settings.notifications.queue_capacity);

    let matcher = Matcher::new(settings.scoring_weights(), settings.matching_rules());
    info!(
        "Matcher initialized (threshold: {}, max results: {})",
        matcher.rules().min_compatibility,
        matcher.rules().max_results
    );

    let app_state = AppState {
        profiles,
        messages,
        matcher,
        notifications,
        app_url: settings.notifications.app_url.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

/// Open the configured record store for profiles and messages
async fn open_stores(
    settings: &Settings,
) -> Result<(Arc<dyn ProfileStore>, Arc<dyn MessageStore>), String> {
    match settings.storage.backend {
        StorageBackend::Json => {
            let store = JsonFileStore::open(&settings.storage.data_dir)
                .await
                .map_err(|e| e.to_string())?;
            info!("JSON file store opened at {}", settings.storage.data_dir);
            Ok(shared(store))
        }
        StorageBackend::Postgres => {
            let db = &settings.database;
            let url = db
                .url
                .as_deref()
                .ok_or("database.url must be set for the postgres backend")?;
            let store = PostgresClient::from_settings(
                url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| e.to_string())?;
            info!(
                "PostgreSQL store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Ok(shared(store))
        }
        StorageBackend::Redis => {
            let redis = &settings.redis;
            let store = RedisStore::new(&redis.url, &redis.key_prefix)
                .await
                .map_err(|e| e.to_string())?;
            info!("Redis store initialized (prefix: {})", redis.key_prefix);
            Ok(shared(store))
        }
    }
}

fn shared<S>(store: S) -> (Arc<dyn ProfileStore>, Arc<dyn MessageStore>)
where
    S: ProfileStore + MessageStore + 'static,
{
    let store = Arc::new(store);
    (store.clone() as Arc<dyn ProfileStore>, store as Arc<dyn MessageStore>)
}

/// Pick the notification sink: the mail relay when configured, else a logger
fn build_notifier(settings: &Settings) -> Arc<dyn Notifier> {
    let notifications = &settings.notifications;

    let Some((endpoint, from_address)) = notifications.relay() else {
        warn!("Email notifications not configured - notifications will be logged only");
        return Arc::new(LogNotifier);
    };

    match HttpNotifier::new(
        endpoint.to_string(),
        notifications.api_key.clone(),
        &notifications.from_name,
        from_address,
        Duration::from_secs(notifications.timeout_secs),
    ) {
        Ok(notifier) => {
            info!("Email notifications enabled via {}", endpoint);
            Arc::new(notifier)
        }
        Err(e) => {
            error!("Failed to build mail relay client ({}), logging notifications instead", e);
            Arc::new(LogNotifier)
        }
    }
}
