use std::{env, fs};

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware, web, App, HttpServer};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use glamour_salon::{db, routes, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let db_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./data/salon.db".to_string());
    db::ensure_sqlite_dir(&db_url)?;

    let connect_options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    db::run_migrations(&pool).await?;
    db::seed_admin(&pool).await?;

    let uploads_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads".to_string());
    fs::create_dir_all(&uploads_dir)?;

    let state = AppState {
        db: pool.clone(),
        uploads_dir: uploads_dir.into(),
    };

    let session_key = match env::var("SECRET_KEY") {
        Ok(secret) if secret.len() >= 32 => Key::derive_from(secret.as_bytes()),
        _ => {
            log::warn!("SECRET_KEY not set (or shorter than 32 bytes); sessions will reset on restart.");
            Key::generate()
        }
    };

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    let address = format!("0.0.0.0:{port}");
    log::info!("Starting Glamour Salon on http://{address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(Files::new("/static", "./static").prefer_utf8(true))
            .configure(routes::public::configure)
            .configure(routes::booking::configure)
            .configure(routes::admin::configure)
            .configure(routes::staff::configure)
            .configure(routes::customer::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
