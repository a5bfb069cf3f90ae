use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sharthi_client::{
    config::Config,
    views::{auth::AuthView, home::HomeView},
    AppState,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sharthi client");
    info!("API base: {}", config.api.base_url);

    let state = AppState::new(config);

    // Восстановление сессии из локального хранилища
    match AuthView::new(state.clone()).bootstrap().await {
        Some(user) => info!("Signed in as {} ({})", user.email, user.role.code()),
        None => info!("No active session"),
    }

    // Смоук-прогон главной: список событий с агрегатами по стендам
    let mut home = HomeView::new(state.clone());
    if let Err(e) = home.load(Some("Delhi"), None).await {
        error!("Home load failed: {}", e);
        return;
    }

    info!("Loaded {} events", home.cards().len());
    for card in home.cards() {
        info!(
            "{} [{}] - from ₹{}, {} stalls left",
            card.event.title, card.event.city_id, card.price_from, card.stalls_available
        );
    }
}
