use tactical::{Display, DisplayConfig, House, HouseId, TacticalGame};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::skirmish::Skirmish;

pub(crate) struct AppWiring {
    pub(crate) config: DisplayConfig,
    pub(crate) display: Display,
    pub(crate) game: Box<dyn TacticalGame>,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Tacview Startup ===");

    let config = DisplayConfig::from_env().map_err(|error| error.to_string())?;
    let mut display = Display::new(
        House::human(HouseId(0), "Greece"),
        config.window_width as i32,
        config.window_height as i32,
    );
    display.houses.add(House::new(HouseId(1), "USSR"));
    let game = Skirmish::from_env()?;

    Ok(AppWiring {
        config,
        display,
        game: Box::new(game),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
