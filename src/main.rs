mod app;
mod audio;
mod config;
mod geometry;
mod hud;
mod overlay;
mod render;
mod sim;
mod sprites;
mod util;

fn main() {
    env_logger::init();
    log::info!("Big Fish starting up");

    let settings = match config::Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Fatal error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(settings) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
