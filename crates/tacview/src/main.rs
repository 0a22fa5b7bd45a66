mod app;

use tactical::run_app;
use tracing::error;

fn main() {
    let wiring = match app::build_app() {
        Ok(wiring) => wiring,
        Err(err) => {
            error!(error = %err, "startup_failed");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_app(wiring.config, wiring.display, wiring.game) {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}
