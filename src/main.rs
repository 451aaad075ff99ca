use bve_engine::config::EngineConfig;
use bve_engine::engine::Engine;
use log::*;

const CONFIG_PATH: &str = "config/engine.json";

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("=== BVE Engine starting ===");
    let config = EngineConfig::load_or_default(CONFIG_PATH);
    let engine = Engine::new(config)?;
    info!("Window created, starting frame loop");
    engine.run()?;
    info!("Engine shutdown complete");
    Ok(())
}
