use dr_owl_lib::settings::Settings;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = dr_owl_lib::run(settings).await {
        eprintln!("Error running server: {:#}", e);
        std::process::exit(1);
    }
}
