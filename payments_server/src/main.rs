use std::env;

use dotenvy::dotenv;
use log::info;
use payments_server::{
    config::{env_values, ServerConfig},
    server::run_server,
};

const HELP: &str = include_str!("./help.txt");

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    // The server takes no arguments, so any argument is a request for help
    if env::args().count() > 1 {
        println!("\n{HELP}\n");
        println!("Current environment values:");
        env_values().iter().for_each(|(name, val)| println!("  {name:<35} {val}"));
        return;
    }
    let config = ServerConfig::from_env_or_default();

    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    match run_server(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}
