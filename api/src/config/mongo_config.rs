use mongodb::{options::ClientOptions, Client};

use crate::config::app_config::AppConfig;

pub async fn setup_mongo(config: &AppConfig, app_name: &str) -> mongodb::error::Result<Client> {
    let mut client_options = ClientOptions::parse(&config.mongo_uri).await?;
    client_options.app_name = Some(app_name.to_string());
    Client::with_options(client_options)
}
