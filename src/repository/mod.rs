pub mod repository_error;
pub mod user_repo;
pub mod client_repo;
pub mod quote_repo;
pub mod meeting_repo;
pub mod document_repo;

use crate::config::mongo_conf::MongoConfig;
use mongodb::options::{ClientOptions, Credential, ResolverConfig};
use mongodb::{Client, Database};

/// Open a handle to the configured database. Each repository builds its own
/// collection handle from this; the driver pools connections internally.
pub async fn connect_database(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    let mut client_options =
        ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
    client_options.app_name = Some("PraxisBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));

    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }

    let client = Client::with_options(client_options)?;
    Ok(client.database(&config.database))
}
