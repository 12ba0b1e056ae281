pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Owner of every task created through the API.
        #[serde(default = "default_owner_id")]
        pub default_owner_id: i32,
        /// Frontend origin allowed by CORS.
        #[serde(default = "default_cors_allowed_origin")]
        pub cors_allowed_origin: String,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_environment(config::Environment::default())
        }

        fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_owner_id() -> i32 {
        1
    }

    fn default_cors_allowed_origin() -> String {
        "http://localhost:3000".to_string()
    }

}
pub mod entities;
pub mod task;
pub mod user;
pub mod web;
