use serde_derive::Deserialize;


pub const ENV_PREFIX: &str = "H11SERVE";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: i64 = 4221;
const DEFAULT_WORKERS: i64 = 16;
const DEFAULT_LOG_KIND: &str = "console";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FILE: &str = "h11serve.log";


#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub kind: String,
    pub level: String,
    pub file: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilesConfig {
    pub directory: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub log: LogConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

impl Config {
    /// Defaults, then the optional file at `path`, then `H11SERVE_*`
    /// environment variables (`H11SERVE_SERVER__PORT=8080`).
    pub fn load(path: Option<&str>) -> Result<Config, ::config::ConfigError> {
        Config::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`Config::load`] but reads variables named `{env_prefix}_*`.
    pub fn load_with_prefix(path: Option<&str>, env_prefix: &str) -> Result<Config, ::config::ConfigError> {
        let mut builder = ::config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", DEFAULT_PORT)?
            .set_default("server.workers", DEFAULT_WORKERS)?
            .set_default("log.kind", DEFAULT_LOG_KIND)?
            .set_default("log.level", DEFAULT_LOG_LEVEL)?
            .set_default("log.file", DEFAULT_LOG_FILE)?;

        if let Some(path) = path {
            builder = builder.add_source(::config::File::with_name(path));
        }

        let cfg: Config = builder
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ::config::ConfigError> {
        if self.server.workers == 0 {
            return Err(::config::ConfigError::Message("server.workers must be at least 1".to_string()));
        }
        Ok(())
    }
}
