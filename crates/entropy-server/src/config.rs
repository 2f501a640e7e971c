use std::env;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in: i64,
    pub port: u16,
    pub orgchart_file: PathBuf,
    pub transcripts_dir: PathBuf,
    pub items_per_page: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://db/data/entropy.db".to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expires_in: env::var("JWT_EXPIRES_IN")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .context("JWT_EXPIRES_IN must be a number of seconds")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("PORT must be a valid port")?,
            orgchart_file: env::var("ORGCHART_DATA_FILE")
                .unwrap_or_else(|_| "data/orgchart.json".to_string())
                .into(),
            transcripts_dir: env::var("TRANSCRIPTS_DIR")
                .unwrap_or_else(|_| "bot/transcripts".to_string())
                .into(),
            items_per_page: env::var("ITEMS_PER_PAGE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("ITEMS_PER_PAGE must be a positive number")?,
        })
    }
}
