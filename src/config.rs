use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Surreal,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreKind,
    pub data_file: PathBuf,
    pub db_url: String,
    pub db_namespace: String,
    pub db_name: String,
    pub db_user: String,
    pub db_pass: String,
    pub default_winners: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let store = match env::var("ROLLPOINT_STORE") {
            Ok(v) if v.eq_ignore_ascii_case("surreal") => StoreKind::Surreal,
            Ok(v) if v.is_empty() || v.eq_ignore_ascii_case("file") => StoreKind::File,
            Ok(v) => anyhow::bail!("ROLLPOINT_STORE must be `file` or `surreal`, got `{v}`"),
            Err(_) => StoreKind::File,
        };
        let data_file = env::var("ROLLPOINT_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("rollpoint_records.json"));

        let db_url = env::var("ROLLPOINT_DB_URL").unwrap_or_else(|_| "ws://127.0.0.1:8000".to_string());
        let db_namespace = env::var("ROLLPOINT_DB_NS").unwrap_or_else(|_| "rollpoint".to_string());
        let db_name = env::var("ROLLPOINT_DB_NAME").unwrap_or_else(|_| "desk".to_string());
        let db_user = env::var("ROLLPOINT_DB_USER").unwrap_or_else(|_| "root".to_string());
        let db_pass = env::var("ROLLPOINT_DB_PASS").unwrap_or_else(|_| "root".to_string());

        // Used when a draw request leaves the winner count out
        let default_winners = match env::var("ROLLPOINT_DEFAULT_WINNERS") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("ROLLPOINT_DEFAULT_WINNERS `{v}`: {e}"))?,
            Err(_) => 1,
        };

        Ok(Self {
            store,
            data_file,
            db_url,
            db_namespace,
            db_name,
            db_user,
            db_pass,
            default_winners,
        })
    }

    /// File-backed config, used by tests and one-off tooling.
    pub fn with_data_file(path: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreKind::File,
            data_file: path.into(),
            db_url: "ws://127.0.0.1:8000".to_string(),
            db_namespace: "rollpoint".to_string(),
            db_name: "desk".to_string(),
            db_user: "root".to_string(),
            db_pass: "root".to_string(),
            default_winners: 1,
        }
    }
}
