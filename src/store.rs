//! Where the record collection lives. The raffle core never touches this;
//! callers read the whole collection, derive from it, and write it back.

use crate::config::{Config, StoreKind};
use crate::raffle::TransactionRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use surrealdb::{
    Surreal,
    engine::remote::ws::{Client, Ws},
    opt::auth::Root,
};
use tracing::{debug, info};

const TABLE: &str = "raffle_record";

#[derive(Clone)]
pub enum RecordStore {
    File(JsonFileStore),
    Surreal(SurrealStore),
}

impl RecordStore {
    pub async fn open(cfg: &Config) -> Result<Self> {
        match cfg.store {
            StoreKind::File => Ok(Self::File(JsonFileStore::new(&cfg.data_file))),
            StoreKind::Surreal => Ok(Self::Surreal(SurrealStore::connect(cfg).await?)),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Surreal(_) => "surreal",
        }
    }

    pub async fn read_all(&self) -> Result<Vec<TransactionRecord>> {
        match self {
            Self::File(s) => s.read_all().await,
            Self::Surreal(s) => s.read_all().await,
        }
    }

    pub async fn replace_all(&self, records: &[TransactionRecord]) -> Result<()> {
        match self {
            Self::File(s) => s.replace_all(records).await,
            Self::Surreal(s) => s.replace_all(records).await,
        }
    }

    pub async fn healthcheck(&self) -> Result<bool> {
        match self {
            Self::File(s) => s.healthcheck().await,
            Self::Surreal(s) => s.healthcheck().await,
        }
    }
}

/// Whole collection as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn read_all(&self) -> Result<Vec<TransactionRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no record file yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", self.path.display()))
    }

    pub async fn replace_all(&self, records: &[TransactionRecord]) -> Result<()> {
        let body = serde_json::to_vec_pretty(records)?;
        // Write beside the target and rename so readers never see half a file.
        let tmp = self.path.with_extension("json.tmp");
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = records.len(), "records saved");
        Ok(())
    }

    pub async fn healthcheck(&self) -> Result<bool> {
        Ok(self.read_all().await.is_ok())
    }
}

// One row per record; `seq` keeps the collection order.
#[derive(Debug, Serialize, Deserialize)]
struct RecordRow {
    seq: u64,
    body: TransactionRecord,
}

#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Client>,
}

impl SurrealStore {
    pub async fn connect(cfg: &Config) -> Result<Self> {
        // Ws wants host:port, so drop the scheme.
        let addr = cfg
            .db_url
            .trim_start_matches("ws://")
            .trim_start_matches("wss://")
            .to_string();

        let db = Surreal::new::<Ws>(&addr)
            .await
            .with_context(|| format!("connecting to {}", cfg.db_url))?;
        db.signin(Root {
            username: &cfg.db_user,
            password: &cfg.db_pass,
        })
        .await?;
        db.use_ns(&cfg.db_namespace).use_db(&cfg.db_name).await?;
        info!(ns = %cfg.db_namespace, db = %cfg.db_name, "connected to SurrealDB");
        Ok(Self { db })
    }

    pub async fn read_all(&self) -> Result<Vec<TransactionRecord>> {
        let mut res = self
            .db
            .query(format!("SELECT seq, body FROM {TABLE} ORDER BY seq ASC;"))
            .await?;
        let rows: Vec<RecordRow> = res.take(0)?;
        Ok(rows.into_iter().map(|r| r.body).collect())
    }

    pub async fn replace_all(&self, records: &[TransactionRecord]) -> Result<()> {
        let rows: Vec<RecordRow> = records
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, body)| RecordRow { seq: i as u64, body })
            .collect();

        let sql = if rows.is_empty() {
            format!("BEGIN TRANSACTION; DELETE {TABLE}; COMMIT TRANSACTION;")
        } else {
            format!("BEGIN TRANSACTION; DELETE {TABLE}; INSERT INTO {TABLE} $rows; COMMIT TRANSACTION;")
        };
        self.db.query(sql).bind(("rows", rows)).await?.check()?;
        debug!(count = records.len(), "records replaced in SurrealDB");
        Ok(())
    }

    pub async fn healthcheck(&self) -> Result<bool> {
        let mut res = self.db.query("RETURN 1;").await?;
        let val: Option<i32> = res.take(0)?;
        Ok(val == Some(1))
    }
}
