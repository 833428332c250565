use crate::config::Config;
use crate::raffle::{
    self, PickStrategy, RecordMeta, RecordView, StaffStat, TransactionRecord, ViewerRole,
    models::REFUSAL_NONE, view::suggest_staff_id,
};
use crate::store::RecordStore;
use anyhow::{Context, Result};
use rmcp::model::{CallToolRequestParam, CallToolResult, Content};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub log: String,
    #[serde(default)]
    pub staff_id: String,
    #[serde(default)]
    pub service_name: String,
    pub amount: u32,
    #[serde(default)]
    pub money: u64,
    #[serde(default)]
    pub refusal_type: Option<String>,
    #[serde(default)]
    pub pick_strategy: PickStrategy,
    #[serde(default)]
    pub winner_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawOutcome {
    pub record: TransactionRecord,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsRequest {
    pub role: ViewerRole,
    #[serde(default)]
    pub viewer_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsListing {
    pub views: Vec<RecordView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_you_mean: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct IdArg {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PathArg {
    path: String,
}

#[derive(Clone)]
pub struct RollPointServer {
    pub store: RecordStore,
    pub cfg: Config,
    // Serializes read-modify-write cycles against the store.
    write_lock: Arc<Mutex<()>>,
}

impl RollPointServer {
    pub async fn new(cfg: Config) -> Result<Self> {
        let store = RecordStore::open(&cfg).await?;
        Ok(Self::with_store(cfg, store))
    }

    pub fn with_store(cfg: Config, store: RecordStore) -> Self {
        Self {
            store,
            cfg,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Parse the pasted log, pick winners, append the record and announce it.
    pub async fn draw(&self, req: DrawRequest) -> Result<DrawOutcome> {
        if req.amount == 0 {
            anyhow::bail!("slot count must be at least 1");
        }

        let rolls = raffle::parse(&req.log);
        if rolls.is_empty() {
            anyhow::bail!("no roll lines recognized in the pasted log");
        }

        let meta = RecordMeta {
            staff_id: req.staff_id,
            service_name: req.service_name,
            amount: req.amount,
            money: req.money,
            refusal_type: req
                .refusal_type
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| REFUSAL_NONE.to_string()),
            pick_strategy: req.pick_strategy,
            winner_count: req.winner_count.unwrap_or(self.cfg.default_winners),
        };
        let record = raffle::build(&rolls, &meta);
        let message = raffle::render(&record);

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read_all().await?;
        records.push(record.clone());
        self.store.replace_all(&records).await?;

        info!(
            id = %record.id,
            staff = %record.staff_id,
            strategy = %record.pick_strategy,
            rolls = record.customers.len(),
            winners = record.selected_customers.len(),
            "draw recorded"
        );
        Ok(DrawOutcome { record, message })
    }

    pub async fn records(&self, role: ViewerRole, viewer_id: Option<&str>) -> Result<RecordsListing> {
        let records = self.store.read_all().await?;
        let views = raffle::filter(&records, role, viewer_id);

        let did_you_mean = match (role, viewer_id) {
            (ViewerRole::Staff, Some(id)) if views.is_empty() => suggest_staff_id(&records, id),
            _ => None,
        };
        if let Some(hint) = &did_you_mean {
            warn!(viewer = viewer_id.unwrap_or_default(), hint = %hint, "no records for staff id");
        }
        Ok(RecordsListing {
            views,
            did_you_mean,
        })
    }

    pub async fn stats(&self) -> Result<Vec<StaffStat>> {
        let records = self.store.read_all().await?;
        Ok(raffle::aggregate(&records))
    }

    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        let stats = self.stats().await?;
        raffle::to_csv(&raffle::build_export_rows(&stats))
    }

    /// Write the stats export to `path`; returns the number of stat rows.
    pub async fn export_csv_to(&self, path: &Path) -> Result<usize> {
        let stats = self.stats().await?;
        let bytes = raffle::to_csv(&raffle::build_export_rows(&stats))?;
        tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = stats.len(), "stats exported");
        Ok(stats.len())
    }

    pub async fn remove_record(&self, id: &str) -> Result<TransactionRecord> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read_all().await?;
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .with_context(|| format!("no record with id {id}"))?;
        let removed = records.remove(pos);
        self.store.replace_all(&records).await?;
        info!(id, "record removed");
        Ok(removed)
    }

    pub async fn clear_records(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let count = self.store.read_all().await?.len();
        self.store.replace_all(&[]).await?;
        warn!(count, "all records cleared");
        Ok(count)
    }

    /// Store connectivity + config surface.
    pub async fn handle_health(&self, _req: CallToolRequestParam) -> Result<CallToolResult> {
        let store_ok = self.store.healthcheck().await.unwrap_or(false);
        let body = serde_json::json!({
            "store": self.store.backend(),
            "ok": store_ok,
            "defaultWinners": self.cfg.default_winners,
        });
        Ok(CallToolResult::structured(body))
    }

    pub async fn handle_draw(&self, req: CallToolRequestParam) -> Result<CallToolResult> {
        let outcome = self.draw(tool_args(&req)?).await?;
        Ok(CallToolResult::structured(serde_json::to_value(outcome)?))
    }

    pub async fn handle_records(&self, req: CallToolRequestParam) -> Result<CallToolResult> {
        let args: RecordsRequest = tool_args(&req)?;
        let listing = self.records(args.role, args.viewer_id.as_deref()).await?;
        Ok(CallToolResult::structured(serde_json::to_value(listing)?))
    }

    pub async fn handle_stats(&self, _req: CallToolRequestParam) -> Result<CallToolResult> {
        let stats = self.stats().await?;
        Ok(CallToolResult::structured(serde_json::json!({ "stats": stats })))
    }

    /// Returns CSV text inline, or writes it when a `path` is given.
    pub async fn handle_export_csv(&self, req: CallToolRequestParam) -> Result<CallToolResult> {
        if let Ok(PathArg { path }) = tool_args::<PathArg>(&req) {
            let rows = self.export_csv_to(Path::new(&path)).await?;
            return Ok(CallToolResult::structured(
                serde_json::json!({ "path": path, "rows": rows }),
            ));
        }
        let bytes = self.export_csv().await?;
        let text = String::from_utf8(bytes).context("export is not UTF-8")?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    pub async fn handle_remove_record(&self, req: CallToolRequestParam) -> Result<CallToolResult> {
        let IdArg { id } = tool_args(&req)?;
        let removed = self.remove_record(&id).await?;
        Ok(CallToolResult::structured(serde_json::json!({ "removed": removed.id })))
    }

    pub async fn handle_clear_records(&self, _req: CallToolRequestParam) -> Result<CallToolResult> {
        let count = self.clear_records().await?;
        Ok(CallToolResult::structured(serde_json::json!({ "cleared": count })))
    }
}

fn tool_args<T: DeserializeOwned>(req: &CallToolRequestParam) -> Result<T> {
    let args = serde_json::Value::Object(req.arguments.clone().unwrap_or_default());
    serde_json::from_value(args).with_context(|| format!("invalid arguments for {}", req.name))
}
