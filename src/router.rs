use crate::raffle::KNOWN_REFUSALS;
use crate::server::RollPointServer;
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, InitializeRequestParam,
        InitializeResult, JsonObject, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo, Tool, ToolsCapability,
    },
    service::RequestContext,
};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct Router(pub RollPointServer);

fn schema(value: serde_json::Value) -> Arc<JsonObject> {
    Arc::new(value.as_object().cloned().unwrap_or_default())
}

fn tool(name: &'static str, title: &'static str, description: &'static str, input: Arc<JsonObject>) -> Tool {
    Tool {
        name: name.into(),
        title: Some(title.into()),
        description: Some(description.into()),
        input_schema: input,
        icons: None,
        annotations: None,
        output_schema: None,
        meta: None,
    }
}

fn internal(e: anyhow::Error) -> McpError {
    McpError {
        code: rmcp::model::ErrorCode::INTERNAL_ERROR,
        message: format!("{e:#}").into(),
        data: None,
    }
}

impl ServerHandler for Router {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "rollpoint-desk".to_string(),
                title: Some("Roll-Point Desk".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Paste a chat log into `draw` to pick winners; `stats` and `export_csv` summarize past draws."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<rmcp::service::RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        let mut info = self.get_info();
        info.protocol_version = request.protocol_version.clone();
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<rmcp::service::RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        let empty = schema(json!({ "type": "object" }));
        let draw = schema(json!({
            "type": "object",
            "properties": {
                "log": { "type": "string", "description": "Pasted chat log" },
                "staffId": { "type": "string" },
                "serviceName": { "type": "string" },
                "amount": { "type": "integer", "minimum": 1 },
                "money": { "type": "integer", "minimum": 0 },
                "refusalType": { "type": "string", "examples": KNOWN_REFUSALS },
                "pickStrategy": { "type": "string", "enum": ["max", "min"] },
                "winnerCount": { "type": "integer", "minimum": 0 }
            },
            "required": ["log", "amount"]
        }));
        let records = schema(json!({
            "type": "object",
            "properties": {
                "role": { "type": "string", "enum": ["manager", "staff", "guest"] },
                "viewerId": { "type": "string" }
            },
            "required": ["role"]
        }));
        let export = schema(json!({
            "type": "object",
            "properties": { "path": { "type": "string", "description": "Write the CSV here instead of returning it" } }
        }));
        let remove = schema(json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"]
        }));

        let tools = vec![
            tool("health", "Health", "Check record store connectivity and config surface", empty.clone()),
            tool("draw", "Draw", "Parse a roll log, pick winners and record the draw", draw),
            tool("records", "Records", "List records as seen by a manager, a staff member or a guest", records),
            tool("stats", "Stats", "Per staff and service totals, refusals and salary", empty.clone()),
            tool("export_csv", "Export CSV", "Stats as a quoted, BOM-prefixed CSV", export),
            tool("remove_record", "Remove record", "Delete one record by id", remove),
            tool("clear_records", "Clear records", "Delete every stored record", empty),
        ];

        Ok(ListToolsResult {
            tools,
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<rmcp::service::RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match request.name.as_ref() {
            "health" => self.0.handle_health(request).await.map_err(internal),
            "draw" => self.0.handle_draw(request).await.map_err(internal),
            "records" => self.0.handle_records(request).await.map_err(internal),
            "stats" => self.0.handle_stats(request).await.map_err(internal),
            "export_csv" => self.0.handle_export_csv(request).await.map_err(internal),
            "remove_record" => self.0.handle_remove_record(request).await.map_err(internal),
            "clear_records" => self.0.handle_clear_records(request).await.map_err(internal),
            _ => Err(McpError {
                code: rmcp::model::ErrorCode::METHOD_NOT_FOUND,
                message: format!("Unknown tool: {}", request.name).into(),
                data: None,
            }),
        }
    }
}
