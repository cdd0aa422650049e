//! Pokedex Arena MCP Server
//!
//! A Model Context Protocol server (rmcp, stdio transport) that exposes the
//! battle simulator and the creature catalog for LLM interaction.

use std::borrow::Cow;
use std::sync::Arc;

use pokedex_arena::battle::runner::BattleRunner;
use pokedex_arena::catalog::{self, CatalogSource};
use pokedex_arena::compare::compare_by_key;
use pokedex_arena::config::ArenaConfig;
use pokedex_arena::logging;
use pokedex_arena::mcp_interface::*;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct PokedexArenaService {
    tool_router: ToolRouter<PokedexArenaService>,
    catalog: Arc<dyn CatalogSource>,
    runner: Arc<Mutex<BattleRunner>>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartBattleRequest {
    #[schemars(description = "First creature, by name or dex number (e.g. 'pikachu' or '25')")]
    pub first: String,
    #[schemars(description = "Second creature, by name or dex number")]
    pub second: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupCreatureRequest {
    #[schemars(description = "Creature name or dex number to look up")]
    pub creature: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareCreaturesRequest {
    #[schemars(description = "First creature, by name or dex number")]
    pub first: String,
    #[schemars(description = "Second creature, by name or dex number")]
    pub second: String,
}

fn internal_error(context: &str, err: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode(-32603),
        message: Cow::from(format!("{}: {}", context, err)),
        data: None,
    }
}

fn text_result(text: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_router]
impl PokedexArenaService {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            runner: Arc::new(Mutex::new(BattleRunner::new(catalog.clone()))),
            catalog,
        }
    }

    #[tool(description = "Start a new battle between two distinct creatures. The faster one moves first.")]
    async fn start_battle(
        &self,
        Parameters(request): Parameters<StartBattleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut runner = self.runner.lock().await;
        let text = handle_start_battle_command(&mut runner, &request.first, &request.second)
            .await
            .map_err(|e| internal_error("Error starting battle", e))?;
        text_result(text)
    }

    #[tool(description = "The creature whose turn it is attacks its opponent")]
    async fn attack(&self) -> Result<CallToolResult, McpError> {
        let mut runner = self.runner.lock().await;
        let text = match runner.attack() {
            Ok(result) => {
                let mut text = format_attack_result(&result);
                text.push('\n');
                text.push_str(&display_battle_status(&runner.battle_info()));
                text
            }
            Err(err) => format!("Error: {}", err),
        };
        text_result(text)
    }

    #[tool(description = "Discard the current battle")]
    async fn reset_battle(&self) -> Result<CallToolResult, McpError> {
        self.runner.lock().await.reset();
        text_result("Battle reset. Use 'start_battle' to begin a new one.".to_string())
    }

    #[tool(description = "Get the current battle state as JSON")]
    async fn get_battle_state(&self) -> Result<CallToolResult, McpError> {
        let info = self.runner.lock().await.battle_info();
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| internal_error("Cannot serialize battle state", e))?;
        text_result(json)
    }

    #[tool(description = "Look up a creature's types, size, abilities and base stats, plus lore and evolutions when the catalog has them")]
    async fn lookup_creature(
        &self,
        Parameters(request): Parameters<LookupCreatureRequest>,
    ) -> Result<CallToolResult, McpError> {
        text_result(handle_lookup_creature_command(self.catalog.as_ref(), &request.creature).await)
    }

    #[tool(description = "Compare two creatures stat by stat; the higher base stat total wins")]
    async fn compare_creatures(
        &self,
        Parameters(request): Parameters<CompareCreaturesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = match compare_by_key(self.catalog.as_ref(), &request.first, &request.second).await {
            Ok(comparison) => display_comparison(&comparison),
            Err(err) => format!("Error: {}", err),
        };
        text_result(text)
    }
}

#[tool_handler]
impl ServerHandler for PokedexArenaService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(tracing::Level::INFO);

    let config = ArenaConfig::from_env();
    let catalog = catalog::from_config(&config)?;
    info!(source = catalog.source_name(), "Pokedex Arena MCP server starting");

    let service = PokedexArenaService::new(catalog);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    info!("server running, waiting for shutdown");

    let quit_reason = server.waiting().await?;
    info!("Pokedex Arena MCP server exiting: {:?}", quit_reason);
    Ok(())
}
