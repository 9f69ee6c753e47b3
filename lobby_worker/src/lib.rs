use worker::*;

mod pages;

// Export the Durable Object from relay_do
pub use relay_do::RelayDO;

/// Every screen and controller shares this one relay instance
const LOBBY_NAME: &str = "lobby";

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: worker::Context) -> Result<Response> {
    let router = Router::new();

    router
        .get_async("/", handle_screen)
        .get_async("/controller.html", handle_controller)
        .get_async("/health", handle_health)
        .get_async("/ws", handle_ws)
        .run(req, env)
        .await
}

async fn handle_screen(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    Response::from_html(pages::SCREEN_HTML)
}

async fn handle_controller(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    Response::from_html(pages::CONTROLLER_HTML)
}

async fn handle_health(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    Response::from_json(&serde_json::json!({ "status": "ok" }))
}

async fn handle_ws(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let is_upgrade = req
        .headers()
        .get("Upgrade")?
        .is_some_and(|h| h.eq_ignore_ascii_case("websocket"));
    if !is_upgrade {
        return Response::error("Expected WebSocket upgrade request", 426);
    }

    // Get the RELAY Durable Object namespace
    let relay = ctx.env.durable_object("RELAY")?;

    // Get DO stub by name (creates if doesn't exist)
    let stub = relay.get_by_name(LOBBY_NAME)?;

    stub.fetch_with_request(req).await
}
