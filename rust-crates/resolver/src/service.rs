use crate::{
    client::{
        ResolveGameResponse,
        ResolverClient,
    },
    transport::{
        ResolveCall,
        ResolveTransport,
    },
};
use actix_cors::Cors;
use actix_web::{
    App,
    HttpResponse,
    HttpServer,
    dev::ServerHandle,
    http::header,
    web,
};
use anyhow::Context;
use housebook_contract::{
    AccountId,
    Multiplier,
};
use serde::Deserialize;
use std::{
    net::TcpListener,
    thread::JoinHandle,
};
use tracing::info;

/// Inbound request shape posted by game-outcome producers.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveGameRequest {
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub did_win: Option<bool>,
    #[serde(default)]
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
}

/// HTTP front door for the resolver: accepts game outcomes and drives the
/// resolver client. One instance per process; dropping it stops the server.
pub struct ResolveApi {
    base_url: String,
    server_handle: ServerHandle,
    server_thread: Option<JoinHandle<()>>,
}

impl ResolveApi {
    pub async fn new<T>(
        port: Option<u16>,
        client: ResolverClient<T>,
    ) -> crate::Result<Self>
    where
        T: ResolveTransport + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", port.unwrap_or(0)))
            .context("failed to bind HTTP listener for resolver API")?;
        let address = listener
            .local_addr()
            .context("failed to read listener address")?;
        let base_url = format!("http://{}", address);

        info!("resolver API listening on {}", base_url);

        let data = web::Data::new(client);
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allowed_methods(vec!["POST", "OPTIONS"])
                        .allowed_header(header::CONTENT_TYPE),
                )
                .route("/resolve-game", web::post().to(handle_resolve_game::<T>))
                .route("/healthz", web::get().to(handle_health))
        })
        .listen(listener)
        .context("failed to start Actix server")?
        .run();

        let server_handle = server.handle();
        let server_thread = std::thread::spawn(move || {
            let sys = actix_web::rt::System::new();
            let _ = sys.block_on(server);
        });

        Ok(Self {
            base_url,
            server_handle,
            server_thread: Some(server_thread),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for ResolveApi {
    fn drop(&mut self) {
        let _ = self.server_handle.stop(true);
        if let Some(thread) = self.server_thread.take() {
            let _ = thread.join();
        }
    }
}

async fn handle_health() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn handle_resolve_game<T>(
    client: web::Data<ResolverClient<T>>,
    body: web::Json<ResolveGameRequest>,
) -> HttpResponse
where
    T: ResolveTransport + Send + Sync + 'static,
{
    let request = body.into_inner();
    let game_type = request.game_type.clone();

    let call = match validate(request) {
        Ok(call) => call,
        Err(message) => {
            return HttpResponse::BadRequest().json(ResolveGameResponse {
                success: false,
                transaction_hash: None,
                message,
            });
        }
    };

    info!(
        game_id = %call.game_id,
        account = %call.account,
        won = call.won,
        multiplier = %call.multiplier,
        game_type = game_type.as_deref().unwrap_or("unknown"),
        "received resolve request"
    );

    let response = client.resolve_game(&call).await;
    if response.success {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::BadGateway().json(response)
    }
}

fn validate(request: ResolveGameRequest) -> Result<ResolveCall, String> {
    let (Some(game_id), Some(did_win), Some(multiplier)) =
        (request.game_id, request.did_win, request.multiplier)
    else {
        return Err(
            "Missing required fields: gameId, didWin, multiplier".to_string()
        );
    };
    if game_id.is_empty() {
        return Err("Missing required fields: gameId, didWin, multiplier".to_string());
    }
    let Some(player) = request.player.filter(|p| !p.is_empty()) else {
        return Err("Missing player account to resolve for".to_string());
    };
    let multiplier = Multiplier::from_float(multiplier)
        .ok_or_else(|| format!("Invalid multiplier: {multiplier}"))?;

    Ok(ResolveCall {
        game_id,
        account: AccountId::new(player),
        won: did_win,
        multiplier,
    })
}
