//! Axum web server exposing both visualizers over JSON and WebSocket.
//!
//! Each visualizer is one [`Session`]. Its playback controls live under
//! `/api/{sorting,pathfinding}/...`, scene edits sit beside them, and
//! `/ws/{sorting,pathfinding}` streams a fresh frame after every change.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stepwise_grid::{Grid, PathAlgorithm};
use stepwise_sort::SortAlgorithm;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

use crate::config::VisConfig;
use crate::error::{Error, Result};
use crate::playback::{Playback, Scene, StatusOf};
use crate::session::{FrameOf, Session};
use crate::store::{BarStore, EditAction, GridStore};
use crate::timer::Speed;

/// A scene the server can expose.
pub trait Served: Scene + Send + Sync + 'static {
    /// Parse a user-supplied algorithm name.
    fn parse_algorithm(name: &str) -> Result<Self::Algorithm>;
}

impl Served for BarStore {
    fn parse_algorithm(name: &str) -> Result<SortAlgorithm> {
        Ok(name.parse()?)
    }
}

impl Served for GridStore {
    fn parse_algorithm(name: &str) -> Result<PathAlgorithm> {
        Ok(name.parse()?)
    }
}

/// Shared application state.
pub struct AppState {
    pub sorting: Arc<Session<BarStore>>,
    pub pathfinding: Arc<Session<GridStore>>,
}

impl AppState {
    /// Build both sessions from `config`.
    pub fn new(config: &VisConfig) -> Result<Self> {
        let bars = BarStore::random(config.array_size, config.rng(0));
        let mut sorting = Playback::new(bars, SortAlgorithm::default(), config.pacing);
        sorting.set_speed(config.speed);

        let grid = Grid::with_size(config.grid_rows, config.grid_cols)?;
        let cells = GridStore::new(grid, config.rng(1));
        let mut pathfinding = Playback::new(cells, PathAlgorithm::default(), config.pacing);
        pathfinding.set_speed(config.speed);

        Ok(Self {
            sorting: Session::new("sorting", sorting),
            pathfinding: Session::new("pathfinding", pathfinding),
        })
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
    addr: SocketAddr,
}

impl VisServer {
    pub fn new(config: &VisConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
            addr: config.api_addr,
        })
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        let sorting = self.state.sorting.clone();
        let pathfinding = self.state.pathfinding.clone();

        let router = Router::new()
            .route("/api/status", get(status_handler))
            // Scene edits
            .route("/api/sorting/array", post(array_handler))
            .route("/api/sorting/size", post(size_handler))
            .route("/api/pathfinding/edit", post(edit_handler))
            .route("/api/pathfinding/walls/clear", post(clear_walls_handler))
            .route("/api/pathfinding/walls/random", post(random_walls_handler));

        // Snapshots, playback controls and WebSocket per visualizer
        let router = session_routes(router, "sorting", sorting);
        let router = session_routes(router, "pathfinding", pathfinding);

        router
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server until the listener fails.
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("Visualization server running on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

fn session_routes<S: Served>(
    router: Router<Arc<AppState>>,
    name: &str,
    session: Arc<Session<S>>,
) -> Router<Arc<AppState>> {
    let api = format!("/api/{name}");
    router
        .route(&api, get(frame_handler::<S>).with_state(session.clone()))
        .route(&format!("{api}/start"), post(start_handler::<S>).with_state(session.clone()))
        .route(&format!("{api}/pause"), post(pause_handler::<S>).with_state(session.clone()))
        .route(&format!("{api}/step"), post(step_handler::<S>).with_state(session.clone()))
        .route(&format!("{api}/reset"), post(reset_handler::<S>).with_state(session.clone()))
        .route(&format!("{api}/speed"), post(speed_handler::<S>).with_state(session.clone()))
        .route(
            &format!("{api}/algorithm"),
            post(algorithm_handler::<S>).with_state(session.clone()),
        )
        .route(&format!("/ws/{name}"), get(ws_handler::<S>).with_state(session))
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!("request failed: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    sorting: StatusOf<BarStore>,
    pathfinding: StatusOf<GridStore>,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        sorting: state.sorting.status().await,
        pathfinding: state.pathfinding.status().await,
    })
}

async fn frame_handler<S: Served>(State(session): State<Arc<Session<S>>>) -> Json<FrameOf<S>> {
    Json(session.frame().await)
}

async fn start_handler<S: Served>(State(session): State<Arc<Session<S>>>) -> Json<StatusOf<S>> {
    session.start().await;
    Json(session.status().await)
}

async fn pause_handler<S: Served>(State(session): State<Arc<Session<S>>>) -> Json<StatusOf<S>> {
    session.pause().await;
    Json(session.status().await)
}

async fn step_handler<S: Served>(State(session): State<Arc<Session<S>>>) -> Json<StatusOf<S>> {
    session.step().await;
    Json(session.status().await)
}

async fn reset_handler<S: Served>(State(session): State<Arc<Session<S>>>) -> Json<StatusOf<S>> {
    session.reset().await;
    Json(session.status().await)
}

#[derive(Deserialize)]
struct SpeedRequest {
    percent: u32,
}

async fn speed_handler<S: Served>(
    State(session): State<Arc<Session<S>>>,
    Json(req): Json<SpeedRequest>,
) -> Json<StatusOf<S>> {
    session
        .update(|playback| playback.set_speed(Speed::new(req.percent)))
        .await;
    Json(session.status().await)
}

#[derive(Deserialize)]
struct AlgorithmRequest {
    name: String,
}

async fn algorithm_handler<S: Served>(
    State(session): State<Arc<Session<S>>>,
    Json(req): Json<AlgorithmRequest>,
) -> Result<Json<StatusOf<S>>> {
    let algorithm = S::parse_algorithm(&req.name)?;
    session
        .update(|playback| playback.select_algorithm(algorithm))
        .await;
    Ok(Json(session.status().await))
}

/// Outcome of a scene edit.
#[derive(Serialize)]
struct EditResponse<F> {
    /// Whether the scene changed.
    applied: bool,
    frame: F,
}

#[derive(Deserialize)]
struct ArrayRequest {
    input: String,
}

async fn array_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ArrayRequest>,
) -> Json<EditResponse<FrameOf<BarStore>>> {
    let session = &state.sorting;
    let applied = session
        .update(|playback| playback.reset_and_edit(|bars| bars.set_custom_input(&req.input)))
        .await;
    debug!(applied, "custom array");
    Json(EditResponse {
        applied,
        frame: session.frame().await,
    })
}

#[derive(Deserialize)]
struct SizeRequest {
    size: usize,
}

async fn size_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SizeRequest>,
) -> Json<EditResponse<FrameOf<BarStore>>> {
    let session = &state.sorting;
    session
        .update(|playback| playback.reset_and_edit(|bars| bars.regenerate(req.size)))
        .await;
    Json(EditResponse {
        applied: true,
        frame: session.frame().await,
    })
}

#[derive(Deserialize)]
struct EditRequest {
    row: usize,
    col: usize,
    action: EditAction,
}

async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EditRequest>,
) -> Result<Json<EditResponse<FrameOf<GridStore>>>> {
    let session = &state.pathfinding;
    let applied = session
        .update(|playback| playback.edit(|cells| cells.edit(req.row, req.col, req.action)))
        .await
        .transpose()?
        .unwrap_or(false);
    Ok(Json(EditResponse {
        applied,
        frame: session.frame().await,
    }))
}

async fn clear_walls_handler(
    State(state): State<Arc<AppState>>,
) -> Json<EditResponse<FrameOf<GridStore>>> {
    let session = &state.pathfinding;
    session
        .update(|playback| playback.reset_and_edit(GridStore::clear_walls))
        .await;
    Json(EditResponse {
        applied: true,
        frame: session.frame().await,
    })
}

async fn random_walls_handler(
    State(state): State<Arc<AppState>>,
) -> Json<EditResponse<FrameOf<GridStore>>> {
    let session = &state.pathfinding;
    session
        .update(|playback| {
            playback.reset_and_edit(|cells| cells.randomize_walls(GridStore::WALL_DENSITY))
        })
        .await;
    Json(EditResponse {
        applied: true,
        frame: session.frame().await,
    })
}

/// Commands accepted over a visualizer's WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    Step,
    Reset,
    Speed { percent: u32 },
    Algorithm { name: String },
}

/// Messages pushed to WebSocket clients.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Outgoing<F> {
    Frame { frame: F },
    Error { message: String },
}

async fn apply_command<S: Served>(session: &Arc<Session<S>>, command: Command) -> Result<()> {
    match command {
        Command::Start => session.start().await,
        Command::Pause => {
            session.pause().await;
        }
        Command::Step => {
            session.step().await;
        }
        Command::Reset => session.reset().await,
        Command::Speed { percent } => {
            session
                .update(|playback| playback.set_speed(Speed::new(percent)))
                .await
        }
        Command::Algorithm { name } => {
            let algorithm = S::parse_algorithm(&name)?;
            session
                .update(|playback| playback.select_algorithm(algorithm))
                .await
        }
    }
    Ok(())
}

async fn ws_handler<S: Served>(
    ws: WebSocketUpgrade,
    State(session): State<Arc<Session<S>>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, session))
}

/// Push a frame on connect and after every revision; apply incoming
/// commands.
async fn handle_socket<S: Served>(mut socket: WebSocket, session: Arc<Session<S>>) {
    info!(session = session.name(), "WebSocket client connected");
    let mut revisions = session.subscribe();

    if let Err(e) = send_frame(&mut socket, &session).await {
        warn!("Failed to send initial frame: {}", e);
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let outcome = match serde_json::from_str::<Command>(&text) {
                            Ok(command) => {
                                debug!(?command, "received command");
                                apply_command(&session, command).await
                            }
                            Err(e) => Err(Error::from(e)),
                        };
                        if let Err(e) = outcome {
                            let message = Outgoing::<()>::Error { message: e.to_string() };
                            if let Err(e) = send(&mut socket, &message).await {
                                warn!("Failed to send error: {}", e);
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(session = session.name(), "WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = socket.send(Message::Pong(data)).await {
                            warn!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                revisions.borrow_and_update();
                if let Err(e) = send_frame(&mut socket, &session).await {
                    warn!("Failed to send frame: {}", e);
                    break;
                }
            }
        }
    }
}

async fn send_frame<S: Served>(socket: &mut WebSocket, session: &Session<S>) -> Result<()> {
    let frame = session.frame().await;
    send(socket, &Outgoing::Frame { frame }).await
}

async fn send<T: Serialize>(socket: &mut WebSocket, message: &T) -> Result<()> {
    let json = serde_json::to_string(message)?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_tagged_json() {
        let command: Command = serde_json::from_str(r#"{"type":"speed","percent":80}"#).unwrap();
        assert!(matches!(command, Command::Speed { percent: 80 }));
        let command: Command = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
        assert!(matches!(command, Command::Start));
        assert!(serde_json::from_str::<Command>(r#"{"type":"rewind"}"#).is_err());
    }

    #[test]
    fn algorithm_names_parse_per_scene() {
        assert_eq!(BarStore::parse_algorithm("Merge").unwrap(), SortAlgorithm::Merge);
        assert_eq!(GridStore::parse_algorithm("a*").unwrap(), PathAlgorithm::AStar);
        assert!(BarStore::parse_algorithm("bogo").unwrap_err().is_client_error());
        assert!(GridStore::parse_algorithm("bfs").unwrap_err().is_client_error());
    }

    #[test]
    fn client_errors_map_to_bad_request() {
        let err = GridStore::parse_algorithm("bfs").unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        let err = Error::Config("nope".into());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn app_state_follows_config() {
        let config = VisConfig {
            array_size: 12,
            grid_rows: 10,
            grid_cols: 12,
            seed: Some(9),
            ..VisConfig::default()
        };
        let state = AppState::new(&config).unwrap();
        let sorting = state.sorting.frame().await;
        assert_eq!(sorting.scene.bars.len(), 12);
        let grid = state.pathfinding.frame().await.scene.grid;
        assert_eq!((grid.rows(), grid.cols()), (10, 12));
    }

    #[tokio::test]
    async fn invalid_grid_config_is_rejected() {
        let config = VisConfig {
            grid_rows: 0,
            ..VisConfig::default()
        };
        assert!(matches!(AppState::new(&config), Err(Error::Grid(_))));
    }

    #[tokio::test]
    async fn websocket_commands_drive_the_session() {
        let state = AppState::new(&VisConfig {
            seed: Some(4),
            ..VisConfig::default()
        })
        .unwrap();
        apply_command(&state.sorting, Command::Step).await.unwrap();
        assert_eq!(
            state.sorting.status().await.state,
            crate::playback::PlaybackState::Paused
        );
        apply_command(&state.sorting, Command::Reset).await.unwrap();
        assert_eq!(state.sorting.status().await.total_steps, 0);
        assert!(apply_command(
            &state.pathfinding,
            Command::Algorithm {
                name: "nope".into()
            }
        )
        .await
        .is_err());
    }
}
