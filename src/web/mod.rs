mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{
    config::{validate_rates, Params, ParamsError},
    engine::{EngineBuilder, EngineSettings, TickPacer},
    history::History,
    scenario::Scenario,
    systems::{CarnivoreSystem, GrassSystem, HerbivoreSystem},
    world::{TickReport, World, WorldFrame},
};

/// Wall-clock cadence of the simulation thread. Ticks per frame come from
/// the pacer, so this only bounds how often the browser hears from us.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Clone, Serialize)]
pub struct UiFrame {
    pub snapshot: WorldFrame,
    pub history: Vec<TickReport>,
    pub running: bool,
}

#[derive(Clone, Serialize)]
pub struct StateEnvelope {
    pub scenario: String,
    pub params: Params,
    pub running: bool,
    pub frame: Option<UiFrame>,
}

struct AppState {
    broadcaster: broadcast::Sender<String>,
    params: Arc<Mutex<Params>>,
    latest_frame: Arc<Mutex<Option<UiFrame>>>,
    history: Arc<Mutex<History>>,
    running: Arc<AtomicBool>,
    reset_requested: Arc<AtomicBool>,
    scenario_name: String,
}

pub struct WebServerConfig {
    pub scenario: Scenario,
    pub seed: u64,
    pub snapshot_interval: u64,
    pub snapshot_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        seed,
        snapshot_interval,
        snapshot_dir,
        host,
        port,
    } = config;

    let scenario_name = scenario.name.clone();
    let mut world = scenario.build_world();
    let settings = EngineSettings {
        scenario_name: scenario_name.clone(),
        seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
    };

    let mut engine = EngineBuilder::new(settings)
        .with_system(GrassSystem::new())
        .with_system(HerbivoreSystem::new())
        .with_system(CarnivoreSystem::new())
        .build();

    let (tx, _) = broadcast::channel::<String>(512);
    let params: Arc<Mutex<Params>> = Arc::new(Mutex::new(scenario.params));
    let latest_frame: Arc<Mutex<Option<UiFrame>>> = Arc::new(Mutex::new(None));
    let history: Arc<Mutex<History>> = Arc::new(Mutex::new(History::default()));
    let running = Arc::new(AtomicBool::new(true));
    let reset_requested = Arc::new(AtomicBool::new(false));

    let params_for_sim = params.clone();
    let latest_for_sim = latest_frame.clone();
    let history_for_sim = history.clone();
    let running_for_sim = running.clone();
    let reset_for_sim = reset_requested.clone();
    let tx_for_sim = tx.clone();

    let sim_handle = tokio::task::spawn_blocking(move || -> Result<()> {
        let publish = |world: &World, running: bool| {
            let frame = UiFrame {
                snapshot: world.frame(),
                history: history_for_sim
                    .lock()
                    .expect("history lock poisoned")
                    .points(),
                running,
            };
            {
                let mut guard = latest_for_sim.lock().expect("latest frame lock poisoned");
                *guard = Some(frame.clone());
            }
            if let Ok(payload) = serde_json::to_string(&frame) {
                let _ = tx_for_sim.send(payload);
            }
        };

        let start_params = *params_for_sim.lock().expect("params lock poisoned");
        engine.reset(&mut world, &start_params);
        publish(&world, true);

        let mut pacer = TickPacer::new();
        loop {
            thread::sleep(FRAME_INTERVAL);
            // One snapshot per frame: edits from the control surface land on
            // a tick boundary and every tick this frame sees the same rates.
            let params = *params_for_sim.lock().expect("params lock poisoned");
            let running = running_for_sim.load(Ordering::SeqCst);

            if reset_for_sim.swap(false, Ordering::SeqCst) {
                engine.reset(&mut world, &params);
                history_for_sim
                    .lock()
                    .expect("history lock poisoned")
                    .clear();
                pacer.reset();
                publish(&world, running);
                continue;
            }

            if !running {
                continue;
            }

            let ticks = pacer.advance(params.speed_multiplier);
            if ticks == 0 {
                continue;
            }
            engine.run_with_hook(&mut world, &params, ticks, |report| {
                history_for_sim
                    .lock()
                    .expect("history lock poisoned")
                    .push(report);
            })?;
            publish(&world, true);
        }
    });

    let state = Arc::new(AppState {
        broadcaster: tx.clone(),
        params,
        latest_frame,
        history,
        running,
        reset_requested,
        scenario_name: scenario_name.clone(),
    });

    tokio::spawn(async move {
        match sim_handle.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                eprintln!("[web] Simulation error: {err:?}");
            }
            Err(err) => {
                eprintln!("[web] Simulation task failed: {err:?}");
            }
        }
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/state", get(current_state))
        .route("/api/history", get(history_points))
        .route("/api/params", get(get_params).post(set_params))
        .route("/api/control", post(control))
        .route("/api/events", get(stream_events))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", host, port))?;

    println!(
        "🦁 Savanna UI live at http://{}:{} (Ctrl+C to stop)",
        host, port
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!("Shutting down web UI...");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/css; charset=utf-8")
        .body(assets::STYLES_CSS.to_string())
        .unwrap()
}

async fn script() -> impl IntoResponse {
    Response::builder()
        .header(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )
        .body(assets::APP_JS.to_string())
        .unwrap()
}

async fn current_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let frame = state
        .latest_frame
        .lock()
        .expect("latest frame lock poisoned")
        .clone();
    Json(StateEnvelope {
        scenario: state.scenario_name.clone(),
        params: *state.params.lock().expect("params lock poisoned"),
        running: state.running.load(Ordering::SeqCst),
        frame,
    })
}

#[derive(Serialize)]
struct HistoryResponse {
    points: Vec<TickReport>,
}

async fn history_points(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    let points = state.history.lock().expect("history lock poisoned").points();
    Json(HistoryResponse { points })
}

async fn get_params(State(state): State<Arc<AppState>>) -> Json<Params> {
    Json(*state.params.lock().expect("params lock poisoned"))
}

/// Raw values from the control surface. Everything arrives as a float (the
/// sliders and number inputs make no distinction); integral fields truncate
/// toward zero after validation.
#[derive(Clone, Copy, Debug, Deserialize)]
struct ParamsForm {
    speed_multiplier: f64,
    herb_move_cost: f64,
    herb_grass_gain: f64,
    herb_reproduce_energy: f64,
    herb_reproduce_cooldown: f64,
    grass_regrow_time: f64,
    carn_move_cost: f64,
    carn_prey_gain: f64,
    carn_reproduce_energy: f64,
    initial_herbivores: f64,
    initial_carnivores: f64,
}

impl ParamsForm {
    fn validate(&self) -> Result<(), ParamsError> {
        validate_rates(&[
            ("speed_multiplier", self.speed_multiplier),
            ("herb_move_cost", self.herb_move_cost),
            ("herb_grass_gain", self.herb_grass_gain),
            ("herb_reproduce_energy", self.herb_reproduce_energy),
            ("herb_reproduce_cooldown", self.herb_reproduce_cooldown),
            ("grass_regrow_time", self.grass_regrow_time),
            ("carn_move_cost", self.carn_move_cost),
            ("carn_prey_gain", self.carn_prey_gain),
            ("carn_reproduce_energy", self.carn_reproduce_energy),
            ("initial_herbivores", self.initial_herbivores),
            ("initial_carnivores", self.initial_carnivores),
        ])
    }

    fn into_params(self) -> Params {
        Params {
            speed_multiplier: self.speed_multiplier,
            herb_move_cost: self.herb_move_cost,
            herb_grass_gain: self.herb_grass_gain,
            herb_reproduce_energy: self.herb_reproduce_energy,
            herb_reproduce_cooldown: truncate_count(self.herb_reproduce_cooldown),
            grass_regrow_time: truncate_count(self.grass_regrow_time),
            carn_move_cost: self.carn_move_cost,
            carn_prey_gain: self.carn_prey_gain,
            carn_reproduce_energy: self.carn_reproduce_energy,
            initial_herbivores: truncate_count(self.initial_herbivores),
            initial_carnivores: truncate_count(self.initial_carnivores),
        }
    }
}

// Validation has already rejected negatives and non-finite values, so the
// saturating cast only ever truncates the fraction.
fn truncate_count(value: f64) -> u32 {
    value as u32
}

async fn set_params(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ParamsForm>,
) -> Result<Json<Params>, (StatusCode, String)> {
    if let Err(err) = form.validate() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, err.to_string()));
    }
    let new_params = form.into_params();
    *state.params.lock().expect("params lock poisoned") = new_params;
    Ok(Json(new_params))
}

#[derive(Debug, Deserialize)]
struct ControlRequest {
    action: ControlAction,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ControlAction {
    Pause,
    Resume,
    Reset,
}

#[derive(Serialize)]
struct ControlResponse {
    running: bool,
}

async fn control(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ControlRequest>,
) -> Json<ControlResponse> {
    match request.action {
        ControlAction::Pause => state.running.store(false, Ordering::SeqCst),
        ControlAction::Resume => state.running.store(true, Ordering::SeqCst),
        // The simulation thread honors this on its next frame, between ticks.
        ControlAction::Reset => state.reset_requested.store(true, Ordering::SeqCst),
    }
    Json(ControlResponse {
        running: state.running.load(Ordering::SeqCst),
    })
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
