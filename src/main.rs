use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, info, warn};

use airtrace::export::JsonLinePresenter;
use airtrace::headless::{LogView, PassthroughVisionProcessor, ReplayCamera};
use airtrace::{AppError, Configuration, SessionController, SessionHandle};

// Input side of the packaged tracking model.
const TRACKING_INPUT_SIDE: u32 = 416;

#[derive(Parser, Debug)]
#[command(name = "airtrace", about = "Air-drawn character recognition session")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of images replayed as the camera feed.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Replay cadence in frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "onnx")]
fn spawn_model_loaders(controller: &SessionController, configuration: &Configuration) {
    use airtrace::model::{
        AssetSource, DirectoryAssetSource, InferenceBackend, ModelLoader, ModelRole, OnnxBackend,
    };

    let backend: Arc<dyn InferenceBackend> = Arc::new(OnnxBackend::new());
    let source: Arc<dyn AssetSource> =
        Arc::new(DirectoryAssetSource::new(configuration.assets_dir.clone()));
    let loaders = [ModelRole::Tracking, ModelRole::Classification].map(|role| {
        ModelLoader::from_configuration(
            role,
            configuration,
            Arc::clone(&source),
            Arc::clone(&backend),
        )
    });
    controller.spawn_model_loaders(loaders);
}

#[cfg(not(feature = "onnx"))]
fn spawn_model_loaders(_controller: &SessionController, _configuration: &Configuration) {
    warn!("Built without the onnx feature, models will not be loaded");
}

fn spawn_frame_ticker(handle: SessionHandle, fps: u32) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if handle.is_closed() {
                break;
            }
            handle.frame_available();
        }
    })
}

async fn read_commands(handle: &SessionHandle) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "start" => handle.start().await?,
            "stop" => handle.stop().await?,
            "switch" => handle.switch_camera().await?,
            "toggle" => handle.toggle_mode().await?,
            "quit" => break,
            "" => {}
            other => warn!(
                "Unknown command {:?}, expected start, stop, switch, toggle or quit",
                other
            ),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let configuration = Configuration::load(args.config.as_deref())?;
    init_logging(configuration.max_log_level());

    let camera = match &args.frames {
        Some(dir) => ReplayCamera::from_dir(dir)?,
        None => ReplayCamera::blank(640, 480),
    };

    // No encoder ships with the binary; the builder disables video export without one.
    let controller = SessionController::builder(configuration.clone())
        .vision(Arc::new(PassthroughVisionProcessor::new(
            TRACKING_INPUT_SIDE,
            TRACKING_INPUT_SIDE,
        )))
        .camera(Box::new(camera))
        .view(Box::new(LogView::default()))
        .presenter(Box::new(JsonLinePresenter::new(std::io::stdout())))
        .build()?;

    spawn_model_loaders(&controller, &configuration);

    let handle = controller.handle();
    let session = tokio::spawn(controller.run());
    let ticker = spawn_frame_ticker(handle.clone(), args.fps);

    info!("Ready: type start, stop, switch, toggle or quit");
    let commands = read_commands(&handle).await;

    handle.shutdown().await?;
    session
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    ticker.abort();
    commands
}
