use clap::Parser;
use log::*;
#[cfg(debug_assertions)]
use log4rs::append::console::ConsoleAppender;
use log4rs::{
    append::{
        console::Target,
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use scoreboard_common::game_snapshot::GameSnapshot;
use segment_drawing::{drawing::draw_panels, panel::SimPanel};
use std::path::PathBuf;
use tokio::{
    io::AsyncReadExt,
    sync::mpsc::{self, error::TryRecvError},
    time::{Duration, Instant, MissedTickBehavior, interval},
};

mod config;
mod input;
mod panel_view;
mod scoreboard_manager;
mod sound_controller;

use config::Config;
use input::ScoreboardInput;
use scoreboard_manager::ScoreboardManager;
use sound_controller::SoundController;

const APP_NAME: &str = "scoreboard";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,

    #[clap(long, short)]
    /// Render the simulated LED panel in the terminal instead of a status line
    panel: bool,

    #[clap(long)]
    /// Directory within which log files will be placed, default is platform dependent
    log_location: Option<PathBuf>,

    #[clap(long, default_value = "5000000")]
    /// Max size in bytes that a log file is allowed to reach before being rolled over
    log_max_file_size: u64,

    #[clap(long, default_value = "3")]
    /// Number of archived logs to keep
    num_old_logs: u32,

    #[clap(long)]
    /// Overwrite the config file with the defaults
    reset_config: bool,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_base_path = args.log_location.unwrap_or_else(|| {
        let mut path = directories::BaseDirs::new()
            .expect("Could not find a directory to store logs")
            .data_local_dir()
            .to_path_buf();
        path.push("scoreboard-logs");
        path
    });
    let mut log_path = log_base_path.clone();
    let mut archived_log_path = log_base_path.clone();
    log_path.push(format!("{APP_NAME}-log.txt"));
    archived_log_path.push(format!("{APP_NAME}-log-{{}}.txt.gz"));

    #[cfg(debug_assertions)]
    println!("Log path: {}", log_path.display());

    // Only log to the console in debug mode
    #[cfg(debug_assertions)]
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    // Setup the file log roller
    let roller = FixedWindowRoller::builder()
        .build(
            archived_log_path.as_os_str().to_str().unwrap(),
            args.num_old_logs,
        )
        .unwrap();
    let file_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(args.log_max_file_size)),
        Box::new(roller),
    );
    let file_appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("[{d} {l:5} {M}] {m}{n}")))
        .build(log_path, Box::new(file_policy))
        .unwrap();

    // Setup the logging from all locations to use `LevelFilter::Error`
    let root = Root::builder().appender("file_appender");
    #[cfg(debug_assertions)]
    let root = root.appender("console");
    let root = root.build(LevelFilter::Error);

    // Setup the top level logging config
    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file_appender", Box::new(file_appender)));

    #[cfg(debug_assertions)]
    let log_config = log_config.appender(Appender::builder().build("console", Box::new(console)));

    let log_config = log_config
        .logger(Logger::builder().build(APP_NAME, log_level))
        .build(root)
        .unwrap();

    log4rs::init_config(log_config).unwrap();
    log_panics::init();

    info!(
        "Reading config file from {:?}",
        confy::get_configuration_file_path(APP_NAME, None).unwrap()
    );

    if args.reset_config {
        warn!("Resetting the config file to the defaults");
        confy::store(APP_NAME, None, Config::default())?;
    }

    let config: Config = match confy::load(APP_NAME, None) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file, overwriting with default. Error: {e}");
            let config = Config::default();
            confy::store(APP_NAME, None, &config).unwrap();
            config
        }
    };

    info!("Starting Scoreboard");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config, args.panel))
}

async fn run(config: Config, panel: bool) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut manager = ScoreboardManager::new(config.game.clone());
    let mut sound = SoundController::new(config.sound.clone());

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_stdin(input_tx));

    // The frame cadence only paces rendering; the clocks are exact
    // regardless of the rate chosen here
    let frame_period = Duration::from_secs(1) / config.hardware.target_fps.max(1);
    let mut frames = interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_snapshot: Option<GameSnapshot> = None;

    loop {
        frames.tick().await;
        let now = Instant::now();

        loop {
            match input_rx.try_recv() {
                Ok(byte) => {
                    if let Some(input) = ScoreboardInput::from_byte(byte) {
                        if let Err(e) = manager.handle_input(input, now) {
                            debug!("Input {input:?} rejected: {e}");
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("Input stream closed, exiting");
                    return Ok(());
                }
            }
        }

        manager.update(now)?;
        let snapshot = manager
            .generate_snapshot(now)
            .ok_or("Clock reading failed")?;

        sound.set_buzzer(manager.buzzer_should_sound(now));

        if panel {
            let mut frame = SimPanel::new();
            draw_panels(&mut frame, &snapshot)?;
            print!("\x1b[2J\x1b[H{}", panel_view::render(&frame));
        } else if last_snapshot.as_ref() != Some(&snapshot) {
            println!(
                "{} main | {} shot | {} | {}",
                snapshot.main_clock.time, snapshot.shot_clock.time, snapshot.mode, snapshot.scores
            );
            last_snapshot = Some(snapshot);
        }
    }
}

async fn read_stdin(tx: mpsc::UnboundedSender<u8>) {
    let mut stdin = tokio::io::stdin();
    let mut buf = [0u8; 64];
    loop {
        match stdin.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                for &byte in &buf[..n] {
                    if tx.send(byte).is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                error!("Error reading operator input: {e}");
                break;
            }
        }
    }
}
