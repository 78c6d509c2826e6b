//! mp3play — interactive MP3 player.
//!
//! Prompts for a file or directory, optionally shuffles a directory, then
//! plays every match in turn on the default output device.
//!
//! Environment:
//!   RUST_LOG            log filter (default: warn)
//!   MP3PLAY_MAX_FILES   directory collection limit (default 256, 0 = none)
//!   MP3PLAY_SEED        fixed shuffle seed

use std::io;
use std::process::ExitCode;

use mp3play_core::session::{self, SessionOutcome};
use mp3play_core::{Config, NativeBackend, Player};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env();

    let backend = match NativeBackend::init() {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("mp3play: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let player = Player::new(backend);
    let mut rng = config.rng();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    match session::run(&mut input, &mut out, &player, &config, &mut rng) {
        Ok(SessionOutcome::NoFiles) => ExitCode::SUCCESS,
        Ok(SessionOutcome::Played(summary)) => {
            log::info!(
                "mp3play: played {} of {} files",
                summary.completed,
                summary.attempted
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("mp3play: {}", e);
            ExitCode::FAILURE
        }
    }
}
