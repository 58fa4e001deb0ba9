//! Runtime configuration from environment variables.

use std::path::PathBuf;

use crate::consts::FPS;
use crate::error::GameError;

pub const ENV_FPS: &str = "SANTA_SLED_FPS";
pub const ENV_SOUND: &str = "SANTA_SLED_SOUND";
pub const ENV_LOG: &str = "SANTA_SLED_LOG";

pub const MAX_FPS: u32 = 240;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub fps: u32,
    /// Ring the terminal bell for sound cues.
    pub sound: bool,
    /// Where log output goes when `RUST_LOG` is set.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: FPS,
            sound: true,
            log_file: PathBuf::from("santa_sled.log"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, GameError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GameError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_FPS) {
            config.fps = match value.trim().parse::<u32>() {
                Ok(fps) if (1..=MAX_FPS).contains(&fps) => fps,
                Ok(_) => {
                    return Err(GameError::Config {
                        key: ENV_FPS,
                        value,
                        reason: "must be between 1 and 240",
                    })
                }
                Err(_) => {
                    return Err(GameError::Config {
                        key: ENV_FPS,
                        value,
                        reason: "not a number",
                    })
                }
            };
        }

        if let Some(value) = lookup(ENV_SOUND) {
            config.sound = match value.trim().to_lowercase().as_str() {
                "on" | "1" | "true" | "yes" => true,
                "off" | "0" | "false" | "no" => false,
                _ => {
                    return Err(GameError::Config {
                        key: ENV_SOUND,
                        value,
                        reason: "expected on or off",
                    })
                }
            };
        }

        if let Some(value) = lookup(ENV_LOG) {
            if value.trim().is_empty() {
                return Err(GameError::Config {
                    key: ENV_LOG,
                    value,
                    reason: "empty path",
                });
            }
            config.log_file = PathBuf::from(value);
        }

        Ok(config)
    }
}
