//! Sound output.
//!
//! A terminal has a single sound: the bell.  Cues raised in a frame ring it
//! at most once; the background music loop is tracked but silent.

use std::io::{self, Write};

use crossterm::{style::Print, QueueableCommand};
use log::{debug, info};

use crate::entities::Cue;

const BELL: char = '\u{7}';

/// Mixer volumes the cues were balanced at.
pub fn volume(cue: Cue) -> f32 {
    match cue {
        Cue::Drop | Cue::Bling => 0.25,
    }
}

pub const MUSIC_VOLUME: f32 = 0.1;

#[derive(Debug)]
pub struct Audio {
    enabled: bool,
    music: bool,
}

impl Audio {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            music: false,
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music
    }

    pub fn start_music(&mut self) {
        info!("music loop started (volume {MUSIC_VOLUME})");
        self.music = true;
    }

    pub fn stop_music(&mut self) {
        info!("music loop stopped");
        self.music = false;
    }

    /// Queue the sounds for one frame.  Returns whether the bell rang.
    pub fn play<W: Write>(&self, out: &mut W, cues: &[Cue]) -> io::Result<bool> {
        if cues.is_empty() {
            return Ok(false);
        }
        debug!("cues {:?}", cues);
        let audible = cues.iter().any(|&cue| volume(cue) > 0.0);
        if !self.enabled || !audible {
            return Ok(false);
        }
        out.queue(Print(BELL))?;
        Ok(true)
    }
}
