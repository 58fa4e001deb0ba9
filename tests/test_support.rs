use std::collections::HashMap;
use std::path::PathBuf;

use santa_sled::audio::Audio;
use santa_sled::clock::Clock;
use santa_sled::config::*;
use santa_sled::consts::FPS;
use santa_sled::entities::Cue;
use santa_sled::GameError;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

// ── config ────────────────────────────────────────────────────────────────────

#[test]
fn config_defaults_when_unset() {
    let config = Config::from_lookup(lookup(&[])).expect("defaults");
    assert_eq!(config, Config::default());
    assert_eq!(config.fps, FPS);
    assert!(config.sound);
    assert_eq!(config.log_file, PathBuf::from("santa_sled.log"));
}

#[test]
fn config_reads_every_key() {
    let config = Config::from_lookup(lookup(&[
        (ENV_FPS, " 60 "),
        (ENV_SOUND, "OFF"),
        (ENV_LOG, "/tmp/sled.log"),
    ]))
    .expect("valid config");
    assert_eq!(config.fps, 60);
    assert!(!config.sound);
    assert_eq!(config.log_file, PathBuf::from("/tmp/sled.log"));
}

#[test]
fn config_rejects_bad_fps() {
    for bad in ["0", "241", "fast", "-5"] {
        let err = Config::from_lookup(lookup(&[(ENV_FPS, bad)])).unwrap_err();
        assert!(
            matches!(err, GameError::Config { key: ENV_FPS, .. }),
            "{bad} accepted"
        );
    }
}

#[test]
fn config_rejects_bad_sound() {
    let err = Config::from_lookup(lookup(&[(ENV_SOUND, "loud")])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid SANTA_SLED_SOUND=\"loud\": expected on or off"
    );
}

#[test]
fn config_rejects_empty_log_path() {
    let err = Config::from_lookup(lookup(&[(ENV_LOG, "  ")])).unwrap_err();
    assert!(matches!(err, GameError::Config { key: ENV_LOG, .. }));
}

#[test]
fn too_small_error_message() {
    let err = GameError::TooSmall {
        cols: 40,
        rows: 10,
        min_cols: 48,
        min_rows: 14,
    };
    assert_eq!(err.to_string(), "terminal is 40x10, need at least 48x14");
}

// ── clock ─────────────────────────────────────────────────────────────────────

#[test]
fn clock_waits_for_frame_boundary() {
    let mut clock = Clock::new(100);
    assert!((clock.frame_duration().as_secs_f64() - 0.01).abs() < 1e-6);
    let delta = clock.tick();
    assert!(delta >= 9.5, "tick returned after {delta} ms");
}

#[test]
fn clock_zero_fps_treated_as_one() {
    let clock = Clock::new(0);
    assert_eq!(clock.frame_duration().as_secs(), 1);
}

// ── audio ─────────────────────────────────────────────────────────────────────

#[test]
fn cues_ring_bell_once() {
    let audio = Audio::new(true);
    let mut out: Vec<u8> = Vec::new();
    let rang = audio
        .play(&mut out, &[Cue::Drop, Cue::Bling])
        .expect("write to vec");
    assert!(rang);
    assert_eq!(out, vec![7u8]);
}

#[test]
fn no_cues_no_bell() {
    let audio = Audio::new(true);
    let mut out: Vec<u8> = Vec::new();
    assert!(!audio.play(&mut out, &[]).expect("write to vec"));
    assert!(out.is_empty());
}

#[test]
fn disabled_sound_stays_silent() {
    let audio = Audio::new(false);
    let mut out: Vec<u8> = Vec::new();
    assert!(!audio.play(&mut out, &[Cue::Bling]).expect("write to vec"));
    assert!(out.is_empty());
}

#[test]
fn music_flag_follows_start_and_stop() {
    let mut audio = Audio::new(true);
    assert!(!audio.is_music_playing());
    audio.start_music();
    assert!(audio.is_music_playing());
    audio.stop_music();
    assert!(!audio.is_music_playing());
}
