//! Persisted key/value store.
//!
//! Typed get/set with caller-supplied defaults, backed by a JSON file. A store
//! without a path lives in memory only (headless runs, tests).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const KEY_HIGH_SCORE: &str = "HighScore";
pub const KEY_MASTER_VOLUME: &str = "MasterVolume";
pub const KEY_MUSIC_VOLUME: &str = "MusicVolume";
pub const KEY_SFX_VOLUME: &str = "SFXVolume";
pub const KEY_VIBRATION: &str = "Vibration";
pub const KEY_PLANE_VISUALIZATION: &str = "PlaneVisualization";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

#[derive(Resource, Debug, Default)]
pub struct KeyValueStore {
    values: BTreeMap<String, StoredValue>,
    path: Option<PathBuf>,
    dirty: bool,
}

impl KeyValueStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading preferences from {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing preferences in {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { values, path: Some(path), dirty: false })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(StoredValue::Int(v)) => *v,
            _ => default,
        }
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.values.get(key) {
            Some(StoredValue::Float(v)) => *v as f32,
            Some(StoredValue::Int(v)) => *v as f32,
            _ => default,
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(StoredValue::Bool(v)) => *v,
            _ => default,
        }
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, StoredValue::Int(value));
    }

    pub fn set_float(&mut self, key: &str, value: f32) {
        self.set(key, StoredValue::Float(value as f64));
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, StoredValue::Bool(value));
    }

    fn set(&mut self, key: &str, value: StoredValue) {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_owned(), value);
            self.dirty = true;
        }
    }

    /// Write pending changes to disk. In-memory stores just clear the dirty flag.
    pub fn save(&mut self) -> anyhow::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(path) = &self.path {
            let text = serde_json::to_string_pretty(&self.values)?;
            fs::write(path, text)
                .with_context(|| format!("writing preferences to {}", path.display()))?;
        }
        self.dirty = false;
        Ok(())
    }
}

/// Player preferences, mirrored from the store at startup.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Preferences {
    pub master_volume: f32,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub vibration: bool,
    pub plane_visualization: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.7,
            sfx_volume: 0.8,
            vibration: true,
            plane_visualization: true,
        }
    }
}

impl Preferences {
    pub fn load(store: &KeyValueStore) -> Self {
        let d = Self::default();
        Self {
            master_volume: store.get_float(KEY_MASTER_VOLUME, d.master_volume).clamp(0.0, 1.0),
            music_volume: store.get_float(KEY_MUSIC_VOLUME, d.music_volume).clamp(0.0, 1.0),
            sfx_volume: store.get_float(KEY_SFX_VOLUME, d.sfx_volume).clamp(0.0, 1.0),
            vibration: store.get_bool(KEY_VIBRATION, d.vibration),
            plane_visualization: store.get_bool(KEY_PLANE_VISUALIZATION, d.plane_visualization),
        }
    }

    pub fn write_to(&self, store: &mut KeyValueStore) {
        store.set_float(KEY_MASTER_VOLUME, self.master_volume);
        store.set_float(KEY_MUSIC_VOLUME, self.music_volume);
        store.set_float(KEY_SFX_VOLUME, self.sfx_volume);
        store.set_bool(KEY_VIBRATION, self.vibration);
        store.set_bool(KEY_PLANE_VISUALIZATION, self.plane_visualization);
    }

    pub fn effective_music(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    pub fn effective_sfx(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<KeyValueStore>();
    let prefs = Preferences::load(app.world().resource::<KeyValueStore>());
    app.insert_resource(prefs);
}
