//! Editor tuning knobs.
//!
//! Every field has a compiled-in default from [`crate::consts`]. Native hosts
//! (the replay CLI) override fields from `SLIDECANVAS_*` environment variables;
//! browser hosts deserialize the struct from JSON instead.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    FIT_PADDING_PX, HANDLE_RADIUS_PX, NUDGE_STEP, NUDGE_STEP_LARGE, ROTATE_HANDLE_OFFSET_PX, ROTATION_SNAP_DEG,
    SNAP_THRESHOLD_PX,
};

/// Runtime configuration for one editor session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Padding subtracted from both container dimensions before fitting.
    pub fit_padding: f64,
    /// Whether smart-guide snapping runs during drags.
    pub snapping: bool,
    /// Snap distance in screen pixels.
    pub snap_threshold_px: f64,
    /// Hit slop for handles in screen pixels.
    pub handle_radius_px: f64,
    /// Rotate handle distance above the top edge in screen pixels.
    pub rotate_handle_offset_px: f64,
    /// Rotation step in degrees when shift is held.
    pub rotation_snap_deg: f64,
    /// Arrow-key nudge in logical units.
    pub nudge_step: f64,
    /// Shift + arrow-key nudge in logical units.
    pub nudge_step_large: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fit_padding: FIT_PADDING_PX,
            snapping: true,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            handle_radius_px: HANDLE_RADIUS_PX,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
            rotation_snap_deg: ROTATION_SNAP_DEG,
            nudge_step: NUDGE_STEP,
            nudge_step_large: NUDGE_STEP_LARGE,
        }
    }
}

impl EditorConfig {
    /// Build a config from process environment variables.
    ///
    /// Optional:
    /// - `SLIDECANVAS_FIT_PADDING`: default 40
    /// - `SLIDECANVAS_SNAPPING`: `true` (default) or `false`
    /// - `SLIDECANVAS_SNAP_THRESHOLD_PX`: default 6
    /// - `SLIDECANVAS_HANDLE_RADIUS_PX`: default 8
    /// - `SLIDECANVAS_ROTATE_HANDLE_OFFSET_PX`: default 24
    /// - `SLIDECANVAS_ROTATION_SNAP_DEG`: default 15
    /// - `SLIDECANVAS_NUDGE_STEP`: default 1
    /// - `SLIDECANVAS_NUDGE_STEP_LARGE`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build a config from an arbitrary key lookup. Unset or unparsable keys keep their default.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            fit_padding: parse_or(&lookup, "SLIDECANVAS_FIT_PADDING", defaults.fit_padding),
            snapping: parse_or(&lookup, "SLIDECANVAS_SNAPPING", defaults.snapping),
            snap_threshold_px: parse_or(&lookup, "SLIDECANVAS_SNAP_THRESHOLD_PX", defaults.snap_threshold_px),
            handle_radius_px: parse_or(&lookup, "SLIDECANVAS_HANDLE_RADIUS_PX", defaults.handle_radius_px),
            rotate_handle_offset_px: parse_or(
                &lookup,
                "SLIDECANVAS_ROTATE_HANDLE_OFFSET_PX",
                defaults.rotate_handle_offset_px,
            ),
            rotation_snap_deg: parse_or(&lookup, "SLIDECANVAS_ROTATION_SNAP_DEG", defaults.rotation_snap_deg),
            nudge_step: parse_or(&lookup, "SLIDECANVAS_NUDGE_STEP", defaults.nudge_step),
            nudge_step_large: parse_or(&lookup, "SLIDECANVAS_NUDGE_STEP_LARGE", defaults.nudge_step_large),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or(default),
        None => default,
    }
}
