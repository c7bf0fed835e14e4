use crate::gesture::{DrawerConfig, SwipeConfig};
use crate::model::PageNumber;
use crate::motion::SpringParams;
use serde::Deserialize;
use std::time::Duration;

/// Flat runtime configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "crate::config::defaults::default_document_id")]
    pub document_id: u32,
    #[serde(default = "crate::config::defaults::default_request_timeout_secs")]
    pub request_timeout_secs: f32,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_start_page")]
    pub start_page: u32,
    #[serde(default = "crate::config::defaults::default_prefetch_radius")]
    pub prefetch_radius: u32,
    #[serde(default = "crate::config::defaults::default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "crate::config::defaults::default_drawer_width")]
    pub drawer_width: f32,
    #[serde(default = "crate::config::defaults::default_drawer_edge_band")]
    pub drawer_edge_band: f32,
    #[serde(default = "crate::config::defaults::default_drawer_open_ms")]
    pub drawer_open_ms: u64,
    #[serde(default = "crate::config::defaults::default_drawer_close_ms")]
    pub drawer_close_ms: u64,
    #[serde(default = "crate::config::defaults::default_drawer_open_position")]
    pub drawer_open_position: f32,
    #[serde(default = "crate::config::defaults::default_drawer_open_flick_velocity")]
    pub drawer_open_flick_velocity: f32,
    #[serde(default = "crate::config::defaults::default_drawer_close_flick_velocity")]
    pub drawer_close_flick_velocity: f32,
    #[serde(default = "crate::config::defaults::default_drawer_snap_threshold")]
    pub drawer_snap_threshold: f32,
    #[serde(default = "crate::config::defaults::default_watchdog_interval_ms")]
    pub watchdog_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_swipe_max_translate")]
    pub swipe_max_translate: f32,
    #[serde(default = "crate::config::defaults::default_swipe_commit_threshold")]
    pub swipe_commit_threshold: f32,
    #[serde(default = "crate::config::defaults::default_swipe_flick_velocity")]
    pub swipe_flick_velocity: f32,
    #[serde(default = "crate::config::defaults::default_swipe_commit_ms")]
    pub swipe_commit_ms: u64,
    #[serde(default = "crate::config::defaults::default_swipe_reentry_guard_ms")]
    pub swipe_reentry_guard_ms: u64,
    #[serde(default = "crate::config::defaults::default_spring_stiffness")]
    pub spring_stiffness: f32,
    #[serde(default = "crate::config::defaults::default_spring_damping")]
    pub spring_damping: f32,
    #[serde(default = "crate::config::defaults::default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_base_url: crate::config::defaults::default_api_base_url(),
            document_id: crate::config::defaults::default_document_id(),
            request_timeout_secs: crate::config::defaults::default_request_timeout_secs(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            start_page: crate::config::defaults::default_start_page(),
            prefetch_radius: crate::config::defaults::default_prefetch_radius(),
            viewport_width: crate::config::defaults::default_viewport_width(),
            drawer_width: crate::config::defaults::default_drawer_width(),
            drawer_edge_band: crate::config::defaults::default_drawer_edge_band(),
            drawer_open_ms: crate::config::defaults::default_drawer_open_ms(),
            drawer_close_ms: crate::config::defaults::default_drawer_close_ms(),
            drawer_open_position: crate::config::defaults::default_drawer_open_position(),
            drawer_open_flick_velocity:
                crate::config::defaults::default_drawer_open_flick_velocity(),
            drawer_close_flick_velocity:
                crate::config::defaults::default_drawer_close_flick_velocity(),
            drawer_snap_threshold: crate::config::defaults::default_drawer_snap_threshold(),
            watchdog_interval_ms: crate::config::defaults::default_watchdog_interval_ms(),
            swipe_max_translate: crate::config::defaults::default_swipe_max_translate(),
            swipe_commit_threshold: crate::config::defaults::default_swipe_commit_threshold(),
            swipe_flick_velocity: crate::config::defaults::default_swipe_flick_velocity(),
            swipe_commit_ms: crate::config::defaults::default_swipe_commit_ms(),
            swipe_reentry_guard_ms: crate::config::defaults::default_swipe_reentry_guard_ms(),
            spring_stiffness: crate::config::defaults::default_spring_stiffness(),
            spring_damping: crate::config::defaults::default_spring_damping(),
            frame_interval_ms: crate::config::defaults::default_frame_interval_ms(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    /// Zero is treated as page 1.
    pub fn start_page(&self) -> PageNumber {
        PageNumber::new(i64::from(self.start_page)).unwrap_or(PageNumber::FIRST)
    }

    pub fn drawer(&self) -> DrawerConfig {
        DrawerConfig {
            width: self.drawer_width.max(1.0),
            edge_band: self.drawer_edge_band,
            open_duration: Duration::from_millis(self.drawer_open_ms),
            close_duration: Duration::from_millis(self.drawer_close_ms),
            open_position: self.drawer_open_position.clamp(0.0, 1.0),
            open_flick_velocity: self.drawer_open_flick_velocity,
            close_flick_velocity: self.drawer_close_flick_velocity,
            snap_threshold: self.drawer_snap_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn swipe(&self) -> SwipeConfig {
        SwipeConfig {
            max_translate: self.swipe_max_translate.clamp(0.0, 1.0),
            commit_threshold: self.swipe_commit_threshold,
            flick_velocity: self.swipe_flick_velocity,
            commit_duration: Duration::from_millis(self.swipe_commit_ms),
            reentry_guard: Duration::from_millis(self.swipe_reentry_guard_ms),
            edge_band: self.drawer_edge_band,
            spring: SpringParams {
                stiffness: self.spring_stiffness,
                damping: self.spring_damping,
            },
        }
    }

    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.watchdog_interval_ms.max(1))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::try_from_secs_f32(self.request_timeout_secs.max(0.1))
            .unwrap_or(Duration::from_secs(15))
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
