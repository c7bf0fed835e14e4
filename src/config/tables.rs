use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

/// On-disk layout of `config.toml`, grouped by concern.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    service: ServiceConfig,
    #[serde(default)]
    paging: PagingConfig,
    #[serde(default)]
    drawer: DrawerTable,
    #[serde(default)]
    swipe: SwipeTable,
    #[serde(default)]
    animation: AnimationConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            api_base_url: tables.service.api_base_url,
            document_id: tables.service.document_id,
            request_timeout_secs: tables.service.request_timeout_secs,
            cache_dir: tables.service.cache_dir,
            start_page: tables.paging.start_page,
            prefetch_radius: tables.paging.prefetch_radius,
            viewport_width: tables.paging.viewport_width,
            drawer_width: tables.drawer.width,
            drawer_edge_band: tables.drawer.edge_band,
            drawer_open_ms: tables.drawer.open_ms,
            drawer_close_ms: tables.drawer.close_ms,
            drawer_open_position: tables.drawer.open_position,
            drawer_open_flick_velocity: tables.drawer.open_flick_velocity,
            drawer_close_flick_velocity: tables.drawer.close_flick_velocity,
            drawer_snap_threshold: tables.drawer.snap_threshold,
            watchdog_interval_ms: tables.drawer.watchdog_interval_ms,
            swipe_max_translate: tables.swipe.max_translate,
            swipe_commit_threshold: tables.swipe.commit_threshold,
            swipe_flick_velocity: tables.swipe.flick_velocity,
            swipe_commit_ms: tables.swipe.commit_ms,
            swipe_reentry_guard_ms: tables.swipe.reentry_guard_ms,
            spring_stiffness: tables.animation.spring_stiffness,
            spring_damping: tables.animation.spring_damping,
            frame_interval_ms: tables.animation.frame_interval_ms,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            service: ServiceConfig {
                api_base_url: config.api_base_url.clone(),
                document_id: config.document_id,
                request_timeout_secs: config.request_timeout_secs,
                cache_dir: config.cache_dir.clone(),
            },
            paging: PagingConfig {
                start_page: config.start_page,
                prefetch_radius: config.prefetch_radius,
                viewport_width: config.viewport_width,
            },
            drawer: DrawerTable {
                width: config.drawer_width,
                edge_band: config.drawer_edge_band,
                open_ms: config.drawer_open_ms,
                close_ms: config.drawer_close_ms,
                open_position: config.drawer_open_position,
                open_flick_velocity: config.drawer_open_flick_velocity,
                close_flick_velocity: config.drawer_close_flick_velocity,
                snap_threshold: config.drawer_snap_threshold,
                watchdog_interval_ms: config.watchdog_interval_ms,
            },
            swipe: SwipeTable {
                max_translate: config.swipe_max_translate,
                commit_threshold: config.swipe_commit_threshold,
                flick_velocity: config.swipe_flick_velocity,
                commit_ms: config.swipe_commit_ms,
                reentry_guard_ms: config.swipe_reentry_guard_ms,
            },
            animation: AnimationConfig {
                spring_stiffness: config.spring_stiffness,
                spring_damping: config.spring_damping,
                frame_interval_ms: config.frame_interval_ms,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ServiceConfig {
    #[serde(default = "defaults::default_api_base_url")]
    api_base_url: String,
    #[serde(default = "defaults::default_document_id")]
    document_id: u32,
    #[serde(default = "defaults::default_request_timeout_secs")]
    request_timeout_secs: f32,
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            api_base_url: defaults::default_api_base_url(),
            document_id: defaults::default_document_id(),
            request_timeout_secs: defaults::default_request_timeout_secs(),
            cache_dir: defaults::default_cache_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PagingConfig {
    #[serde(default = "defaults::default_start_page")]
    start_page: u32,
    #[serde(default = "defaults::default_prefetch_radius")]
    prefetch_radius: u32,
    #[serde(default = "defaults::default_viewport_width")]
    viewport_width: f32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            start_page: defaults::default_start_page(),
            prefetch_radius: defaults::default_prefetch_radius(),
            viewport_width: defaults::default_viewport_width(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct DrawerTable {
    #[serde(default = "defaults::default_drawer_width")]
    width: f32,
    #[serde(default = "defaults::default_drawer_edge_band")]
    edge_band: f32,
    #[serde(default = "defaults::default_drawer_open_ms")]
    open_ms: u64,
    #[serde(default = "defaults::default_drawer_close_ms")]
    close_ms: u64,
    #[serde(default = "defaults::default_drawer_open_position")]
    open_position: f32,
    #[serde(default = "defaults::default_drawer_open_flick_velocity")]
    open_flick_velocity: f32,
    #[serde(default = "defaults::default_drawer_close_flick_velocity")]
    close_flick_velocity: f32,
    #[serde(default = "defaults::default_drawer_snap_threshold")]
    snap_threshold: f32,
    #[serde(default = "defaults::default_watchdog_interval_ms")]
    watchdog_interval_ms: u64,
}

impl Default for DrawerTable {
    fn default() -> Self {
        DrawerTable {
            width: defaults::default_drawer_width(),
            edge_band: defaults::default_drawer_edge_band(),
            open_ms: defaults::default_drawer_open_ms(),
            close_ms: defaults::default_drawer_close_ms(),
            open_position: defaults::default_drawer_open_position(),
            open_flick_velocity: defaults::default_drawer_open_flick_velocity(),
            close_flick_velocity: defaults::default_drawer_close_flick_velocity(),
            snap_threshold: defaults::default_drawer_snap_threshold(),
            watchdog_interval_ms: defaults::default_watchdog_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct SwipeTable {
    #[serde(default = "defaults::default_swipe_max_translate")]
    max_translate: f32,
    #[serde(default = "defaults::default_swipe_commit_threshold")]
    commit_threshold: f32,
    #[serde(default = "defaults::default_swipe_flick_velocity")]
    flick_velocity: f32,
    #[serde(default = "defaults::default_swipe_commit_ms")]
    commit_ms: u64,
    #[serde(default = "defaults::default_swipe_reentry_guard_ms")]
    reentry_guard_ms: u64,
}

impl Default for SwipeTable {
    fn default() -> Self {
        SwipeTable {
            max_translate: defaults::default_swipe_max_translate(),
            commit_threshold: defaults::default_swipe_commit_threshold(),
            flick_velocity: defaults::default_swipe_flick_velocity(),
            commit_ms: defaults::default_swipe_commit_ms(),
            reentry_guard_ms: defaults::default_swipe_reentry_guard_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AnimationConfig {
    #[serde(default = "defaults::default_spring_stiffness")]
    spring_stiffness: f32,
    #[serde(default = "defaults::default_spring_damping")]
    spring_damping: f32,
    #[serde(default = "defaults::default_frame_interval_ms")]
    frame_interval_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            spring_stiffness: defaults::default_spring_stiffness(),
            spring_damping: defaults::default_spring_damping(),
            frame_interval_ms: defaults::default_frame_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
