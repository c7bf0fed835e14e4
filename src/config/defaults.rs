pub(crate) fn default_api_base_url() -> String {
    "https://qiraat-api-v2-production.up.railway.app/api".to_string()
}

pub(crate) fn default_document_id() -> u32 {
    1
}

pub(crate) fn default_request_timeout_secs() -> f32 {
    15.0
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_start_page() -> u32 {
    19
}

pub(crate) fn default_prefetch_radius() -> u32 {
    5
}

pub(crate) fn default_viewport_width() -> f32 {
    390.0
}

pub(crate) fn default_drawer_width() -> f32 {
    260.0
}

pub(crate) fn default_drawer_edge_band() -> f32 {
    24.0
}

pub(crate) fn default_drawer_open_ms() -> u64 {
    220
}

pub(crate) fn default_drawer_close_ms() -> u64 {
    200
}

pub(crate) fn default_drawer_open_position() -> f32 {
    0.4
}

pub(crate) fn default_drawer_open_flick_velocity() -> f32 {
    1000.0
}

pub(crate) fn default_drawer_close_flick_velocity() -> f32 {
    500.0
}

pub(crate) fn default_drawer_snap_threshold() -> f32 {
    0.5
}

pub(crate) fn default_watchdog_interval_ms() -> u64 {
    250
}

pub(crate) fn default_swipe_max_translate() -> f32 {
    0.8
}

pub(crate) fn default_swipe_commit_threshold() -> f32 {
    0.5
}

pub(crate) fn default_swipe_flick_velocity() -> f32 {
    500.0
}

pub(crate) fn default_swipe_commit_ms() -> u64 {
    180
}

pub(crate) fn default_swipe_reentry_guard_ms() -> u64 {
    300
}

pub(crate) fn default_spring_stiffness() -> f32 {
    170.0
}

pub(crate) fn default_spring_damping() -> f32 {
    26.0
}

pub(crate) fn default_frame_interval_ms() -> u64 {
    16
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
