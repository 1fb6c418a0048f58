use std::fmt::Write as _;

use clap::ValueEnum;
use phonelock_sync::{ConnectionState, SyncState};

use crate::config::AppConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    #[value(name = "25")]
    Short,
    #[value(name = "45")]
    Medium,
    #[value(name = "60")]
    Long,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Short, Preset::Medium, Preset::Long];

    pub fn minutes(self) -> u32 {
        match self {
            Preset::Short => 25,
            Preset::Medium => 45,
            Preset::Long => 60,
        }
    }

    pub fn label(self) -> String {
        format!("{} min", self.minutes())
    }
}

/// `MM:SS`; minutes keep counting past 60.
pub fn format_time(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

pub fn connection_label(connection: ConnectionState) -> &'static str {
    match connection {
        ConnectionState::Connected => "Connected",
        ConnectionState::Error => "Disconnected",
        ConnectionState::Connecting => "Connecting…",
    }
}

fn connection_dot(connection: ConnectionState) -> char {
    match connection {
        ConnectionState::Connected => '●',
        ConnectionState::Error => '✕',
        ConnectionState::Connecting => '○',
    }
}

/// Text rendering of the lock screen for one state snapshot.
pub fn card(state: &SyncState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "PhoneLock  {} {}",
        connection_dot(state.connection),
        connection_label(state.connection)
    );

    match state.status {
        Some(status) if status.locked => {
            let _ = writeln!(out, "🔒 LOCKED");
            let _ = writeln!(
                out,
                "   {} remaining",
                format_time(status.remaining_seconds)
            );
        }
        _ => {
            let _ = writeln!(out, "🔓 UNLOCKED");
            let _ = writeln!(out, "   Choose a duration and start a session.");
        }
    }

    if state.is_starting {
        let _ = writeln!(out, "   Starting…");
    }
    if state.is_stopping {
        let _ = writeln!(out, "   Stopping…");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "⚠  {error}");
    }
    out
}

const HOW_TO_CONNECT: [&str; 3] = [
    "Make sure this machine and the Raspberry Pi are on the same network.",
    "On the Pi, run `hostname -I` to get its local IP address.",
    "Set PHONELOCK_BASE_URL (or pass --base-url) to http://<PI_IP>:<PORT>.",
];

const ENDPOINTS: [(&str, &str, &str, Option<&str>); 3] = [
    (
        "POST",
        "/session/start",
        "Starts a session and physically locks the device.",
        Some(r#"Body: { "minutes": number }"#),
    ),
    (
        "GET",
        "/session/status",
        "Returns the current lock state and seconds remaining.",
        None,
    ),
    (
        "POST",
        "/session/stop",
        "Unlocks the device immediately.",
        None,
    ),
];

/// Configuration and help text shown by `phonelock info`.
pub fn info(config: &AppConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CONFIGURATION");
    let _ = writeln!(out, "  Pi API Base URL   {}", config.client.base_url());
    let _ = writeln!(
        out,
        "  Poll Interval     {} ms",
        config.sync.poll_interval.as_millis()
    );
    let _ = writeln!(
        out,
        "  Fetch Timeout     {} ms",
        config.client.timeout().as_millis()
    );
    let presets: Vec<String> = Preset::ALL.iter().map(|preset| preset.label()).collect();
    let _ = writeln!(out, "  Presets           {}", presets.join(", "));

    let _ = writeln!(out);
    let _ = writeln!(out, "HOW TO CONNECT");
    for (index, step) in HOW_TO_CONNECT.iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", index + 1);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "API ENDPOINTS");
    for (method, path, description, body) in ENDPOINTS {
        let _ = writeln!(out, "  {method:<5} {path}");
        let _ = writeln!(out, "        {description}");
        if let Some(body) = body {
            let _ = writeln!(out, "        {body}");
        }
    }
    out
}
