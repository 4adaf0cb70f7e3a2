use std::{collections::HashMap, fs, time::Duration};

use checkout::CheckoutDelays;

#[derive(Debug, Clone)]
pub struct Settings {
    pub ledger_url: String,
    pub print_render_delay_ms: u64,
    pub print_dismiss_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger_url: "http://127.0.0.1:8787/".into(),
            print_render_delay_ms: 500,
            print_dismiss_delay_ms: 500,
        }
    }
}

impl Settings {
    pub fn delays(&self) -> CheckoutDelays {
        CheckoutDelays {
            print_render: Duration::from_millis(self.print_render_delay_ms),
            print_dismiss: Duration::from_millis(self.print_dismiss_delay_ms),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("pos.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("LEDGER_URL") {
        settings.ledger_url = v;
    }
    if let Ok(v) = std::env::var("APP__LEDGER_URL") {
        settings.ledger_url = v;
    }

    if let Ok(v) = std::env::var("APP__PRINT_RENDER_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.print_render_delay_ms = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__PRINT_DISMISS_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.print_dismiss_delay_ms = parsed;
        }
    }

    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("ledger_url").and_then(|v| v.as_str()) {
        settings.ledger_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("print_render_delay_ms")
        .and_then(|v| v.as_integer())
    {
        settings.print_render_delay_ms = v.max(0) as u64;
    }
    if let Some(v) = file_cfg
        .get("print_dismiss_delay_ms")
        .and_then(|v| v.as_integer())
    {
        settings.print_dismiss_delay_ms = v.max(0) as u64;
    }
}
