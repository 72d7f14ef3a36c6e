use std::env;

use anyhow::Result;
use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub gemini_api_key: String,
    pub gemini_vision_model: String,
    pub gemini_image_model: String,
    pub gemini_vision_temperature: f32,
    pub gemini_text_temperature: f32,
    pub analysis_timeout_secs: u64,
    pub synthesis_timeout_secs: u64,
    pub text_timeout_secs: u64,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            gemini_api_key: env_string("GEMINI_API_KEY", ""),
            gemini_vision_model: env_string("GEMINI_VISION_MODEL", "gemini-2.5-flash"),
            gemini_image_model: env_string("GEMINI_IMAGE_MODEL", "gemini-3-pro-image-preview"),
            gemini_vision_temperature: env_f32("GEMINI_VISION_TEMPERATURE", 0.1),
            gemini_text_temperature: env_f32("GEMINI_TEXT_TEMPERATURE", 0.8),
            analysis_timeout_secs: env_u64("ANALYSIS_TIMEOUT_SECS", 60),
            synthesis_timeout_secs: env_u64("SYNTHESIS_TIMEOUT_SECS", 180),
            text_timeout_secs: env_u64("TEXT_TIMEOUT_SECS", 30),
        })
    }
}

pub const REFERENCE_ANALYSIS_PROMPT: &str = r##"Você é um especialista em design de thumbnails virais para YouTube.

Analise esta thumbnail de referência e extraia o sistema visual completo.
Retorne APENAS JSON válido, sem markdown, sem explicações adicionais.

{
  "typography": {
    "headline_font": "família da fonte principal (ex: Impact, Arial Black, Bebas Neue)",
    "headline_weight": "bold ou normal",
    "text_case": "UPPERCASE ou Mixed Case",
    "has_stroke": true ou false,
    "stroke_thickness": "thin/medium/thick",
    "text_colors": ["#hex1", "#hex2"],
    "stroke_colors": ["#hex"],
    "line_count": número de linhas de texto visíveis,
    "text_shadow": true ou false
  },
  "layout": {
    "person_position": "left/right/center/fullwidth",
    "person_crop": "full-body/torso-up/face-close",
    "person_size": "small/medium/large/dominant",
    "text_zone": "left/right/top/bottom/center-overlay",
    "composition_type": "person-left-text-right/person-right-text-left/person-center-text-overlay/split"
  },
  "colors": {
    "background_main": "#hex ou descrição",
    "background_type": "solid/gradient/scene",
    "accent_1": "#hex",
    "accent_2": "#hex"
  },
  "atmosphere": "Descreva em 2-3 frases o clima visual."
}"##;
