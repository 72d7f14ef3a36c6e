use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::objective_guidance;
use crate::llm::gemini;
use crate::pipeline::analysis::DesignSystemAnalysis;
use crate::pipeline::coerce::{f64_field, str_field};

static JSON_ARRAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("valid array span regex"));

pub const MAX_TEXT_ELEMENTS: usize = 3;

const FONT_SIZE_DEFAULTS: [f64; 3] = [130.0, 90.0, 60.0];
const BASE_Y: f64 = 80.0;
const LINE_Y_STEP: f64 = 180.0;

const BASE_X_RIGHT: f64 = 700.0;
const BASE_X_CENTER: f64 = 300.0;
const BASE_X_LEFT: f64 = 60.0;

const DEFAULT_OVERLAY_FONT: &str = "Anton";
const DEFAULT_FILL: &str = "#FFFFFF";
const DEFAULT_STROKE: &str = "#000000";
const DEFAULT_STROKE_WIDTH: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_family: String,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub font_weight: String,
}

#[derive(Debug, Clone)]
struct OverlayStyle {
    base_x: f64,
    font: String,
    fill: String,
    stroke: String,
    stroke_width: f64,
    line_count: u8,
    uppercase: bool,
    text_zone: String,
}

impl OverlayStyle {
    fn from_analysis(analysis: &DesignSystemAnalysis) -> Self {
        let typography = &analysis.typography;
        let text_zone = analysis
            .layout
            .text_zone
            .clone()
            .unwrap_or_else(|| "left".to_string());

        let base_x = if text_zone.contains("right") {
            BASE_X_RIGHT
        } else if text_zone.contains("center") {
            BASE_X_CENTER
        } else {
            BASE_X_LEFT
        };

        let stroke_width = if typography.has_stroke.unwrap_or(true) {
            DEFAULT_STROKE_WIDTH
        } else {
            0.0
        };

        OverlayStyle {
            base_x,
            font: typography
                .headline_font
                .clone()
                .unwrap_or_else(|| DEFAULT_OVERLAY_FONT.to_string()),
            fill: typography
                .text_colors
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_FILL.to_string()),
            stroke: typography
                .stroke_colors
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_STROKE.to_string()),
            stroke_width,
            line_count: typography.line_count.unwrap_or(2).clamp(1, 3),
            uppercase: typography
                .text_case
                .as_deref()
                .unwrap_or("UPPERCASE")
                .contains("UPPER"),
            text_zone,
        }
    }
}

fn build_copy_prompt(objective: &str, brief: &str, style: &OverlayStyle) -> String {
    let guidance = objective_guidance(objective);
    let brief = if brief.trim().is_empty() {
        "(sem instrução adicional)"
    } else {
        brief
    };
    let case_hint = if style.uppercase {
        "EM CAIXA ALTA (UPPERCASE)"
    } else {
        "em capitalização mista"
    };

    format!(
        "Você é especialista em copywriting viral para thumbnails de YouTube.\n\
\n\
Objetivo da thumbnail: {guidance}\n\
Instrução do criador: {brief}\n\
Número de linhas de texto: {line_count}\n\
Estilo: textos {case_hint}, curtos, chocantes, que geram clique\n\
\n\
Crie exatamente {line_count} texto(s) impactante(s) para esta thumbnail.\n\
Canvas: 1280x720 pixels. Zona de texto: {zone} (x base: {base_x}px).\n\
\n\
LINHA 1 (título principal): maior, fonte ~120-140px, y~80\n\
LINHA 2 (subtítulo, se houver): menor, fonte ~75-90px, y~260\n\
LINHA 3 (complemento, se houver): menor ainda, fonte ~60px, y~380\n\
\n\
Retorne APENAS JSON válido, sem markdown:\n\
[{{\"id\":\"t0\",\"text\":\"TEXTO\",\"x\":{base_x},\"y\":80,\"fontSize\":130,\"fontFamily\":\"{font}\",\"fill\":\"{fill}\",\"stroke\":\"{stroke}\",\"strokeWidth\":{stroke_width},\"fontWeight\":\"bold\"}}]\n\
\n\
Máximo 4 palavras por linha. Sem pontuação desnecessária.",
        line_count = style.line_count,
        zone = style.text_zone,
        base_x = style.base_x,
        font = style.font,
        fill = style.fill,
        stroke = style.stroke,
        stroke_width = style.stroke_width,
    )
}

fn parse_text_elements(raw: &str, style: &OverlayStyle) -> Vec<TextElement> {
    let Some(found) = JSON_ARRAY_RE.find(raw) else {
        debug!("No JSON array found in text element response");
        return Vec::new();
    };

    let items = match serde_json::from_str::<Value>(found.as_str()) {
        Ok(Value::Array(items)) => items,
        Ok(_) => return Vec::new(),
        Err(err) => {
            warn!("Failed to parse text element JSON: {err}");
            return Vec::new();
        }
    };

    items
        .iter()
        .take(MAX_TEXT_ELEMENTS)
        .enumerate()
        .map(|(index, element)| TextElement {
            id: str_field(element, "id").unwrap_or_else(|| format!("t{index}")),
            text: str_field(element, "text").unwrap_or_default(),
            x: f64_field(element, "x").unwrap_or(style.base_x),
            y: f64_field(element, "y").unwrap_or(BASE_Y + index as f64 * LINE_Y_STEP),
            font_size: f64_field(element, "fontSize").unwrap_or(FONT_SIZE_DEFAULTS[index]),
            font_family: str_field(element, "fontFamily").unwrap_or_else(|| style.font.clone()),
            fill: str_field(element, "fill").unwrap_or_else(|| style.fill.clone()),
            stroke: str_field(element, "stroke").unwrap_or_else(|| style.stroke.clone()),
            stroke_width: f64_field(element, "strokeWidth").unwrap_or(style.stroke_width),
            font_weight: str_field(element, "fontWeight").unwrap_or_else(|| "bold".to_string()),
        })
        .collect()
}

pub async fn generate_text_elements(
    objective: &str,
    brief: &str,
    analysis: &DesignSystemAnalysis,
) -> Vec<TextElement> {
    let style = OverlayStyle::from_analysis(analysis);
    let prompt = build_copy_prompt(objective, brief, &style);

    match gemini::call_text(&prompt).await {
        Ok(raw) => parse_text_elements(&raw, &style),
        Err(err) => {
            warn!("Text element generation failed, returning no overlays: {err}");
            Vec::new()
        }
    }
}
