use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::REFERENCE_ANALYSIS_PROMPT;
use crate::llm::gemini;
use crate::llm::media::ImageFile;
use crate::pipeline::coerce::{bool_field, int_field, str_field, string_list};

// Responses often wrap the JSON object in narration; take the widest brace span.
static JSON_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid object span regex"));

pub const MIN_LINE_COUNT: i64 = 1;
pub const MAX_LINE_COUNT: i64 = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DesignSystemAnalysis {
    pub typography: Typography,
    pub layout: Layout,
    pub colors: ColorScheme,
    pub atmosphere: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Typography {
    pub headline_font: Option<String>,
    pub headline_weight: Option<String>,
    pub text_case: Option<String>,
    pub has_stroke: Option<bool>,
    pub stroke_thickness: Option<String>,
    pub text_colors: Vec<String>,
    pub stroke_colors: Vec<String>,
    pub line_count: Option<u8>,
    pub text_shadow: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub person_position: Option<String>,
    pub person_crop: Option<String>,
    pub person_size: Option<String>,
    pub text_zone: Option<String>,
    pub composition_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorScheme {
    pub background_main: Option<String>,
    pub background_type: Option<String>,
    pub accent_1: Option<String>,
    pub accent_2: Option<String>,
}

impl Typography {
    fn from_value(value: &Value) -> Self {
        Typography {
            headline_font: str_field(value, "headline_font"),
            headline_weight: str_field(value, "headline_weight"),
            text_case: str_field(value, "text_case"),
            has_stroke: bool_field(value, "has_stroke"),
            stroke_thickness: str_field(value, "stroke_thickness"),
            text_colors: string_list(value, "text_colors"),
            stroke_colors: string_list(value, "stroke_colors"),
            line_count: int_field(value, "line_count")
                .map(|count| count.clamp(MIN_LINE_COUNT, MAX_LINE_COUNT) as u8),
            text_shadow: bool_field(value, "text_shadow"),
        }
    }
}

impl Layout {
    fn from_value(value: &Value) -> Self {
        Layout {
            person_position: str_field(value, "person_position"),
            person_crop: str_field(value, "person_crop"),
            person_size: str_field(value, "person_size"),
            text_zone: str_field(value, "text_zone"),
            composition_type: str_field(value, "composition_type"),
        }
    }
}

impl ColorScheme {
    fn from_value(value: &Value) -> Self {
        ColorScheme {
            background_main: str_field(value, "background_main"),
            background_type: str_field(value, "background_type"),
            accent_1: str_field(value, "accent_1"),
            accent_2: str_field(value, "accent_2"),
        }
    }
}

impl DesignSystemAnalysis {
    pub fn from_value(value: &Value) -> Self {
        DesignSystemAnalysis {
            typography: value
                .get("typography")
                .map(Typography::from_value)
                .unwrap_or_default(),
            layout: value
                .get("layout")
                .map(Layout::from_value)
                .unwrap_or_default(),
            colors: value
                .get("colors")
                .map(ColorScheme::from_value)
                .unwrap_or_default(),
            atmosphere: str_field(value, "atmosphere"),
        }
    }
}

pub fn parse_design_system(text: &str) -> DesignSystemAnalysis {
    let Some(found) = JSON_OBJECT_RE.find(text) else {
        debug!("No JSON object found in analysis response");
        return DesignSystemAnalysis::default();
    };

    match serde_json::from_str::<Value>(found.as_str()) {
        Ok(value) => DesignSystemAnalysis::from_value(&value),
        Err(err) => {
            warn!("Failed to parse design system JSON: {err}");
            DesignSystemAnalysis::default()
        }
    }
}

pub async fn analyze_reference(reference: &ImageFile) -> DesignSystemAnalysis {
    match gemini::call_vision(REFERENCE_ANALYSIS_PROMPT, reference).await {
        Ok(text) => parse_design_system(&text),
        Err(err) => {
            warn!("Reference analysis failed, continuing without a design system: {err}");
            DesignSystemAnalysis::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALYSIS_JSON: &str = r##"{
        "typography": {
            "headline_font": "Bebas Neue",
            "headline_weight": "bold",
            "text_case": "UPPERCASE",
            "has_stroke": true,
            "stroke_thickness": "thick",
            "text_colors": ["#FFD700", "#FFFFFF"],
            "stroke_colors": ["#000000"],
            "line_count": 2,
            "text_shadow": false
        },
        "layout": {
            "person_position": "right",
            "person_crop": "torso-up",
            "person_size": "large",
            "text_zone": "left",
            "composition_type": "person-right-text-left"
        },
        "colors": {
            "background_main": "#101020",
            "background_type": "gradient",
            "accent_1": "#FF0000",
            "accent_2": "#00FF00"
        },
        "atmosphere": "Alto contraste e urgência."
    }"##;

    #[test]
    fn parses_json_wrapped_in_narration() {
        let text = format!("Aqui está o resultado:\n{ANALYSIS_JSON}\nEspero que ajude!");
        let analysis = parse_design_system(&text);

        assert_eq!(analysis.typography.headline_font.as_deref(), Some("Bebas Neue"));
        assert_eq!(analysis.typography.line_count, Some(2));
        assert_eq!(analysis.typography.text_colors, vec!["#FFD700", "#FFFFFF"]);
        assert_eq!(analysis.layout.text_zone.as_deref(), Some("left"));
        assert_eq!(analysis.colors.accent_1.as_deref(), Some("#FF0000"));
        assert_eq!(analysis.atmosphere.as_deref(), Some("Alto contraste e urgência."));
    }

    #[test]
    fn returns_empty_record_when_no_braces_exist() {
        let analysis = parse_design_system("Não consegui analisar a imagem.");
        assert_eq!(analysis, DesignSystemAnalysis::default());
    }

    #[test]
    fn returns_empty_record_for_invalid_json() {
        let analysis = parse_design_system("{typography: not json}");
        assert_eq!(analysis, DesignSystemAnalysis::default());
    }

    #[test]
    fn clamps_line_count_and_accepts_numeric_strings() {
        let analysis =
            parse_design_system(r#"{"typography": {"line_count": "7", "has_stroke": "yes"}}"#);
        assert_eq!(analysis.typography.line_count, Some(3));
        assert_eq!(analysis.typography.has_stroke, None);

        let analysis = parse_design_system(r#"{"typography": {"line_count": 0}}"#);
        assert_eq!(analysis.typography.line_count, Some(1));
    }

    #[test]
    fn tolerates_missing_and_wrong_typed_groups() {
        let analysis = parse_design_system(r#"{"typography": "none", "layout": {"text_zone": 4}}"#);
        assert_eq!(analysis.typography, Typography::default());
        assert_eq!(analysis.layout.text_zone, None);
        assert_eq!(analysis.colors, ColorScheme::default());
    }
}
