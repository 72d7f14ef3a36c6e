use crate::catalog::objective_guidance;
use crate::pipeline::analysis::DesignSystemAnalysis;
use crate::pipeline::fidelity::calibrate;

pub const DEFAULT_HEADLINE_FONT: &str = "Impact";
pub const DEFAULT_HEADLINE_WEIGHT: &str = "bold";
pub const DEFAULT_TEXT_CASE: &str = "UPPERCASE";
pub const DEFAULT_STROKE_THICKNESS: &str = "medium";
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_STROKE_COLOR: &str = "#000000";
pub const DEFAULT_LINE_COUNT: u8 = 2;
pub const DEFAULT_COMPOSITION: &str = "person-right-text-left";
pub const DEFAULT_PERSON_POSITION: &str = "right";
pub const DEFAULT_PERSON_CROP: &str = "torso-up";
pub const DEFAULT_PERSON_SIZE: &str = "large";
pub const DEFAULT_TEXT_ZONE: &str = "left";
pub const DEFAULT_BACKGROUND: &str = "#0D0D1A";
pub const DEFAULT_BACKGROUND_TYPE: &str = "solid";
pub const DEFAULT_ACCENT_1: &str = "#FFD700";
pub const DEFAULT_ACCENT_2: &str = "#FFFFFF";

const SECTION_RULE: &str = "═══════════════════════════════════════════";

fn sim_nao(flag: bool) -> &'static str {
    if flag {
        "SIM"
    } else {
        "NÃO"
    }
}

fn join_or_default(colors: &[String], default: &str) -> String {
    if colors.is_empty() {
        default.to_string()
    } else {
        colors.join(", ")
    }
}

fn design_system_section(analysis: &DesignSystemAnalysis, similarity: u8) -> String {
    let tier = calibrate(similarity);
    let typography = &analysis.typography;
    let layout = &analysis.layout;
    let colors = &analysis.colors;

    let font = typography
        .headline_font
        .as_deref()
        .unwrap_or(DEFAULT_HEADLINE_FONT);
    let weight = typography
        .headline_weight
        .as_deref()
        .unwrap_or(DEFAULT_HEADLINE_WEIGHT);
    let text_case = typography.text_case.as_deref().unwrap_or(DEFAULT_TEXT_CASE);
    let stroke = sim_nao(typography.has_stroke.unwrap_or(false));
    let thickness = typography
        .stroke_thickness
        .as_deref()
        .unwrap_or(DEFAULT_STROKE_THICKNESS);
    let text_colors = join_or_default(&typography.text_colors, DEFAULT_TEXT_COLOR);
    let stroke_colors = join_or_default(&typography.stroke_colors, DEFAULT_STROKE_COLOR);
    let line_count = typography.line_count.unwrap_or(DEFAULT_LINE_COUNT);
    let shadow = sim_nao(typography.text_shadow.unwrap_or(false));

    let composition = layout
        .composition_type
        .as_deref()
        .unwrap_or(DEFAULT_COMPOSITION);
    let person_position = layout
        .person_position
        .as_deref()
        .unwrap_or(DEFAULT_PERSON_POSITION);
    let person_crop = layout.person_crop.as_deref().unwrap_or(DEFAULT_PERSON_CROP);
    let person_size = layout.person_size.as_deref().unwrap_or(DEFAULT_PERSON_SIZE);
    let text_zone = layout.text_zone.as_deref().unwrap_or(DEFAULT_TEXT_ZONE);

    let background = colors
        .background_main
        .as_deref()
        .unwrap_or(DEFAULT_BACKGROUND);
    let background_type = colors
        .background_type
        .as_deref()
        .unwrap_or(DEFAULT_BACKGROUND_TYPE);
    let accent_1 = colors.accent_1.as_deref().unwrap_or(DEFAULT_ACCENT_1);
    let accent_2 = colors.accent_2.as_deref().unwrap_or(DEFAULT_ACCENT_2);

    let atmosphere = analysis.atmosphere.as_deref().unwrap_or("");

    format!(
        "{SECTION_RULE}\n\
{header}\n\
{rule}\n\
{SECTION_RULE}\n\
TIPOGRAFIA:\n\
- Fonte: {font} | Peso: {weight} | Caixa: {text_case}\n\
- Contorno: {stroke} ({thickness})\n\
- Cores texto: {text_colors} | Contorno: {stroke_colors}\n\
- Linhas: {line_count} | Sombra: {shadow}\n\
LAYOUT: {composition} | Pessoa: {person_position} {person_crop} {person_size} | Texto: {text_zone}\n\
CORES: Fundo {background} ({background_type}) | Destaque {accent_1} / {accent_2}\n\
ATMOSFERA: {atmosphere}\n\
{SECTION_RULE}",
        header = tier.header,
        rule = tier.rule,
    )
}

pub fn compose_prompt(
    objective: &str,
    brief: &str,
    analysis: &DesignSystemAnalysis,
    similarity: u8,
    has_person: bool,
    has_extra: bool,
) -> String {
    let guidance = objective_guidance(objective);
    let design_section = design_system_section(analysis, similarity);

    let person_rule = if has_person {
        "- A PRIMEIRA IMAGEM enviada é a pessoa protagonista — inclua ela de forma clara e visível na thumbnail"
    } else {
        "- Crie uma composição visualmente impactante mesmo sem foto de pessoa"
    };
    let extra_rule = if has_extra {
        "\n- A ÚLTIMA IMAGEM enviada é um elemento gráfico extra (logo/sticker/overlay) — posicione-o de forma harmoniosa e visível na composição, respeitando a hierarquia visual."
    } else {
        ""
    };

    format!(
        "Você é um especialista em criação de thumbnails virais para YouTube com alto CTR.\n\
\n\
OBJETIVO: {guidance}\n\
\n\
{design_section}\n\
INSTRUÇÃO DO CRIADOR: {brief}\n\
\n\
REGRAS ABSOLUTAS:\n\
- Resolução: exatamente 1280x720 pixels, formato 16:9 horizontal\n\
{person_rule}\n\
- ⚠️ CRÍTICO — SEM TEXTO NA IMAGEM: NÃO inclua nenhum texto, palavra, número, letra, título ou legenda na imagem. Zero texto. A composição deve conter APENAS elementos visuais: pessoa, fundo, cores, gradientes, formas gráficas. O texto será adicionado como camada editável separada.\n\
- RESPEITE a estrutura e composição do template: layout, hierarquia visual, posição da pessoa e zonas de design\n\
- Deixe as áreas de texto claramente definidas (contraste/espaço vazio) para receber os títulos depois{extra_rule}\n\
\n\
Gere apenas a imagem de fundo sem texto. Nenhum texto explicativo."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::parse_design_system;

    #[test]
    fn empty_analysis_yields_fully_defaulted_instruction() {
        let analysis = DesignSystemAnalysis::default();
        let prompt = compose_prompt("dinheiro", "vídeo sobre renda extra", &analysis, 60, true, false);

        assert!(prompt.contains("Fonte: Impact"));
        assert!(prompt.contains("Caixa: UPPERCASE"));
        assert!(prompt.contains("Fundo #0D0D1A (solid)"));
        assert!(prompt.contains("Destaque #FFD700 / #FFFFFF"));
        assert!(prompt.contains("Linhas: 2"));
        assert!(prompt.contains("person-right-text-left"));
    }

    #[test]
    fn hard_constraints_are_always_present() {
        let analysis = DesignSystemAnalysis::default();
        let prompt = compose_prompt("tutorial", "", &analysis, 0, false, false);

        assert!(prompt.contains("Resolução: exatamente 1280x720 pixels, formato 16:9 horizontal"));
        assert!(prompt.contains("SEM TEXTO NA IMAGEM"));
        assert!(prompt.contains("Zero texto"));
        assert!(prompt.contains("Gere apenas a imagem de fundo sem texto."));
    }

    #[test]
    fn person_rule_follows_the_person_flag() {
        let analysis = DesignSystemAnalysis::default();

        let with_person = compose_prompt("historia", "", &analysis, 50, true, false);
        assert!(with_person.contains("A PRIMEIRA IMAGEM enviada é a pessoa protagonista"));

        let without_person = compose_prompt("historia", "", &analysis, 50, false, false);
        assert!(without_person.contains("mesmo sem foto de pessoa"));
        assert!(!without_person.contains("PRIMEIRA IMAGEM"));
    }

    #[test]
    fn extra_asset_rule_only_appears_when_supplied() {
        let analysis = DesignSystemAnalysis::default();

        let with_extra = compose_prompt("promessa", "", &analysis, 50, true, true);
        assert!(with_extra.contains("A ÚLTIMA IMAGEM enviada é um elemento gráfico extra"));

        let without_extra = compose_prompt("promessa", "", &analysis, 50, true, false);
        assert!(!without_extra.contains("ÚLTIMA IMAGEM"));
    }

    #[test]
    fn unknown_objective_yields_empty_guidance_line() {
        let analysis = DesignSystemAnalysis::default();
        let prompt = compose_prompt("desconhecido", "", &analysis, 50, true, false);
        assert!(prompt.contains("OBJETIVO: \n"));
    }

    #[test]
    fn analysis_values_override_the_defaults() {
        let analysis = parse_design_system(
            r##"{
                "typography": {"headline_font": "Bebas Neue", "has_stroke": true, "line_count": 3},
                "colors": {"background_main": "#112233", "background_type": "gradient"}
            }"##,
        );
        let prompt = compose_prompt("erro", "", &analysis, 80, true, false);

        assert!(prompt.contains("Fonte: Bebas Neue"));
        assert!(prompt.contains("Contorno: SIM (medium)"));
        assert!(prompt.contains("Linhas: 3"));
        assert!(prompt.contains("Fundo #112233 (gradient)"));
        assert!(!prompt.contains("Fonte: Impact"));
    }

    #[test]
    fn medium_similarity_request_reads_like_the_full_brief() {
        let analysis = DesignSystemAnalysis::default();
        let prompt = compose_prompt("dinheiro", "meu primeiro 100k", &analysis, 60, true, false);

        assert!(prompt.contains("Resultado financeiro expressivo"));
        assert!(prompt.contains("Nível 60%"));
        assert!(prompt.contains("Mantenha layout e composição similares"));
        assert!(prompt.contains("A PRIMEIRA IMAGEM enviada é a pessoa protagonista"));
        assert!(prompt.contains("SEM TEXTO NA IMAGEM"));
        assert!(prompt.contains("INSTRUÇÃO DO CRIADOR: meu primeiro 100k"));
    }
}
