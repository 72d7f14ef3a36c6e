use std::collections::HashMap;

use once_cell::sync::Lazy;

pub static OBJECTIVE_CONTEXT: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "dinheiro",
            "Resultado financeiro expressivo. Transmite riqueza, conquista e prova social. Usa números grandes, cifrão em destaque, expressão de surpresa ou orgulho.",
        ),
        (
            "promessa",
            "Promessa clara e irresistível. Transmite transformação rápida e método comprovado. Usa prazo definido, linguagem direta e certeza.",
        ),
        (
            "polemica",
            "Choque e curiosidade extrema. Quebre expectativas, revele contradições, provoque indignação positiva. Expressão facial de espanto ou revolta.",
        ),
        (
            "erro",
            "Alerta e prevenção. A pessoa está cometendo um erro que não sabe. Usa símbolos de proibição, expressão de alerta, contraste forte entre certo e errado.",
        ),
        (
            "autoridade",
            "Credibilidade e expertise. Postura confiante, provas visuais de resultado. Transmite que essa pessoa é a referência no assunto.",
        ),
        (
            "transformacao",
            "Antes vs depois dramático. Contraste visual máximo entre dois estados. Narrativa de superação visível na composição.",
        ),
        (
            "tutorial",
            "Clareza e didatismo. Estrutura visual organizada, sensação de aprendizado fácil.",
        ),
        (
            "historia",
            "Conexão emocional e narrativa pessoal. Expressão autêntica, contexto de jornada real.",
        ),
    ])
});

pub fn objective_guidance(tag: &str) -> &'static str {
    OBJECTIVE_CONTEXT.get(tag).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_objectives_have_guidance() {
        assert!(objective_guidance("dinheiro").contains("Resultado financeiro"));
        assert!(objective_guidance("tutorial").contains("didatismo"));
        assert_eq!(OBJECTIVE_CONTEXT.len(), 8);
    }

    #[test]
    fn unknown_objective_yields_empty_guidance() {
        assert_eq!(objective_guidance("viral"), "");
        assert_eq!(objective_guidance(""), "");
    }
}
