pub mod analysis;
mod coerce;
pub mod fidelity;
pub mod prompt;
pub mod synthesis;
pub mod text_elements;

use tracing::info;

use crate::llm::media::ImageFile;
use analysis::{analyze_reference, DesignSystemAnalysis};
use fidelity::clamp_similarity;
use prompt::compose_prompt;
use synthesis::{synthesize_thumbnail, SynthesisError};
use text_elements::{generate_text_elements, TextElement};

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub objective: String,
    pub brief: String,
    pub similarity: i64,
    pub person_image: Option<ImageFile>,
    pub reference_image: Option<ImageFile>,
    pub extra_asset: Option<ImageFile>,
}

#[derive(Debug)]
pub struct GenerationResult {
    pub image: Vec<u8>,
    pub elements: Vec<TextElement>,
    pub analysis: DesignSystemAnalysis,
}

pub async fn generate_thumbnail(
    request: &GenerationRequest,
) -> Result<GenerationResult, SynthesisError> {
    let similarity = clamp_similarity(request.similarity);

    let analysis = match &request.reference_image {
        Some(reference) => analyze_reference(reference).await,
        None => DesignSystemAnalysis::default(),
    };

    let prompt = compose_prompt(
        &request.objective,
        &request.brief,
        &analysis,
        similarity,
        request.person_image.is_some(),
        request.extra_asset.is_some(),
    );

    // Order matters: the prompt refers to the first and last supplied images.
    let mut images: Vec<&ImageFile> = Vec::new();
    if let Some(person) = &request.person_image {
        images.push(person);
    }
    if let Some(reference) = &request.reference_image {
        images.push(reference);
    }
    if let Some(extra) = &request.extra_asset {
        images.push(extra);
    }

    // Overlay text never depends on the rendered pixels, so both calls can overlap.
    let (image, elements) = tokio::join!(
        synthesize_thumbnail(&prompt, &images),
        generate_text_elements(&request.objective, &request.brief, &analysis),
    );
    let image = image?;

    info!(
        "Generated thumbnail: {} bytes, {} text element(s), similarity={}",
        image.len(),
        elements.len(),
        similarity
    );

    Ok(GenerationResult {
        image,
        elements,
        analysis,
    })
}
