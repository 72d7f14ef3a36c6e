use tracing::debug;

use crate::llm::gemini::{self, GeminiResponse};
use crate::llm::media::ImageFile;

#[derive(Debug, thiserror::Error)]
#[error("Thumbnail synthesis failed: {0}")]
pub struct SynthesisError(pub String);

fn image_from_response(response: &GeminiResponse) -> Result<Vec<u8>, SynthesisError> {
    if let Some(bytes) = gemini::extract_first_image(response) {
        debug!("Synthesized image payload: {} bytes", bytes.len());
        return Ok(bytes);
    }

    Err(SynthesisError(format!(
        "Gemini returned no image (finishReason={})",
        gemini::first_finish_reason(response)
    )))
}

pub async fn synthesize_thumbnail(
    prompt: &str,
    images: &[&ImageFile],
) -> Result<Vec<u8>, SynthesisError> {
    let response = gemini::call_image_generation(prompt, images)
        .await
        .map_err(|err| SynthesisError(err.to_string()))?;

    image_from_response(&response)
}
