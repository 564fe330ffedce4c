//! Prompt construction for mandala generation.

/// Build the generation prompt for an inspiration word.
///
/// The template is fixed; the word is substituted verbatim. Callers are
/// responsible for trimming and rejecting empty input first.
#[must_use]
pub fn build_prompt(word: &str) -> String {
    format!(
        "Create a detailed black and white mandala inspired by the word '{word}'. \
         The mandala should be: \
         intricate and symmetrical, \
         black ink on white background, \
         a circular geometric pattern, \
         hand-drawn artistic style, \
         incorporating elements that relate to '{word}', \
         suitable for meditation and coloring, \
         high contrast black and white only."
    )
}
