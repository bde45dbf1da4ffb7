/// Estimates the model-token count of a text as characters divided by four,
/// rounded up. This is a flat approximation, not a tokenizer-accurate count;
/// budgets derived from it leave headroom accordingly.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
