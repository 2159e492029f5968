pub const NO_REVIEWS_PLACEHOLDER: &str = "No relevant reviews found.";

const TEMPLATE: &str = "
You're an expert in answering questions about a pizza restaurant.

Here are some relevant reviews:
{reviews}

Here is the question to answer: {question}
";

/// Fill the two template slots. An empty context becomes the
/// no-reviews placeholder.
pub fn render_prompt(reviews: &str, question: &str) -> String {
    let reviews = if reviews.is_empty() {
        NO_REVIEWS_PLACEHOLDER
    } else {
        reviews
    };

    // Question last so braces in the reviews are never treated as a slot.
    let (head, tail) = TEMPLATE
        .split_once("{question}")
        .unwrap_or((TEMPLATE, ""));
    let head = head.replacen("{reviews}", reviews, 1);
    format!("{head}{question}{tail}")
}
