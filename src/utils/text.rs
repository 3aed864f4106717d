use ammonia;

/// Clean user-supplied or AI-generated text using the ammonia library.
///
/// Post text, comments, and tutor answers are rendered by whatever shell
/// embeds this crate, so everything crossing into the document store passes
/// through a whitelist-based sanitizer first: safe inline tags survive,
/// `<script>`/`<iframe>` and event-handler attributes do not.
///
/// Note: plain text and markdown pass through unchanged apart from HTML
/// entity handling.
pub fn clean(input: &str) -> String {
    ammonia::clean(input)
}
