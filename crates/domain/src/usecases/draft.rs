//! Post drafting use case - turns a style guide and a research topic into
//! submittable post content

use crate::ports::TextGenerator;

/// A drafted post, split for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    /// First line of the generated content
    pub title: String,
    /// Everything after the first line break
    pub body: String,
    /// The full generated content, persisted verbatim in the record
    pub content: String,
}

/// Use case for drafting the research post.
///
/// Generation failure degrades to an empty draft; the caller submits whatever
/// came back, empty title included.
pub struct PostDrafter<'a, G: ?Sized> {
    generator: &'a G,
}

impl<'a, G: TextGenerator + ?Sized> PostDrafter<'a, G> {
    pub fn new(generator: &'a G) -> Self {
        Self { generator }
    }

    pub async fn draft(&self, style_guide: &str, research_prompt: &str) -> PostDraft {
        let prompt = build_post_prompt(style_guide, research_prompt);
        let content = match self.generator.generate(&prompt).await {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(error = %error, "Post generation failed, using empty draft");
                String::new()
            }
        };
        split_draft(&content)
    }
}

/// Build the post-drafting prompt
pub fn build_post_prompt(style_guide: &str, research_prompt: &str) -> String {
    format!(
        "Create a Reddit post following this style guide:\n\
         {style_guide}\n\
         \n\
         Research Topic:\n\
         {research_prompt}\n\
         \n\
         Generate a post that will encourage meaningful discussion and responses.\n"
    )
}

/// Split generated content at the first line break: line 0 becomes the
/// title, the remainder the body. No validation of a non-empty title.
pub fn split_draft(content: &str) -> PostDraft {
    let (title, body) = match content.split_once('\n') {
        Some((title, body)) => (title.to_string(), body.to_string()),
        None => (content.to_string(), String::new()),
    };

    PostDraft {
        title,
        body,
        content: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GenerateError;
    use async_trait::async_trait;

    struct FakeGenerator {
        response: Result<String, ()>,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            self.response
                .clone()
                .map_err(|_| GenerateError::Timeout)
        }
    }

    #[test]
    fn split_uses_first_line_as_title() {
        let draft = split_draft("Title Line\nBody line");

        assert_eq!(draft.title, "Title Line");
        assert_eq!(draft.body, "Body line");
        assert_eq!(draft.content, "Title Line\nBody line");
    }

    #[test]
    fn split_keeps_later_line_breaks_in_body() {
        let draft = split_draft("Title\nfirst\nsecond");

        assert_eq!(draft.title, "Title");
        assert_eq!(draft.body, "first\nsecond");
    }

    #[test]
    fn split_without_line_break_yields_empty_body() {
        let draft = split_draft("Only a title");

        assert_eq!(draft.title, "Only a title");
        assert!(draft.body.is_empty());
    }

    #[test]
    fn split_of_empty_content_is_all_empty() {
        let draft = split_draft("");

        assert!(draft.title.is_empty());
        assert!(draft.body.is_empty());
    }

    #[tokio::test]
    async fn draft_returns_split_content() {
        let generator = FakeGenerator {
            response: Ok("Title Line\nBody line".to_string()),
        };
        let drafter = PostDrafter::new(&generator);

        let draft = drafter.draft("style", "topic").await;

        assert_eq!(draft.title, "Title Line");
        assert_eq!(draft.body, "Body line");
    }

    #[tokio::test]
    async fn generation_failure_degrades_to_empty_draft() {
        let generator = FakeGenerator { response: Err(()) };
        let drafter = PostDrafter::new(&generator);

        let draft = drafter.draft("style", "topic").await;

        assert!(draft.title.is_empty());
        assert!(draft.body.is_empty());
        assert!(draft.content.is_empty());
    }

    #[test]
    fn post_prompt_includes_style_and_topic() {
        let prompt = build_post_prompt("Keep it short", "Next-gen smartphones");

        assert!(prompt.contains("Keep it short"));
        assert!(prompt.contains("Next-gen smartphones"));
    }
}
