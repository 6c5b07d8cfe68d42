//! Deterministic fallback course generation.
//!
//! When the external AI generator fails or is not configured, the extracted
//! PDF text is paginated into fixed-size topic chunks under a single section.
//! The output depends only on the input text and course title.

use crate::models::ContentNode;

/// Target characters per generated topic slide.
const CHUNK_CHARS: usize = 1200;

/// Upper bound on generated slides so a very large PDF stays navigable.
const MAX_CHUNKS: usize = 40;

/// Build a placeholder content tree by paginating raw text into topic chunks.
pub fn fallback_tree(course_title: &str, text: &str) -> Vec<ContentNode> {
    let chunks = paginate(text);

    let children = chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| ContentNode::Topic {
            id: format!("fallback-topic-{}", i + 1),
            title: format!("Part {}", i + 1),
            content: to_html(&chunk),
            quiz: None,
        })
        .collect();

    vec![ContentNode::Section {
        id: "fallback-section-1".to_string(),
        title: course_title.to_string(),
        children,
    }]
}

/// Split text into word-aligned chunks of roughly `CHUNK_CHARS` characters.
fn paginate(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > CHUNK_CHARS {
            chunks.push(std::mem::take(&mut current));
            if chunks.len() == MAX_CHUNKS {
                return chunks;
            }
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Wrap a text chunk in paragraph markup, splitting on sentence boundaries.
fn to_html(chunk: &str) -> String {
    let mut html = String::new();
    let mut paragraph = String::new();

    for sentence in chunk.split_inclusive(['.', '!', '?']) {
        paragraph.push_str(sentence);
        if paragraph.len() >= 300 {
            html.push_str("<p>");
            html.push_str(&html_escape(paragraph.trim()));
            html.push_str("</p>");
            paragraph.clear();
        }
    }

    if !paragraph.trim().is_empty() {
        html.push_str("<p>");
        html.push_str(&html_escape(paragraph.trim()));
        html.push_str("</p>");
    }

    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::flatten_slides;

    #[test]
    fn test_fallback_is_deterministic() {
        let text = "Lorem ipsum dolor sit amet. ".repeat(200);
        let a = fallback_tree("Demo", &text);
        let b = fallback_tree("Demo", &text);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_fallback_chunks_are_topics_under_one_section() {
        let text = "word ".repeat(1000);
        let tree = fallback_tree("Demo Course", &text);
        assert_eq!(tree.len(), 1);
        match &tree[0] {
            ContentNode::Section { title, children, .. } => {
                assert_eq!(title, "Demo Course");
                assert!(children.len() > 1);
                assert!(children
                    .iter()
                    .all(|c| matches!(c, ContentNode::Topic { .. })));
            }
            _ => panic!("expected section root"),
        }
    }

    #[test]
    fn test_fallback_empty_text_still_navigable() {
        let tree = fallback_tree("Empty", "");
        // No topics generated, but the flattener's welcome slide keeps the
        // course navigable.
        assert_eq!(flatten_slides(&tree).len(), 1);
    }

    #[test]
    fn test_fallback_respects_chunk_cap() {
        let text = "word ".repeat(100_000);
        let tree = fallback_tree("Huge", &text);
        match &tree[0] {
            ContentNode::Section { children, .. } => assert!(children.len() <= MAX_CHUNKS),
            _ => panic!("expected section root"),
        }
    }

    #[test]
    fn test_fallback_escapes_markup() {
        let tree = fallback_tree("Esc", "a <script> & more");
        match &tree[0] {
            ContentNode::Section { children, .. } => match &children[0] {
                ContentNode::Topic { content, .. } => {
                    assert!(content.contains("&lt;script&gt;"));
                    assert!(content.contains("&amp;"));
                }
                _ => panic!("expected topic"),
            },
            _ => panic!("expected section root"),
        }
    }
}
