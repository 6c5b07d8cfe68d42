//! Slide flattening over content trees.
//!
//! Both slide navigation payloads and server-side progress clamping evaluate
//! this same function; any divergence between the two would corrupt stored
//! progress invariants, so there is exactly one implementation.

use crate::models::{ContentNode, Slide};

/// Title of the synthetic slide emitted for trees with no topics.
pub const WELCOME_TITLE: &str = "Welcome";

/// Fixed content of the synthetic welcome slide.
pub const WELCOME_CONTENT: &str =
    "<h2>Welcome to this course!</h2><p>Course content is being prepared. Check back soon.</p>";

/// Flatten a content tree into its ordered slide list.
///
/// Depth-first, children in original order; one slide per topic node. Section
/// and unknown nodes contribute no slide, but a section's children are still
/// visited. A tree with no topics yields a single synthetic welcome slide, so
/// the result is never empty.
pub fn flatten_slides(tree: &[ContentNode]) -> Vec<Slide> {
    let mut slides = Vec::new();
    collect_topics(tree, &mut slides);

    if slides.is_empty() {
        slides.push(Slide {
            id: "welcome".to_string(),
            title: WELCOME_TITLE.to_string(),
            content: WELCOME_CONTENT.to_string(),
            quiz: None,
        });
    }

    slides
}

fn collect_topics(nodes: &[ContentNode], out: &mut Vec<Slide>) {
    for node in nodes {
        match node {
            ContentNode::Topic {
                id,
                title,
                content,
                quiz,
            } => out.push(Slide {
                id: id.clone(),
                title: title.clone(),
                content: content.clone(),
                quiz: quiz.clone(),
            }),
            ContentNode::Section { children, .. } => collect_topics(children, out),
            ContentNode::Other => {}
        }
    }
}

/// Number of navigable slides in a tree: `max(1, topic count)`.
///
/// Never zero, so percentage math downstream never divides by zero.
pub fn total_slides(tree: &[ContentNode]) -> usize {
    flatten_slides(tree).len()
}
