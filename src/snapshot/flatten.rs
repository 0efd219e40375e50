use super::UiNode;

/// Concatenate every non-blank `text` and `description` in depth-first render
/// order, each fragment followed by a single space. An absent root flattens to "".
pub fn flatten(root: Option<&UiNode>) -> String {
    let mut out = String::new();
    if let Some(node) = root {
        append_node(node, &mut out);
    }
    out
}

fn append_node(node: &UiNode, out: &mut String) {
    for fragment in [node.text.as_deref(), node.description.as_deref()]
        .into_iter()
        .flatten()
    {
        if !fragment.trim().is_empty() {
            out.push_str(fragment);
            out.push(' ');
        }
    }

    for child in &node.children {
        append_node(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_root_is_empty() {
        assert_eq!(flatten(None), "");
    }

    #[test]
    fn text_precedes_description_then_children_in_order() {
        let root = UiNode::new()
            .with_text("Reels")
            .with_description("tab")
            .with_child(
                UiNode::new()
                    .with_text("@maya")
                    .with_child(UiNode::new().with_description("Like number is 40")),
            )
            .with_child(UiNode::new().with_text("caption here"));

        assert_eq!(
            flatten(Some(&root)),
            "Reels tab @maya Like number is 40 caption here "
        );
    }

    #[test]
    fn blank_fields_are_skipped() {
        let root = UiNode::new()
            .with_text("   ")
            .with_description("")
            .with_children([UiNode::new(), UiNode::new().with_description("\tok")]);

        assert_eq!(flatten(Some(&root)), "\tok ");
    }
}
