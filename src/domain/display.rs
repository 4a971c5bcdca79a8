//! Render a question tree with termtree.
//!
//! Question nodes print as `? <question>`, leaves print their item, and each
//! child is prefixed with the answer that leads to it.
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeId, QuestionTree};
use crate::domain::entities::Answer;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for QuestionTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn label(tree: &QuestionTree, id: NodeId) -> String {
            match tree.node(id) {
                Ok(node) => match (node.question(), node.item()) {
                    (Some(question), _) => format!("? {}", question),
                    (None, Some(item)) => item.to_string(),
                    (None, None) => "<empty>".to_string(),
                },
                Err(e) => format!("<{}>", e),
            }
        }

        fn build_tree(tree: &QuestionTree, id: NodeId, parent_tree: &mut Tree<String>) {
            for answer in [Answer::Yes, Answer::No] {
                if let Ok(child) = tree.traverse(id, answer) {
                    let mut child_tree = Tree::new(format!("{}: {}", answer, label(tree, child)));
                    build_tree(tree, child, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        let root = self.root();
        let mut rendered = Tree::new(label(self, root));
        build_tree(self, root, &mut rendered);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Item;

    #[test]
    fn given_seed_tree_when_rendering_then_shows_question_and_branches() {
        let rendered = QuestionTree::default().to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "? Is your animal warm or cold blooded?");
        assert!(lines[1].ends_with("yes: Dog"));
        assert!(lines[2].ends_with("no: Snake"));
    }

    #[test]
    fn given_learned_tree_when_rendering_then_nests_new_question() {
        let mut tree = QuestionTree::default();
        let leaf = tree.traverse(tree.root(), Answer::No).unwrap();
        tree.learn(leaf, Item::new("Cat").unwrap(), "Does it meow?", Answer::Yes)
            .unwrap();

        let rendered = tree.to_tree_string().to_string();

        assert!(rendered.contains("no: ? Does it meow?"));
        assert!(rendered.contains("yes: Cat"));
        assert!(rendered.contains("no: Snake"));
        assert_eq!(rendered.lines().count(), 5);
    }
}
