use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{self, Write as _};
use std::path::Path;

use crate::index::IndexType;
use crate::node::Color;
use crate::tree::RbTree;

impl<T, C, Ix> RbTree<T, C, Ix>
where
    T: fmt::Display,
    Ix: IndexType,
{
    /// Render the tree in the DOT language of graphviz.
    ///
    /// Every node is labelled with its value and filled with its color.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph rbtree {\n    node [style=filled, fontcolor=white];\n");
        let mut pending: Vec<_> = self.root.into_iter().collect();
        let mut null = 0;
        while let Some(x) = pending.pop() {
            let (value, color, children) = self
                .arena
                .node_ref(x, |xn| (xn.value(), xn.color(), xn.children));
            let fill = match color {
                Color::Red => "red",
                Color::Black => "black",
            };
            let _ignore = writeln!(
                dot,
                "    n{} [label=\"{value}\", fillcolor={fill}];",
                x.index()
            );
            for child in children {
                match child {
                    Some(child) => {
                        let _ignore = writeln!(dot, "    n{} -> n{};", x.index(), child.index());
                        pending.push(child);
                    }
                    None => {
                        let _ignore = writeln!(dot, "    null{null} [shape=point];");
                        let _ignore = writeln!(dot, "    n{} -> null{null};", x.index());
                        null += 1;
                    }
                }
            }
        }
        dot.push_str("}\n");
        dot
    }

    /// Write [`RbTree::to_dot`] into the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created or written.
    pub fn draw(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.to_dot().as_bytes())
    }
}
