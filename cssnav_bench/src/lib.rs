//! Generated stylesheets for benchmarking the range parser.

/// `rules` top level rules, each with a few declarations and a comment.
pub fn flat_stylesheet(rules: usize) -> String {
    let mut css = String::new();
    for i in 0..rules {
        css.push_str(&format!(
            "/* rule {i} */\n.block-{i}, #id-{i} > a[href^=\"http\"] {{\n  color: rgb({r}, 0, 0);\n  background: url(\"img/{i}.png\");\n}}\n",
            r = i % 256
        ));
    }
    css
}

/// `rules` top level rules, each nesting `depth` levels of children and parent
/// references.
pub fn nested_stylesheet(rules: usize, depth: usize) -> String {
    let mut scss = String::new();
    for i in 0..rules {
        scss.push_str(&format!(".card-{i}, .panel-{i} {{\n"));
        for level in 0..depth {
            let indent = "  ".repeat(level + 1);
            scss.push_str(&format!("{indent}&:hover, .child-{level} {{ margin: {level}px;\n"));
        }
        for level in (0..depth).rev() {
            scss.push_str(&"  ".repeat(level + 1));
            scss.push_str("}\n");
        }
        scss.push_str("}\n");
    }
    scss
}
