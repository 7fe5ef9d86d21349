//! Reverse dependency lookup
//!
//! Answers "which loaded bundles include this one, directly or through other
//! bundles". Both the removal gate and the `--has-dep` query use it.

use crate::domain::Manifest;

/// Per-traversal output state.
///
/// The header is printed at most once per traversal; a fresh context starts a
/// fresh traversal.
#[derive(Debug, Clone)]
pub struct TraversalContext {
    header: String,
    header_emitted: bool,
    verbose: bool,
    lines: Vec<String>,
}

impl TraversalContext {
    /// `verbose` renders the full dependency tree instead of a flat list
    pub fn new(header: impl Into<String>, verbose: bool) -> Self {
        Self {
            header: header.into(),
            header_emitted: false,
            verbose,
            lines: Vec::new(),
        }
    }

    /// Lines produced so far, header included
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn emit_header(&mut self) {
        if self.header_emitted {
            return;
        }
        self.header_emitted = true;
        self.lines.push(self.header.clone());
        if self.verbose {
            self.lines.extend(
                [
                    "",
                    "format:",
                    " # * is-required-by",
                    " #   |-- is-required-by",
                    " # * is-also-required-by",
                    " # ...",
                    "",
                ]
                .map(str::to_string),
            );
        }
    }

    fn tree_line(&mut self, name: &str, depth: usize) {
        self.emit_header();
        let line = if depth == 1 {
            format!("  * {name}")
        } else {
            format!("{:indent$}|-- {name}", "", indent = (depth - 1) * 4)
        };
        self.lines.push(line);
    }
}

/// Bundles in `submanifests` that depend on `target`, deduplicated in
/// discovery order.
///
/// Bundles listed in `exclusions` are not reported but are still searched
/// through, so whatever depends on them is found.
pub fn find_dependents(
    target: &str,
    submanifests: &[Manifest],
    exclusions: &[String],
    ctx: &mut TraversalContext,
) -> Vec<String> {
    let mut found = Vec::new();
    let mut path = vec![target.to_string()];
    walk(target, submanifests, exclusions, ctx, 1, &mut path, &mut found);

    let mut dependents: Vec<String> = Vec::with_capacity(found.len());
    for name in found {
        if !dependents.contains(&name) {
            dependents.push(name);
        }
    }

    if !ctx.verbose {
        for name in &dependents {
            ctx.emit_header();
            ctx.lines.push(format!(" - {name}"));
        }
    }

    dependents
}

fn walk(
    target: &str,
    submanifests: &[Manifest],
    exclusions: &[String],
    ctx: &mut TraversalContext,
    depth: usize,
    path: &mut Vec<String>,
    found: &mut Vec<String>,
) {
    for bundle in submanifests {
        if bundle.component == target || !bundle.includes_bundle(target) {
            continue;
        }

        if !exclusions.contains(&bundle.component) {
            found.push(bundle.component.clone());
            if ctx.verbose {
                ctx.tree_line(&bundle.component, depth);
            }
        }

        // Include cycles are invalid content; stop rather than loop
        if path.contains(&bundle.component) {
            continue;
        }
        path.push(bundle.component.clone());
        walk(
            &bundle.component,
            submanifests,
            exclusions,
            ctx,
            depth + 1,
            path,
            found,
        );
        path.pop();
    }
}
