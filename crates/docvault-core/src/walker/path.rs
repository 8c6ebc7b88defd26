use std::fmt::Write;

///
/// PathSegment
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum PathSegment<'a> {
    Field(&'a str),
    Index(usize),
}

/// Extend `parent` by one segment. Fields are dot-separated (no leading
/// dot at the root), indices are bracketed.
pub(super) fn render_path(parent: &str, segment: PathSegment<'_>) -> String {
    let mut out = String::with_capacity(parent.len() + 8);
    out.push_str(parent);

    match segment {
        PathSegment::Field(name) => {
            if !parent.is_empty() {
                out.push('.');
            }
            out.push_str(name);
        }
        PathSegment::Index(index) => {
            let _ = write!(out, "[{index}]");
        }
    }

    out
}

///
/// TESTS
///
