//! Ordered text passes that strip target components out of a source file.
//!
//! The passes always run in [`Pass::ORDER`]. Fragment collapse looks for a
//! wrapper whose only child is a block element, which is only true once the
//! removal passes have taken the sibling components out.

use crate::patterns::ComponentPatterns;
use regex::Regex;
use std::fmt;

/// One named transformation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    ImportRemoval,
    SelfClosingRemoval,
    PairedRemoval,
    FragmentCollapse,
}

impl Pass {
    pub const ORDER: [Pass; 4] = [
        Pass::ImportRemoval,
        Pass::SelfClosingRemoval,
        Pass::PairedRemoval,
        Pass::FragmentCollapse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pass::ImportRemoval => "import-removal",
            Pass::SelfClosingRemoval => "self-closing-removal",
            Pass::PairedRemoval => "paired-removal",
            Pass::FragmentCollapse => "fragment-collapse",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of running every pass over one file's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub changed: bool,
    /// Passes that changed something, in the order they ran
    pub applied: Vec<Pass>,
}

pub struct Rewriter<'a> {
    patterns: &'a [ComponentPatterns],
    collapse_tags: &'a [String],
}

impl<'a> Rewriter<'a> {
    pub fn new(patterns: &'a [ComponentPatterns], collapse_tags: &'a [String]) -> Self {
        Rewriter {
            patterns,
            collapse_tags,
        }
    }

    pub fn rewrite(&self, original: &str) -> Rewrite {
        let mut content = original.to_string();
        let mut applied = Vec::new();

        for pass in Pass::ORDER {
            let next = self.run_pass(pass, &content);
            if next != content {
                applied.push(pass);
                content = next;
            }
        }

        Rewrite {
            changed: content != original,
            content,
            applied,
        }
    }

    fn run_pass(&self, pass: Pass, content: &str) -> String {
        match pass {
            Pass::ImportRemoval => self
                .patterns
                .iter()
                .fold(content.to_string(), |acc, p| replace_imports(&acc, p)),
            Pass::SelfClosingRemoval => self
                .patterns
                .iter()
                .fold(content.to_string(), |acc, p| remove_elements(&acc, &p.self_closing)),
            Pass::PairedRemoval => self
                .patterns
                .iter()
                .fold(content.to_string(), |acc, p| remove_elements(&acc, &p.paired)),
            Pass::FragmentCollapse => collapse_fragments(content, self.collapse_tags),
        }
    }
}

/// Swap each import for its placeholder comment. A line comment is used when
/// the import ends its line, otherwise a block comment so code after it on the
/// same line stays live.
fn replace_imports(content: &str, patterns: &ComponentPatterns) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for m in patterns.import.find_iter(content) {
        let line_end = content[m.end()..]
            .find('\n')
            .map_or(content.len(), |i| m.end() + i);
        out.push_str(&content[last..m.start()]);
        if content[m.end()..line_end].trim().is_empty() {
            out.push_str(&patterns.import_placeholder());
        } else {
            out.push_str(&format!("/* {} import removed */", patterns.name));
        }
        last = m.end();
    }
    out.push_str(&content[last..]);
    out
}

/// Remove every match of `pattern`. A match standing alone on its line takes
/// the whole line, line break included, with it.
fn remove_elements(content: &str, pattern: &Regex) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for m in pattern.find_iter(content) {
        let (start, end) = line_extent(content, last, m.start(), m.end());
        out.push_str(&content[last..start]);
        last = end;
    }
    out.push_str(&content[last..]);
    out
}

/// Widen `start..end` to the full line when only whitespace surrounds it.
/// Never reaches back before `floor`, the end of the previous removal.
fn line_extent(content: &str, floor: usize, start: usize, end: usize) -> (usize, usize) {
    let line_start = content[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = content[end..].find('\n').map_or(content.len(), |i| end + i);

    let before_blank = content[line_start..start].trim().is_empty();
    let after_blank = content[end..line_end].trim().is_empty();
    if !(before_blank && after_blank) {
        return (start, end);
    }

    if line_end < content.len() {
        // take the trailing newline
        (line_start, line_end + 1)
    } else if line_start > floor {
        // last line of the file: take the preceding newline instead
        (line_start - 1, line_end)
    } else {
        (line_start, line_end)
    }
}

const FRAGMENT_OPEN: &str = "<>";
const FRAGMENT_CLOSE: &str = "</>";

/// Replace `<> <tag>...</tag> </>` with the bare element when that element
/// is the fragment's only content.
fn collapse_fragments(content: &str, tags: &[String]) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    let mut pos = 0;

    while let Some(offset) = content[pos..].find(FRAGMENT_OPEN) {
        let open = pos + offset;
        let inner_start = open + FRAGMENT_OPEN.len();

        let Some(close) = matching_fragment_close(content, inner_start) else {
            pos = inner_start;
            continue;
        };

        let inner = content[inner_start..close].trim();
        if tags.iter().any(|tag| is_sole_element(inner, tag)) {
            out.push_str(&content[last..open]);
            out.push_str(inner);
            last = close + FRAGMENT_CLOSE.len();
            pos = last;
        } else {
            pos = inner_start;
        }
    }

    out.push_str(&content[last..]);
    out
}

/// Byte offset of the `</>` closing the fragment whose body starts at `from`
fn matching_fragment_close(content: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;

    while i < content.len() {
        let rest = &content[i..];
        if rest.starts_with(FRAGMENT_CLOSE) {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
            i += FRAGMENT_CLOSE.len();
        } else if rest.starts_with(FRAGMENT_OPEN) {
            depth += 1;
            i += FRAGMENT_OPEN.len();
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    None
}

/// True when `text` is exactly one `<tag ...>...</tag>` (or `<tag ... />`)
fn is_sole_element(text: &str, tag: &str) -> bool {
    element_end(text, tag) == Some(text.len())
}

/// End offset of the `tag` element that starts at the beginning of `text`,
/// counting nested elements of the same tag.
fn element_end(text: &str, tag: &str) -> Option<usize> {
    open_tag_end(text, tag)?;

    let close = format!("</{tag}");
    let mut depth = 0usize;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        if let Some(len) = closing_tag_len(rest, &close) {
            depth = depth.checked_sub(1)?;
            i += len;
            if depth == 0 {
                return Some(i);
            }
        } else if let Some((len, self_closing)) = open_tag_end(rest, tag) {
            i += len;
            if self_closing {
                if depth == 0 {
                    return Some(i);
                }
            } else {
                depth += 1;
            }
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    None
}

/// If `text` starts with an opening `<tag ...>` (or `<tag .../>`), its length
/// and whether it is self-closing.
fn open_tag_end(text: &str, tag: &str) -> Option<(usize, bool)> {
    let after_name = text.strip_prefix('<')?.strip_prefix(tag)?;
    let next = after_name.chars().next()?;
    if !(next.is_whitespace() || next == '>' || next == '/') {
        return None;
    }

    let gt = after_name.find('>')?;
    let len = 1 + tag.len() + gt + 1;
    let self_closing = after_name[..gt].trim_end().ends_with('/');
    Some((len, self_closing))
}

fn closing_tag_len(text: &str, close: &str) -> Option<usize> {
    let rest = text.strip_prefix(close)?;
    let trimmed = rest.trim_start();
    trimmed.starts_with('>').then(|| close.len() + (rest.len() - trimmed.len()) + 1)
}
