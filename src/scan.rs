//! Fence scanning and fragment extraction.
//!
//! Two marker shapes share the three-tilde fence. A tag glued to the fence
//! (`~~~cpp`) marks a block for compilation; whitespace between fence and
//! tag (`~~~ cpp`) marks a block that is counted but never compiled. The two
//! classes cannot overlap: one requires zero interior whitespace before the
//! tag, the other at least one character of it.

use anyhow::{Context, Result};
use regex::Regex;

/// One checked code block, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// 1-based position among the checked blocks of the document.
    pub index: usize,
    /// Raw block body with the whitespace inside the fences stripped.
    pub text: String,
}

/// Compiled fence patterns for one language tag.
#[derive(Debug)]
pub struct FencePatterns {
    checked: Regex,
    unchecked: Regex,
}

impl FencePatterns {
    /// Build the checked and unchecked patterns for `tag`.
    ///
    /// The checked body is non-greedy, so each region captures the shortest
    /// span between an opener and the next closer and adjacent blocks are
    /// never merged. The opener must sit on its own line (leading newline,
    /// optional indentation) with the tag glued to the fence.
    pub fn for_tag(tag: &str) -> Result<Self> {
        let tag = regex::escape(tag);
        let checked = Regex::new(&format!(r"\n\s*~~~{tag}\s+([\s\S]+?)\s+~~~\s*\n"))
            .context("compile checked fence pattern")?;
        let unchecked =
            Regex::new(&format!(r"~~~\s+{tag}")).context("compile unchecked fence pattern")?;
        Ok(Self { checked, unchecked })
    }

    /// Extract every checked fragment from `document`, in document order.
    pub fn extract_checked_fragments(&self, document: &str) -> Vec<Fragment> {
        self.checked
            .captures_iter(document)
            .enumerate()
            .map(|(position, captures)| Fragment {
                index: position + 1,
                text: captures[1].to_string(),
            })
            .collect()
    }

    /// Count unchecked markers in `document`.
    ///
    /// An occurrence count only; unchecked blocks are reported as a
    /// statistic and never extracted or compiled.
    pub fn count_unchecked_markers(&self, document: &str) -> usize {
        self.unchecked.find_iter(document).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> FencePatterns {
        FencePatterns::for_tag("cpp").expect("patterns compile")
    }

    #[test]
    fn extracts_single_fragment_without_fence_whitespace() {
        let document = "# Slide\n\n~~~cpp\nint x = 1;\n~~~\n\nmore prose\n";
        let fragments = patterns().extract_checked_fragments(document);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].index, 1);
        assert_eq!(fragments[0].text, "int x = 1;");
    }

    #[test]
    fn extracts_fragments_in_document_order() {
        let document = "\
intro

~~~cpp
int a = 1;
~~~

between the blocks

~~~cpp
int b = 2;
~~~

outro
";
        let fragments = patterns().extract_checked_fragments(document);
        let texts: Vec<&str> = fragments
            .iter()
            .map(|fragment| fragment.text.as_str())
            .collect();
        assert_eq!(texts, vec!["int a = 1;", "int b = 2;"]);
        assert_eq!(fragments[1].index, 2);
    }

    #[test]
    fn non_greedy_body_never_merges_adjacent_blocks() {
        let document = "\
text

~~~cpp
int a = 1;
~~~

text

~~~cpp
int b = 2;
~~~

text
";
        let fragments = patterns().extract_checked_fragments(document);
        assert_eq!(fragments.len(), 2);
        assert!(!fragments[0].text.contains("~~~"));
        assert!(!fragments[0].text.contains("int b"));
    }

    #[test]
    fn multi_line_fragment_keeps_interior_lines() {
        let document = "\
slide

~~~cpp
std::vector<int> v{1, 2, 3};

std::sort(v.begin(), v.end());
~~~

slide
";
        let fragments = patterns().extract_checked_fragments(document);
        assert_eq!(fragments.len(), 1);
        assert_eq!(
            fragments[0].text,
            "std::vector<int> v{1, 2, 3};\n\nstd::sort(v.begin(), v.end());"
        );
    }

    #[test]
    fn whitespace_before_tag_is_unchecked_not_extracted() {
        let document = "# Slide\n\n~~~ cpp\nint y = 2;\n~~~\n";
        let scanner = patterns();
        assert_eq!(scanner.extract_checked_fragments(document).len(), 0);
        assert_eq!(scanner.count_unchecked_markers(document), 1);
    }

    #[test]
    fn marker_classes_never_double_count() {
        let document = "\
prose

~~~cpp
int checked = 0;
~~~

prose

~~~  cpp
int skipped = 0;
~~~

prose
";
        let scanner = patterns();
        assert_eq!(scanner.extract_checked_fragments(document).len(), 1);
        assert_eq!(scanner.count_unchecked_markers(document), 1);
    }

    #[test]
    fn opener_at_document_start_needs_a_leading_newline() {
        // The checked pattern anchors on the newline before the fence, so a
        // fence at byte 0 is not a match. Pinned behavior.
        let document = "~~~cpp\nint x = 1;\n~~~\n";
        assert_eq!(patterns().extract_checked_fragments(document).len(), 0);
    }

    #[test]
    fn other_language_tags_are_ignored() {
        let document = "\ntext\n\n~~~py\nx = 1\n~~~\n\n~~~cpp\nint x = 1;\n~~~\n\ntext\n";
        let scanner = patterns();
        let fragments = scanner.extract_checked_fragments(document);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "int x = 1;");
        assert_eq!(scanner.count_unchecked_markers(document), 0);
    }

    #[test]
    fn tag_is_escaped_when_building_patterns() {
        let scanner = FencePatterns::for_tag("c++").expect("patterns compile");
        let document = "\ntext\n\n~~~c++\nint x = 1;\n~~~\n\ntext\n";
        assert_eq!(scanner.extract_checked_fragments(document).len(), 1);
    }
}
