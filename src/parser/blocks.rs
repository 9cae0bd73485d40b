/// A run of non-blank lines, borrowed from the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBlock<'a> {
    /// Position among the emitted blocks of the document.
    pub index: usize,
    /// 1-based line number of the block's first line.
    pub line: usize,
    pub text: &'a str,
}

/// Split document text on blank lines. Blocks come back in document order,
/// trimmed; a line holding only whitespace counts as blank.
pub fn split_blocks(document: &str) -> Vec<TextBlock<'_>> {
    let mut blocks = Vec::new();
    let mut open: Option<(usize, usize)> = None; // (byte start, line number)
    let mut end = 0;
    let mut offset = 0;

    for (i, raw) in document.split_inclusive('\n').enumerate() {
        if raw.trim().is_empty() {
            if let Some((start, line)) = open.take() {
                push_block(&mut blocks, &document[start..end], line);
            }
        } else {
            if open.is_none() {
                open = Some((offset, i + 1));
            }
            end = offset + raw.len();
        }
        offset += raw.len();
    }

    if let Some((start, line)) = open {
        push_block(&mut blocks, &document[start..end], line);
    }

    blocks
}

fn push_block<'a>(blocks: &mut Vec<TextBlock<'a>>, span: &'a str, line: usize) {
    let text = span.trim();
    if text.is_empty() {
        return;
    }
    blocks.push(TextBlock {
        index: blocks.len(),
        line,
        text,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(doc: &str) -> Vec<&str> {
        split_blocks(doc).into_iter().map(|b| b.text).collect()
    }

    #[test]
    fn empty_input() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("  \n\n \t\n").is_empty());
    }

    #[test]
    fn single_block() {
        assert_eq!(texts("one\ntwo"), vec!["one\ntwo"]);
    }

    #[test]
    fn blank_line_separates() {
        assert_eq!(texts("a\nb\n\nc\n"), vec!["a\nb", "c"]);
    }

    #[test]
    fn runs_of_blank_lines_collapse() {
        assert_eq!(texts("\n\na\n\n\n\nb\n\n"), vec!["a", "b"]);
    }

    #[test]
    fn whitespace_only_line_is_blank() {
        assert_eq!(texts("a\n   \nb"), vec!["a", "b"]);
    }

    #[test]
    fn crlf_input() {
        assert_eq!(texts("a\r\nb\r\n\r\nc\r\n"), vec!["a\r\nb", "c"]);
    }

    #[test]
    fn block_positions() {
        let blocks = split_blocks("\nfirst\n\nsecond\nmore\n\n\nthird");
        let positions: Vec<(usize, usize)> = blocks.iter().map(|b| (b.index, b.line)).collect();
        assert_eq!(positions, vec![(0, 2), (1, 4), (2, 8)]);
    }

    #[test]
    fn surrounding_whitespace_trimmed() {
        assert_eq!(texts("   indented line   \n\n"), vec!["indented line"]);
    }
}
