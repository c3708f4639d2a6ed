//! Feedback rendering — classifies raw evaluator output into a display tree.
//!
//! The evaluator returns loosely-structured text. Each non-blank line becomes
//! one of three block kinds, in classification order:
//!
//! 1. `* **<label>:** <rest>` — a labeled entry. Emitted as a standalone item
//!    outside any bullet list (it flushes a pending bullet run first). The
//!    frontend has always rendered these as bare list items alongside generic
//!    bullets rather than inside a nested list; that behavior is intentional
//!    parity, not something to normalize away.
//! 2. `* <text>` — a plain bullet, accumulated into a run and flushed as one
//!    `Bullets` block when a non-bullet non-blank line or end-of-input is hit.
//! 3. Anything else non-blank — a standalone paragraph (flushes a pending run).
//!
//! Blank lines are dropped entirely and do NOT flush a pending bullet run.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackBlock {
    Labeled { label: String, text: String },
    Bullets { items: Vec<String> },
    Paragraph { text: String },
}

/// Matches the exact labeled shape `* **<label>:** <rest>` with a non-empty
/// label and non-empty rest. The label is the shortest prefix ending at a
/// `:** ` separator, mirroring a lazy `(.+?)` match.
fn match_labeled(line: &str) -> Option<(String, String)> {
    let body = line.strip_prefix("* **")?;
    let mut from = 0;
    while let Some(pos) = body[from..].find(":** ") {
        let at = from + pos;
        let label = &body[..at];
        let rest = &body[at + 4..];
        if !label.is_empty() && !rest.is_empty() {
            return Some((label.to_string(), rest.to_string()));
        }
        from = at + 1;
    }
    None
}

fn flush(blocks: &mut Vec<FeedbackBlock>, pending: &mut Vec<String>) {
    if !pending.is_empty() {
        blocks.push(FeedbackBlock::Bullets {
            items: std::mem::take(pending),
        });
    }
}

/// Parses evaluator feedback into display blocks. Explicit two-state loop
/// (idle / accumulating-bullets) with `pending` as the run buffer.
pub fn parse_feedback(feedback: &str) -> Vec<FeedbackBlock> {
    let mut blocks = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for line in feedback.split('\n') {
        if let Some((label, text)) = match_labeled(line) {
            flush(&mut blocks, &mut pending);
            blocks.push(FeedbackBlock::Labeled { label, text });
            continue;
        }
        if let Some(item) = line.strip_prefix("* ") {
            pending.push(item.to_string());
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        flush(&mut blocks, &mut pending);
        blocks.push(FeedbackBlock::Paragraph {
            text: line.to_string(),
        });
    }
    flush(&mut blocks, &mut pending);

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(label: &str, text: &str) -> FeedbackBlock {
        FeedbackBlock::Labeled {
            label: label.to_string(),
            text: text.to_string(),
        }
    }

    fn bullets(items: &[&str]) -> FeedbackBlock {
        FeedbackBlock::Bullets {
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn paragraph(text: &str) -> FeedbackBlock {
        FeedbackBlock::Paragraph {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_mixed_feedback_parses_in_order() {
        let input = "* **Clarity:** Good\n* Add metrics\n* Use action verbs\nOverall solid.";
        let parsed = parse_feedback(input);
        assert_eq!(
            parsed,
            vec![
                labeled("Clarity", "Good"),
                bullets(&["Add metrics", "Use action verbs"]),
                paragraph("Overall solid."),
            ]
        );
    }

    #[test]
    fn test_blank_line_does_not_flush_bullet_run() {
        let parsed = parse_feedback("* first\n\n* second\ndone");
        assert_eq!(
            parsed,
            vec![bullets(&["first", "second"]), paragraph("done")]
        );
    }

    #[test]
    fn test_run_flushed_at_end_of_input() {
        let parsed = parse_feedback("intro\n* one\n* two");
        assert_eq!(parsed, vec![paragraph("intro"), bullets(&["one", "two"])]);
    }

    #[test]
    fn test_labeled_line_flushes_pending_run() {
        let parsed = parse_feedback("* plain\n* **Impact:** strong verbs\n* after");
        assert_eq!(
            parsed,
            vec![
                bullets(&["plain"]),
                labeled("Impact", "strong verbs"),
                bullets(&["after"]),
            ]
        );
    }

    #[test]
    fn test_labeled_requires_exact_shape() {
        // Missing trailing text — falls through to the plain bullet branch.
        let parsed = parse_feedback("* **Clarity:**");
        assert_eq!(parsed, vec![bullets(&["**Clarity:**"])]);
        // Empty label is not a labeled entry either.
        let parsed = parse_feedback("* **:** text");
        assert_eq!(parsed, vec![bullets(&["**:** text"])]);
    }

    #[test]
    fn test_label_match_is_lazy() {
        let parsed = parse_feedback("* **Tone:** warm:** not a label");
        assert_eq!(parsed, vec![labeled("Tone", "warm:** not a label")]);
    }

    #[test]
    fn test_blank_lines_dropped_entirely() {
        assert!(parse_feedback("\n\n   \n").is_empty());
    }

    #[test]
    fn test_paragraph_keeps_raw_line() {
        let parsed = parse_feedback("  indented remark");
        assert_eq!(parsed, vec![paragraph("  indented remark")]);
    }

    #[test]
    fn test_bullet_without_space_is_paragraph() {
        let parsed = parse_feedback("*no space");
        assert_eq!(parsed, vec![paragraph("*no space")]);
    }

    #[test]
    fn test_blocks_serialize_tagged() {
        let json = serde_json::to_value(parse_feedback("* **A:** b")).unwrap();
        assert_eq!(json[0]["kind"], "labeled");
        assert_eq!(json[0]["label"], "A");
    }
}
