//! Line-oriented structural diff
//!
//! Produces a differ-style rendering of two pretty-printed canonical
//! forms: unchanged lines prefixed `  `, lines only on the left `- `,
//! lines only on the right `+ `. Alignment is a longest-common-subsequence
//! over lines, so the output is stable for a given input pair and the
//! first differing field is easy to localize.

/// Diff two texts line by line
///
/// Returns the full annotated listing. Deterministic: identical inputs
/// always produce identical output, and equal texts produce only
/// context-prefixed lines.
#[must_use]
pub fn diff_lines(left: &str, right: &str) -> String {
    let a: Vec<&str> = left.lines().collect();
    let b: Vec<&str> = right.lines().collect();
    let table = lcs_table(&a, &b);

    let mut out = String::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            push_line(&mut out, "  ", a[i]);
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            push_line(&mut out, "- ", a[i]);
            i += 1;
        } else {
            push_line(&mut out, "+ ", b[j]);
            j += 1;
        }
    }
    for line in &a[i..] {
        push_line(&mut out, "- ", line);
    }
    for line in &b[j..] {
        push_line(&mut out, "+ ", line);
    }
    out
}

fn push_line(out: &mut String, prefix: &str, line: &str) {
    out.push_str(prefix);
    out.push_str(line);
    out.push('\n');
}

/// `table[i][j]` = length of the LCS of `a[i..]` and `b[j..]`
fn lcs_table(a: &[&str], b: &[&str]) -> Vec<Vec<u32>> {
    let mut table = vec![vec![0u32; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            table[i][j] = if a[i] == b[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn equal_texts_produce_only_context_lines() {
        let text = "{\n  \"a\": 1\n}";
        let diff = diff_lines(text, text);
        assert!(diff.lines().all(|l| l.starts_with("  ")));
    }

    #[test]
    fn changed_line_is_marked_both_ways() {
        let left = "{\n  \"a\": 1,\n  \"b\": 2\n}";
        let right = "{\n  \"a\": 1,\n  \"b\": 3\n}";
        let diff = diff_lines(left, right);

        assert!(diff.contains("- "));
        assert!(diff.contains("+ "));
        assert!(diff.contains("-   \"b\": 2") || diff.contains("- \"b\": 2") || diff.contains("-   \"b\": 2,"));
        assert!(diff.lines().any(|l| l.starts_with("  ") && l.contains("\"a\": 1")));
    }

    #[test]
    fn pure_insertion_only_adds_plus_lines() {
        let left = "a\nc\n";
        let right = "a\nb\nc\n";
        let diff = diff_lines(left, right);
        assert_eq!(diff, "  a\n+ b\n  c\n");
    }

    #[test]
    fn pure_deletion_only_adds_minus_lines() {
        let left = "a\nb\nc\n";
        let right = "a\nc\n";
        let diff = diff_lines(left, right);
        assert_eq!(diff, "  a\n- b\n  c\n");
    }

    #[test]
    fn diff_is_deterministic() {
        let left = "x\ny\nz\n";
        let right = "x\nq\nz\nw\n";
        assert_eq!(diff_lines(left, right), diff_lines(left, right));
    }

    #[test]
    fn first_differing_field_is_localized() {
        let left = "{\n  \"feed\": {\n    \"delay\": 30\n  }\n}";
        let right = "{\n  \"feed\": {\n    \"delay\": 60\n  }\n}";
        let diff = diff_lines(left, right);
        let minus = diff.lines().find(|l| l.starts_with("- ")).unwrap();
        assert!(minus.contains("\"delay\": 30"));
    }
}
