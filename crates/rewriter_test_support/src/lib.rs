pub mod chunking;
pub mod fixtures;

pub use chunking::{BoundaryPolicy, ChunkPlan, deterministic_chunk_plans, random_chunk_plan};
pub use fixtures::{RewriteCase, load_cases, parse_cases};

/// Escape control characters and quotes so a string fits on one line of a
/// failure message.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Describe the first difference between two outputs, line by line, with a
/// little context around it.
pub fn diff_lines(expected: &str, actual: &str) -> String {
    use std::fmt::Write;

    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();
    let max = expected.len().max(actual.len());
    let missing = "<missing>";
    let mut out = String::new();

    let mismatch = (0..max).find(|&i| expected.get(i) != actual.get(i));
    match mismatch {
        Some(i) => {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(max);
            let _ = writeln!(
                &mut out,
                "first mismatch at line {} (showing {}..={}):",
                i + 1,
                start + 1,
                end
            );
            for line_idx in start..end {
                let left = expected.get(line_idx).copied().unwrap_or(missing);
                let right = actual.get(line_idx).copied().unwrap_or(missing);
                let marker = if line_idx == i { ">" } else { " " };
                let _ = writeln!(
                    &mut out,
                    "{marker} {:>4}  expected: \"{}\"",
                    line_idx + 1,
                    escape_text(left)
                );
                let _ = writeln!(
                    &mut out,
                    "{marker} {:>4}    actual: \"{}\"",
                    line_idx + 1,
                    escape_text(right)
                );
            }
        }
        None => {
            let _ = writeln!(&mut out, "outputs differ only in trailing line breaks");
        }
    }
    out
}

/// A synthetic document of `count` repeated blocks, for benchmarks and
/// large-input tests.
pub fn make_blocks(count: usize) -> String {
    let mut out = String::from("<!DOCTYPE html><html><head><title>bench</title></head><body>\n");
    for i in 0..count {
        use std::fmt::Write;
        let _ = write!(
            &mut out,
            "<div class=\"item c{}\" id=\"item-{i}\"><a href=\"http://example.com/{i}\">link {i}</a>\
             <!-- note {i} --><p>Some <b>bold</b> text &amp; more</p><img src=\"/img/{i}.png\"></div>\n",
            i % 7
        );
    }
    out.push_str("<script>if (a < b) { run(\"</div>\"); }</script></body></html>\n");
    out
}
