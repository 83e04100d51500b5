use serde_json::Value;

use terminal_size::{terminal_size, Height, Width};

// Render a single JSON record (e.g. /auth/me or /users/profile responses) as
// an ASCII field/value table. Returns true if a table was printed; false
// means the caller should fall back to raw JSON.
pub fn print_record(val: &Value) -> bool {
    // Honor env override to force JSON output
    if std::env::var("NEURONET_OUTPUT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false) {
        return false;
    }
    let Value::Object(_) = val else { return false };

    let mut rows: Vec<Vec<String>> = Vec::new();
    flatten_record("", val, &mut rows);
    if rows.is_empty() {
        return false;
    }
    let cols = vec!["field".to_string(), "value".to_string()];
    print_table(&cols, &rows);
    true
}

// Render a JSON array of objects (e.g. the role/route listing) as a table
// with the union of keys as columns.
pub fn print_records(val: &Value) -> bool {
    if std::env::var("NEURONET_OUTPUT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false) {
        return false;
    }
    let Value::Array(arr) = val else { return false };
    if arr.is_empty() {
        return false;
    }

    // Union of keys across all rows, in first-seen order
    let mut all_keys: Vec<String> = Vec::new();
    for el in arr {
        let Value::Object(map) = el else { return false };
        for k in map.keys() {
            if !all_keys.contains(k) {
                all_keys.push(k.clone());
            }
        }
    }
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(arr.len());
    for el in arr {
        if let Value::Object(map) = el {
            rows.push(all_keys.iter().map(|k| to_cell_string(map.get(k).unwrap_or(&Value::Null))).collect());
        }
    }
    print_table(&all_keys, &rows);
    true
}

fn print_table(cols: &[String], rows: &[Vec<String>]) {
    // Detect terminal width once for this rendering
    let termw = get_terminal_width();
    crate::tprintln!("[cli.outputformatter] detected terminal width={} columns", termw);

    let mut widths: Vec<usize> = cols.iter().map(|s| s.len().min(termw)).collect();
    for r in rows {
        for (i, cell) in r.iter().enumerate().take(cols.len()) {
            let w = cell.chars().count();
            if w > widths[i] {
                widths[i] = w.min(termw);
            }
        }
    }

    let sep = build_separator(&widths);
    println!("{}", sep);
    println!("{}", build_row_header_colored(cols, &widths));
    println!("{}", sep);
    for r in rows {
        println!("{}", build_row(r, &widths));
    }
    println!("{}", sep);
    println!("rows: {}", rows.len());
}

// Nested objects are flattened into dotted field names; string arrays are
// joined for readability.
fn flatten_record(prefix: &str, val: &Value, out: &mut Vec<Vec<String>>) {
    let Value::Object(map) = val else { return };
    for (k, v) in map {
        let name = if prefix.is_empty() { k.clone() } else { format!("{}.{}", prefix, k) };
        match v {
            Value::Object(_) => flatten_record(&name, v, out),
            other => out.push(vec![name, to_cell_string(other)]),
        }
    }
}

fn to_cell_string(v: &Value) -> String {
    match v {
        Value::Null => String::from("NULL"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) if arr.iter().all(|e| e.is_string()) => arr
            .iter()
            .filter_map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let (text, align_right) = (truncate(&cell, *w), is_numeric_like(&cell));
        s.push(' ');
        if align_right {
            let pad = w.saturating_sub(text.chars().count());
            s.push_str(&" ".repeat(pad));
            s.push_str(&text);
        } else {
            s.push_str(&text);
            let pad = w.saturating_sub(text.chars().count());
            s.push_str(&" ".repeat(pad));
        }
        s.push(' ');
        s.push('|');
    }
    s
}

// Header row with column names colored green; padding based on visible width.
fn build_row_header_colored(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let text = truncate(&cell, *w);
        let colored = format!("\x1b[32m{}\x1b[0m", text);
        s.push(' ');
        s.push_str(&colored);
        let pad = w.saturating_sub(text.chars().count());
        s.push_str(&" ".repeat(pad));
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".to_string();
    }
    let take = max - 1;
    s.chars().take(take).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    // crude detection for aligning numbers to the right
    let st = s.trim();
    if st.is_empty() {
        return false;
    }
    let mut has_digit = false;
    for ch in st.chars() {
        if ch.is_ascii_digit() {
            has_digit = true;
            continue;
        }
        if ".-+eE,_".contains(ch) {
            continue;
        }
        return false;
    }
    has_digit
}

fn get_terminal_width() -> usize {
    if let Some((Width(w), Height(_h))) = terminal_size() {
        return w.saturating_sub(4) as usize;
    }
    80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_nests_with_dotted_names() {
        let v = serde_json::json!({
            "id": "u-1",
            "profile": {"full_name": "Ada", "languages": ["en", "fr"]}
        });
        let mut rows = Vec::new();
        flatten_record("", &v, &mut rows);
        assert!(rows.contains(&vec!["profile.full_name".to_string(), "Ada".to_string()]));
        assert!(rows.contains(&vec!["profile.languages".to_string(), "en, fr".to_string()]));
    }

    #[test]
    fn truncate_elides_long_cells() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("ab", 4), "ab");
    }

    #[test]
    fn numeric_alignment_detection() {
        assert!(is_numeric_like("42"));
        assert!(is_numeric_like("-3.5"));
        assert!(!is_numeric_like("buddy"));
        assert!(!is_numeric_like(""));
    }
}
