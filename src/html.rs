//! Low-level markup helpers tailored to the portal's page structure.
//!
//! The portal serves semi-structured ASP.NET markup; the only structural
//! assumptions made anywhere in this crate are the ones these helpers
//! cover: hidden `<input>` fields addressable by name, `<td>` cells
//! enumerable in document order, and a badge `<span>` addressable by its
//! class attribute. Deliberately naive string scanning, case-insensitive
//! on ASCII tag and attribute names.

/// Value of a hidden `<input name="..." value="...">` field, by name.
///
/// Returns `None` if no input with that name exists. An input present
/// without a `value` attribute yields an empty string.
pub fn hidden_input_value(markup: &str, name: &str) -> Option<String> {
    let lower = ascii_lowercase(markup);
    let mut from = 0;
    while let Some(rel) = lower[from..].find("<input") {
        let start = from + rel;
        let end = match markup[start..].find('>') {
            Some(i) => start + i,
            None => return None,
        };
        let tag = &markup[start..end];
        if attr_value(tag, "name").is_some_and(|n| n == name) {
            return Some(attr_value(tag, "value").unwrap_or_default().to_string());
        }
        from = end + 1;
    }
    None
}

/// Inner fragments of every `<td>...</td>` block, in document order.
///
/// Nested tables are not a portal structure and are not handled; a `<td>`
/// missing its closing tag ends the enumeration.
pub fn table_cells(markup: &str) -> Vec<&str> {
    let lower = ascii_lowercase(markup);
    let mut cells = Vec::new();
    let mut from = 0;
    while let Some(rel) = lower[from..].find("<td") {
        let start = from + rel;
        let open_end = match markup[start..].find('>') {
            Some(i) => start + i + 1,
            None => break,
        };
        let close = match lower[open_end..].find("</td") {
            Some(i) => open_end + i,
            None => break,
        };
        cells.push(&markup[open_end..close]);
        from = close + "</td".len();
    }
    cells
}

/// Inner content of the first `<tag>` in `fragment` whose `class`
/// attribute equals `class` exactly.
pub fn element_with_class<'a>(fragment: &'a str, tag: &str, class: &str) -> Option<&'a str> {
    let lower = ascii_lowercase(fragment);
    let open_pat = format!("<{tag}");
    let close_pat = format!("</{tag}");
    let mut from = 0;
    while let Some(rel) = lower[from..].find(&open_pat) {
        let start = from + rel;
        let open_end = fragment[start..].find('>')? + start + 1;
        let tag_src = &fragment[start..open_end - 1];
        if attr_value(tag_src, "class").is_some_and(|c| c == class) {
            let close = lower[open_end..].find(&close_pat)? + open_end;
            return Some(&fragment[open_end..close]);
        }
        from = open_end;
    }
    None
}

/// Flattened visible text of a markup fragment: tags stripped, the
/// entities the portal actually emits decoded, whitespace collapsed.
pub fn visible_text(fragment: &str) -> String {
    let mut stripped = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }
    let decoded = stripped.replace("&nbsp;", " ").replace("&amp;", "&");
    collapse_whitespace(&decoded)
}

/// Attribute value from the source of a single opening tag, handling
/// double-quoted, single-quoted and bare values.
fn attr_value<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let lower = ascii_lowercase(tag);
    let pat = format!("{attr}=");
    let mut from = 0;
    while let Some(rel) = lower[from..].find(&pat) {
        let at = from + rel;
        // Require the attribute name to start on a boundary, so "name="
        // does not match inside "nickname=".
        let boundary = at == 0
            || lower
                .as_bytes()
                .get(at - 1)
                .is_some_and(|b| b.is_ascii_whitespace());
        if !boundary {
            from = at + pat.len();
            continue;
        }
        let rest = &tag[at + pat.len()..];
        return Some(match rest.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let inner = &rest[1..];
                match inner.find(q) {
                    Some(end) => &inner[..end],
                    None => inner,
                }
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                    .unwrap_or(rest.len());
                &rest[..end]
            }
        });
    }
    None
}

/// Collapse whitespace runs into single spaces and trim.
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

fn ascii_lowercase(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}
