/// Escapes text for insertion into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Makes server-provided text safe to draw in the terminal: control
/// characters (escape sequences included) are dropped, line breaks and tabs
/// collapse to a space.
pub fn sanitize_terminal(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\n' | '\r' | '\t' => Some(' '),
            ch if ch.is_control() => None,
            ch => Some(ch),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_special_characters_are_escaped() {
        assert_eq!(
            escape_html(r#"<b>"Torre" & 'Parque'</b>"#),
            "&lt;b&gt;&quot;Torre&quot; &amp; &#39;Parque&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Ciudad Jardín"), "Ciudad Jardín");
    }

    #[test]
    fn terminal_text_loses_escape_sequences() {
        assert_eq!(sanitize_terminal("Torre\u{1b}[31m A\nB"), "Torre[31m A B");
    }
}
