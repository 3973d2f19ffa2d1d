/// Indentation used per nesting level.
const INDENT: &str = "  ";

/// Pretty-prints a compact query document.
///
/// Every `{` ends its line and indents the following lines by two spaces;
/// every `}` closes on its own line at the parent's indentation. Commas
/// outside parentheses separate sibling selections and become line breaks.
/// Anything else, including argument lists, is copied unchanged.
#[must_use]
pub fn format_document(compact: &str) -> String {
    let mut out = String::with_capacity(compact.len() * 2);
    let mut depth: usize = 0;
    let mut parens: usize = 0;

    for ch in compact.chars() {
        match ch {
            '(' => {
                parens += 1;
                out.push(ch);
            }
            ')' => {
                parens = parens.saturating_sub(1);
                out.push(ch);
            }
            '{' if parens == 0 => {
                depth += 1;
                out.push_str(" {\n");
                push_indent(&mut out, depth);
            }
            '}' if parens == 0 => {
                depth = depth.saturating_sub(1);
                out.push('\n');
                push_indent(&mut out, depth);
                out.push('}');
            }
            ',' if parens == 0 => {
                out.push('\n');
                push_indent(&mut out, depth);
            }
            _ => out.push(ch),
        }
    }

    out
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
