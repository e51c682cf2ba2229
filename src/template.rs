//! Positional string templates for measure names, expressions, and
//! descriptions.
//!
//! Templates use `{0}`, `{1}`, … placeholders that are substituted from an
//! ordered argument list. `{{` and `}}` escape literal braces, which matters
//! because DAX format strings can contain braces of their own.

use thiserror::Error;

/// Result type for template rendering.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors raised while rendering a template.
///
/// These are programmer errors: templates are defined at configuration time,
/// not derived from model data, so a failure here is fatal rather than
/// something a run recovers from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// A placeholder referenced an argument index past the end of the list.
    #[error("template references argument {index} but only {provided} argument(s) were provided")]
    IndexOutOfRange { index: usize, provided: usize },

    /// An opening brace was never closed, or the placeholder was not a number.
    #[error("malformed placeholder at byte {position} in template '{template}'")]
    Malformed { template: String, position: usize },
}

/// Render `template`, substituting `{N}` with `args[N]`.
///
/// Pure and deterministic; the same inputs always produce the same output.
pub fn render(template: &str, args: &[&str]) -> TemplateResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some(&(_, '{')) = chars.peek() {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut digits = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        c if c.is_ascii_digit() => digits.push(c),
                        _ => {
                            return Err(TemplateError::Malformed {
                                template: template.to_string(),
                                position: pos,
                            })
                        }
                    }
                }
                if !closed || digits.is_empty() {
                    return Err(TemplateError::Malformed {
                        template: template.to_string(),
                        position: pos,
                    });
                }
                let index: usize = digits.parse().map_err(|_| TemplateError::Malformed {
                    template: template.to_string(),
                    position: pos,
                })?;
                match args.get(index) {
                    Some(arg) => out.push_str(arg),
                    None => {
                        return Err(TemplateError::IndexOutOfRange {
                            index,
                            provided: args.len(),
                        })
                    }
                }
            }
            '}' => {
                if let Some(&(_, '}')) = chars.peek() {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::Malformed {
                        template: template.to_string(),
                        position: pos,
                    });
                }
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
