use crate::error::AppError;
use crate::models::{ReportDocument, ServerRow};

/// Seam over the document templating engine: template bytes in,
/// rendered document bytes out.
pub trait TemplateRenderer {
    fn render(&self, template: &[u8], document: &ReportDocument) -> Result<Vec<u8>, AppError>;
}

/// Tag-substitution renderer for UTF-8 templates.
///
/// Scalar placeholders are written `{date}`, `{startDate}`, `{endDate}`,
/// `{totalEarnings}`. The per-server table expands a one-level section
/// `{#serverDetails}…{/serverDetails}` once per row, with `{index}`,
/// `{vm_name}`, `{minutes}` and `{earnings}` available inside it. A
/// placeholder with no matching payload field is a render error.
pub struct TagRenderer;

const SECTION_NAME: &str = "serverDetails";

fn scalar_value(document: &ReportDocument, key: &str) -> Option<String> {
    match key {
        "date" => Some(document.date.clone()),
        "startDate" => Some(document.start_date.clone()),
        "endDate" => Some(document.end_date.clone()),
        "totalEarnings" => Some(document.total_earnings.clone()),
        _ => None,
    }
}

fn row_value(row: &ServerRow, key: &str) -> Option<String> {
    match key {
        "index" => Some(row.index.to_string()),
        "vm_name" => Some(row.vm_name.clone()),
        "minutes" => Some(row.minutes.to_string()),
        "earnings" => Some(row.earnings.clone()),
        _ => None,
    }
}

fn substitute<F>(text: &str, lookup: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| AppError::Render("unterminated placeholder in template".into()))?;
        let tag = &after[..close];
        if tag.starts_with('#') || tag.starts_with('/') {
            return Err(AppError::Render(format!(
                "section tag '{{{tag}}}' outside of a section (nested sections are not supported)"
            )));
        }
        let value = lookup(tag).ok_or_else(|| {
            AppError::Render(format!(
                "template references unknown placeholder '{{{tag}}}'"
            ))
        })?;
        out.push_str(&value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

impl TemplateRenderer for TagRenderer {
    fn render(&self, template: &[u8], document: &ReportDocument) -> Result<Vec<u8>, AppError> {
        let text = std::str::from_utf8(template)
            .map_err(|_| AppError::Render("template is not valid UTF-8".into()))?;

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("{#") {
            out.push_str(&substitute(&rest[..start], |k| scalar_value(document, k))?);

            let after = &rest[start + 2..];
            let name_end = after.find('}').ok_or_else(|| {
                AppError::Render("unterminated section tag in template".into())
            })?;
            let name = &after[..name_end];
            if name != SECTION_NAME {
                return Err(AppError::Render(format!(
                    "template references unknown section '{{#{name}}}'"
                )));
            }

            let body_and_rest = &after[name_end + 1..];
            let closing = format!("{{/{name}}}");
            let close_pos = body_and_rest.find(&closing).ok_or_else(|| {
                AppError::Render(format!("section '{{#{name}}}' is never closed"))
            })?;
            let body = &body_and_rest[..close_pos];

            for row in &document.rows {
                out.push_str(&substitute(body, |k| {
                    row_value(row, k).or_else(|| scalar_value(document, k))
                })?);
            }
            rest = &body_and_rest[close_pos + closing.len()..];
        }
        out.push_str(&substitute(rest, |k| scalar_value(document, k))?);

        Ok(out.into_bytes())
    }
}
