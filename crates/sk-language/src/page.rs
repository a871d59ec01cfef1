//! Extracts the resolver inputs from a fetched page.

use encoding_rs::Encoding;
use encoding_rs::UTF_8;

/// The HTML prescan only looks this far for a `<meta>` charset.
const META_PRESCAN_BYTES: usize = 1024;

/// Where the encoding of a page body was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    ByteOrderMark,
    ContentType,
    MetaPrescan,
    Default,
}

/// Picks the encoding of a response body.
///
/// A byte order mark wins over the `Content-Type` charset, which wins over a
/// `<meta>` declaration in the head of an HTML body. A `<meta>` declaring
/// UTF-16 means UTF-8, since the prescan could only read it as ASCII.
pub fn sniff_encoding(body: &[u8], content_type: &str) -> (&'static Encoding, EncodingSource) {
    if let Some((encoding, _)) = Encoding::for_bom(body) {
        return (encoding, EncodingSource::ByteOrderMark);
    }

    if let Some(encoding) =
        charset_parameter(content_type).and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return (encoding, EncodingSource::ContentType);
    }

    if is_html(content_type) {
        if let Some(encoding) = meta_prescan(body) {
            return (encoding.output_encoding(), EncodingSource::MetaPrescan);
        }
    }

    (UTF_8, EncodingSource::Default)
}

/// Decodes a response body into the text handed to the classifier.
pub fn decode_page_text(body: &[u8], content_type: &str) -> String {
    let (encoding, source) = sniff_encoding(body, content_type);
    let payload = match source {
        EncodingSource::ByteOrderMark => {
            let bom_len = Encoding::for_bom(body).map_or(0, |(_, len)| len);
            &body[bom_len..]
        }
        _ => body,
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(payload);
    if had_errors {
        log::debug!(
            "page body had malformed {} sequences ({source:?})",
            encoding.name()
        );
    }
    text.into_owned()
}

/// First `Content-Language` value among `headers`.
pub fn content_language(headers: &[(String, String)]) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-language"))
        .map(|(_, value)| value.as_str())
}

/// `lang` attribute of the first `<html>` start tag.
pub fn html_lang_attribute(html: &str) -> Option<String> {
    let attributes = start_tags(html, "html").next()?;
    attributes
        .into_iter()
        .find(|(name, _)| name == "lang")
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn is_html(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.is_empty() || essence == "text/html" || essence == "application/xhtml+xml"
}

/// `charset` declared in `<meta charset>` or `<meta content="...; charset=">`.
fn meta_prescan(body: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&body[..body.len().min(META_PRESCAN_BYTES)]);

    start_tags(&head, "meta").find_map(|attributes| {
        let declared = attributes.iter().find_map(|(name, value)| match name.as_str() {
            "charset" => Some(value.trim()),
            "content" => charset_parameter(value),
            _ => None,
        })?;
        Encoding::for_label(declared.as_bytes())
    })
}

/// Value of a `charset=` parameter, as found in `Content-Type` values.
fn charset_parameter(value: &str) -> Option<&str> {
    let lower = value.to_ascii_lowercase();
    let mut from = 0_usize;

    while let Some(relative) = lower[from..].find("charset") {
        let after_name = from + relative + "charset".len();
        from = after_name;

        let Some(rest) = value[after_name..].trim_start().strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let label = match rest.as_bytes().first() {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let quoted = &rest[1..];
                &quoted[..quoted.find(char::from(quote)).unwrap_or(quoted.len())]
            }
            _ => {
                let end = rest
                    .find(|ch: char| ch == ';' || ch.is_ascii_whitespace())
                    .unwrap_or(rest.len());
                &rest[..end]
            }
        };

        let label = label.trim();
        if !label.is_empty() {
            return Some(label);
        }
    }

    None
}

/// Attribute lists of every `<name ...>` start tag in `html`, in order.
fn start_tags<'a>(html: &'a str, name: &str) -> impl Iterator<Item = Vec<(String, String)>> + 'a {
    let lower = html.to_ascii_lowercase();
    let open = format!("<{name}");
    let mut from = 0_usize;

    std::iter::from_fn(move || {
        loop {
            let relative = lower[from..].find(&open)?;
            let after_name = from + relative + open.len();
            from = after_name;

            let terminated = html[after_name..]
                .chars()
                .next()
                .is_none_or(|ch| ch.is_ascii_whitespace() || ch == '>' || ch == '/');
            if !terminated {
                continue;
            }

            let (attributes, consumed) = parse_attributes(&html[after_name..]);
            from = after_name + consumed;
            return Some(attributes);
        }
    })
}

/// Parses `name=value` pairs up to the `>` closing the tag, returning them
/// with lowercase names and the number of bytes consumed. A `>` inside a
/// quoted value does not close the tag.
fn parse_attributes(input: &str) -> (Vec<(String, String)>, usize) {
    let is_space = |ch: char| ch.is_ascii_whitespace();
    let mut attributes = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(|ch: char| is_space(ch) || ch == '/');
        if rest.is_empty() || rest.starts_with('>') {
            break;
        }

        let name_end = rest
            .find(|ch: char| is_space(ch) || matches!(ch, '=' | '>' | '/'))
            .unwrap_or(rest.len())
            .max(1);
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start_matches(is_space);

        let mut value = String::new();
        if let Some(after_equals) = rest.strip_prefix('=') {
            let after_equals = after_equals.trim_start_matches(is_space);
            match after_equals.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let quoted = &after_equals[1..];
                    let end = quoted.find(quote).unwrap_or(quoted.len());
                    value = quoted[..end].to_owned();
                    rest = quoted.get(end + 1..).unwrap_or_default();
                }
                _ => {
                    let end = after_equals
                        .find(|ch: char| is_space(ch) || ch == '>')
                        .unwrap_or(after_equals.len());
                    value = after_equals[..end].to_owned();
                    rest = &after_equals[end..];
                }
            }
        }
        attributes.push((name, value));
    }

    let consumed = input.len() - rest.len() + usize::from(rest.starts_with('>'));
    (attributes, consumed)
}
