//! Input decoding helpers.

use std::borrow::Cow;

/// Decode raw HTML bytes to a string.
///
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the `<meta charset>` declaration
/// 3. Falls back to Windows-1252 (superset of ISO-8859-1)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub(crate) fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    // Try UTF-8 first (handles BOM automatically)
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    // If UTF-8 failed, honor the document's own charset declaration
    if let Some(name) = extract_meta_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    // Fallback: Windows-1252 (the usual culprit for legacy exports)
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding name from a `<meta charset>` declaration.
///
/// Handles both forms:
/// - `<meta charset="utf-8">`
/// - `<meta http-equiv="Content-Type" content="text/html; charset=utf-8">`
///
/// Only the first 1024 bytes are scanned, matching the prelude browsers
/// inspect before committing to an encoding.
pub(crate) fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(1024);
    let prefix = &bytes[..check_len];

    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let after = &prefix[pos + 8..];

    if after.is_empty() {
        return None;
    }

    let (value, quote) = match after[0] {
        q @ (b'"' | b'\'') => (&after[1..], Some(q)),
        _ => (after, None),
    };
    let end = value
        .iter()
        .position(|&b| match quote {
            Some(q) => b == q,
            None => matches!(b, b'"' | b'\'' | b'>' | b';') || b.is_ascii_whitespace(),
        })
        .unwrap_or(value.len());

    let name = std::str::from_utf8(&value[..end]).ok()?;
    if name.is_empty() { None } else { Some(name) }
}
