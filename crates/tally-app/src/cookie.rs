// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const CSRF_COOKIE: &str = "csrftoken";

/// Returns the decoded value of cookie `name` from a `document.cookie` style string.
///
/// Pairs are split on `;` and matched on an exact `name=` prefix, so a cookie whose name
/// merely ends with `name` never matches.
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }

    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(percent_decode)
}

/// Decodes `%XX` escapes the way `decodeURIComponent` does, leaving `+` alone. Escapes that
/// are malformed, or decode to invalid UTF-8, are kept verbatim.
pub fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%'
            && index + 2 < bytes.len()
            && let (Some(high), Some(low)) =
                (hex_value(bytes[index + 1]), hex_value(bytes[index + 2]))
        {
            decoded.push(high * 16 + low);
            index += 3;
            continue;
        }
        decoded.push(bytes[index]);
        index += 1;
    }

    match String::from_utf8(decoded) {
        Ok(value) => value,
        Err(_) => raw.to_owned(),
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
