// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::env;
use std::fs;
use std::path::Path;

pub const FALLBACK_TIMEZONE: &str = "UTC";

/// The IANA timezone identifier of the local user, or `UTC` when it cannot be resolved.
pub fn client_timezone() -> String {
    resolve_timezone(
        env::var("TZ").ok().as_deref(),
        fs::read_to_string("/etc/timezone").ok().as_deref(),
        fs::read_link("/etc/localtime").ok().as_deref(),
    )
}

fn resolve_timezone(
    tz_env: Option<&str>,
    etc_timezone: Option<&str>,
    localtime_target: Option<&Path>,
) -> String {
    if let Some(zone) = tz_env.and_then(zone_from_tz_var) {
        return zone;
    }
    if let Some(zone) = etc_timezone
        .map(str::trim)
        .filter(|zone| is_iana_name(zone))
    {
        return zone.to_owned();
    }
    if let Some(zone) = localtime_target.and_then(zone_from_zoneinfo_path) {
        return zone;
    }
    FALLBACK_TIMEZONE.to_owned()
}

fn zone_from_tz_var(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches(':');
    if let Some(zone) = zone_from_zoneinfo_path(Path::new(trimmed)) {
        return Some(zone);
    }
    is_iana_name(trimmed).then(|| trimmed.to_owned())
}

fn zone_from_zoneinfo_path(path: &Path) -> Option<String> {
    let text = path.to_str()?;
    let (_, zone) = text.split_once("zoneinfo/")?;
    is_iana_name(zone).then(|| zone.to_owned())
}

fn is_iana_name(value: &str) -> bool {
    if value == FALLBACK_TIMEZONE {
        return true;
    }
    !value.is_empty()
        && value.contains('/')
        && !value.starts_with('/')
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '/' | '_' | '-' | '+'))
}
