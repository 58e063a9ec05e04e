//! Sexagesimal coordinate parsing
//!
//! Catalog coordinates arrive as strings: right ascension in hour angle
//! (`"05:34:31.94"`, `"5 34 31.94"`, `"5h34m31.94s"` or decimal hours) and
//! declination in degrees (`"-05:23:28.1"`, `"+22 00 52"`, `"22d00m52s"` or
//! decimal degrees). Both are returned in decimal degrees.

/// Split a sexagesimal string into sign and up to three magnitude components
fn split_components(value: &str) -> Option<(f64, Vec<f64>)> {
    let trimmed = value.trim();
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let parts: Vec<&str> = body
        .split(|c: char| c == ':' || c.is_whitespace() || "hdms°'\"".contains(c))
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut components = Vec::with_capacity(parts.len());
    for part in parts {
        let v: f64 = part.parse().ok()?;
        if !v.is_finite() || v < 0.0 {
            return None;
        }
        components.push(v);
    }

    // minutes and seconds must stay below 60
    if components.iter().skip(1).any(|&v| v >= 60.0) {
        return None;
    }

    Some((sign, components))
}

fn combine(components: &[f64]) -> f64 {
    components
        .iter()
        .enumerate()
        .map(|(i, v)| v / 60f64.powi(i as i32))
        .sum()
}

/// Parse right ascension (hour angle) into degrees in [0, 360)
pub fn parse_ra(value: &str) -> Option<f64> {
    let (sign, components) = split_components(value)?;
    if sign < 0.0 {
        return None;
    }
    let hours = combine(&components);
    if hours >= 24.0 {
        return None;
    }
    Some(hours * 15.0)
}

/// Parse declination into degrees in [-90, 90]
pub fn parse_dec(value: &str) -> Option<f64> {
    let (sign, components) = split_components(value)?;
    let deg = sign * combine(&components);
    if !(-90.0..=90.0).contains(&deg) {
        return None;
    }
    Some(deg)
}
