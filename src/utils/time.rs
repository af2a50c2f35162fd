/// Format seconds as MM:SS.mmm, or HH:MM:SS.mmm past the hour
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let total_seconds = seconds.floor() as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    let millis = (((seconds - seconds.floor()) * 1000.0).round() as u64).min(999);

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    }
}

/// Ruler label: whole seconds as M:SS
pub fn format_marker_label(seconds: f64) -> String {
    let total = (seconds.max(0.0) + 1e-9).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Parse time string (HH:MM:SS.mmm or MM:SS.mmm or SS.mmm) to seconds
pub fn parse_time(time_str: &str) -> Option<f64> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();

    let seconds = match parts.len() {
        1 => parts[0].parse::<f64>().ok()?,
        2 => {
            let minutes: f64 = parts[0].parse().ok()?;
            let seconds: f64 = parts[1].parse().ok()?;
            minutes * 60.0 + seconds
        }
        3 => {
            let hours: f64 = parts[0].parse().ok()?;
            let minutes: f64 = parts[1].parse().ok()?;
            let seconds: f64 = parts[2].parse().ok()?;
            hours * 3600.0 + minutes * 60.0 + seconds
        }
        _ => return None,
    };

    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00.000");
        assert_eq!(format_time(65.5), "01:05.500");
        assert_eq!(format_time(3661.25), "01:01:01.250");
        assert_eq!(format_time(-3.0), "00:00.000");
    }

    #[test]
    fn test_format_marker_label() {
        assert_eq!(format_marker_label(0.0), "0:00");
        assert_eq!(format_marker_label(5.0), "0:05");
        assert_eq!(format_marker_label(45.0), "0:45");
        assert_eq!(format_marker_label(150.0), "2:30");
        assert_eq!(format_marker_label(599.9999999999), "10:00");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("30"), Some(30.0));
        assert_eq!(parse_time("1:30"), Some(90.0));
        assert_eq!(parse_time("1:01:30"), Some(3690.0));
        assert_eq!(parse_time(" 00:02.500 "), Some(2.5));
        assert_eq!(parse_time("-4"), None);
        assert_eq!(parse_time("abc"), None);
        assert_eq!(parse_time("1:2:3:4"), None);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }
}
