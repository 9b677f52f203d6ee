/// Escapes HTML reserved characters for chat messages sent with
/// `parse_mode=HTML` (the bot API's own formatting markup, see
/// [`format_report_message`], uses `<b>`/`<a>` tags it must not itself
/// escape — this only guards user-supplied field values).
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Convenience wrapper over [`format_report_message`] for a resolved
/// [`Report`](freifahren_core::Report): takes the report's first line (a
/// report mentioning several lines still only narrates one notification).
pub fn format_report(
    report: &freifahren_core::Report,
    station_name: Option<&str>,
    direction_name: Option<&str>,
    message: Option<&str>,
    mini_app_public_url: &str,
) -> String {
    format_report_message(
        station_name,
        report.lines.first().map(|l| l.as_str()),
        direction_name,
        message,
        report.station_id.as_ref().map(|s| s.as_str()),
        mini_app_public_url,
    )
}

/// Builds the `/report-inspector` notification body: `Station` always
/// present, `Line`/`Richtung` only if known, and a link back to the
/// mini-app's station view.
pub fn format_report_message(
    station_name: Option<&str>,
    line: Option<&str>,
    direction_name: Option<&str>,
    message: Option<&str>,
    station_id: Option<&str>,
    mini_app_public_url: &str,
) -> String {
    let mut text = format!(
        "\n<b>Station</b>: {}",
        escape_html(station_name.unwrap_or("unbekannt"))
    );
    if let Some(line) = line {
        text.push_str(&format!("\n<b>Line</b>: {}", escape_html(line)));
    }
    if let Some(direction) = direction_name {
        text.push_str(&format!("\n<b>Richtung</b>: {}", escape_html(direction)));
    }

    let station_url = match station_id {
        Some(id) => format!("{mini_app_public_url}/station/{id}"),
        None => mini_app_public_url.to_string(),
    };
    if message.is_some() {
        text.push_str(&format!(
            "\n<b>Beschreibung</b>: hier einsehbar <a href='{station_url}'>app.freifahren.org</a>"
        ));
    } else {
        text.push_str(&format!(
            "\n\nMehr Informationen auf <a href='{station_url}'>app.freifahren.org</a>"
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use freifahren_core::{LineId, Report, StationId};

    #[test]
    fn format_report_uses_first_line_of_multiple() {
        let report = Report {
            station_id: Some(StationId::new("hermannplatz")),
            timestamp: Utc::now(),
            direction_id: Some(StationId::new("wittenau")),
            lines: vec![LineId::new("U8"), LineId::new("U7")],
        };
        let msg = format_report(&report, Some("Hermannplatz"), Some("Wittenau"), None, "https://app.freifahren.org");
        assert!(msg.contains("<b>Line</b>: U8"));
        assert!(!msg.contains("U7"));
    }

    #[test]
    fn escapes_html_reserved_chars() {
        assert_eq!(escape_html("<script>&"), "&lt;script&gt;&amp;");
    }

    #[test]
    fn omits_line_and_direction_when_unknown() {
        let msg = format_report_message(
            Some("Hermannplatz"),
            None,
            None,
            None,
            Some("hermannplatz"),
            "https://app.freifahren.org",
        );
        assert!(msg.contains("Station"));
        assert!(!msg.contains("Line"));
        assert!(!msg.contains("Richtung"));
    }

    #[test]
    fn includes_line_and_direction_when_known() {
        let msg = format_report_message(
            Some("Hermannplatz"),
            Some("U8"),
            Some("Wittenau"),
            None,
            Some("hermannplatz"),
            "https://app.freifahren.org",
        );
        assert!(msg.contains("<b>Line</b>: U8"));
        assert!(msg.contains("<b>Richtung</b>: Wittenau"));
    }
}
