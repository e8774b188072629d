//! HTML digest rendering.

use chrono::NaiveDate;
use digest_core::types::{AssetClass, Evaluation, Signal};
use serde::Serialize;

/// One evaluated asset in a digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestEntry {
    pub name: String,
    pub class: AssetClass,
    pub evaluation: Evaluation,
}

/// An asset left out of the digest and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAsset {
    pub symbol: String,
    pub name: String,
    pub class: AssetClass,
    pub reason: String,
}

/// Everything one rendered digest shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestContext {
    pub date: NaiveDate,
    pub title: String,
    /// Subscriber topics, shown in the header only
    pub topics: Vec<String>,
    pub entries: Vec<DigestEntry>,
    pub skipped: Vec<SkippedAsset>,
}

impl DigestContext {
    pub fn new(date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            date,
            title: title.into(),
            topics: Vec::new(),
            entries: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Copy keeping only the asset classes a subscriber asked for.
    pub fn for_subscriber(&self, topics: &[String], include: impl Fn(AssetClass) -> bool) -> Self {
        Self {
            date: self.date,
            title: self.title.clone(),
            topics: topics.to_vec(),
            entries: self
                .entries
                .iter()
                .filter(|e| include(e.class))
                .cloned()
                .collect(),
            skipped: self
                .skipped
                .iter()
                .filter(|s| include(s.class))
                .cloned()
                .collect(),
        }
    }

    /// Number of entries with the given signal.
    pub fn count(&self, signal: Signal) -> usize {
        self.entries
            .iter()
            .filter(|e| e.evaluation.signal() == signal)
            .count()
    }
}

/// Render a digest as a standalone HTML document.
///
/// Rows are ordered by signal strength, then symbol. Numbers are rounded to
/// two decimals here and nowhere else.
pub fn render_digest(ctx: &DigestContext) -> String {
    let mut html = String::with_capacity(4096 + ctx.entries.len() * 512);
    let title = escape(&ctx.title);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(concat!(
        "<style>",
        "body{font-family:Arial,sans-serif;color:#212121}",
        "table{border-collapse:collapse;width:100%}",
        "th,td{padding:6px 8px;border-bottom:1px solid #e0e0e0;text-align:left}",
        ".badge{color:#fff;padding:2px 8px;border-radius:4px;font-weight:bold;white-space:nowrap}",
        ".rationale{font-size:12px;color:#616161}",
        "</style>\n</head>\n<body>\n"
    ));

    html.push_str(&format!("<h1>{}</h1>\n", title));
    html.push_str(&format!("<p class=\"date\">{}</p>\n", ctx.date.format("%A, %B %-d, %Y")));
    if !ctx.topics.is_empty() {
        let topics: Vec<String> = ctx.topics.iter().map(|t| escape(t)).collect();
        html.push_str(&format!("<p class=\"topics\">Topics: {}</p>\n", topics.join(", ")));
    }

    render_summary(&mut html, ctx);
    render_table(&mut html, ctx);
    render_skipped(&mut html, ctx);

    html.push_str(
        "<p class=\"rationale\">Signals are computed from daily technical indicators and are not investment advice.</p>\n",
    );
    html.push_str("</body>\n</html>\n");
    html
}

fn render_summary(html: &mut String, ctx: &DigestContext) {
    let counts: Vec<String> = Signal::ALL
        .iter()
        .filter(|s| s.is_determinate())
        .map(|&s| (s, ctx.count(s)))
        .filter(|(_, n)| *n > 0)
        .map(|(s, n)| format!("{} {}", badge(s), n))
        .collect();
    if !counts.is_empty() {
        html.push_str(&format!("<p class=\"summary\">{}</p>\n", counts.join(" ")));
    }
}

fn render_table(html: &mut String, ctx: &DigestContext) {
    if ctx.entries.is_empty() {
        html.push_str("<p>No evaluations available today.</p>\n");
        return;
    }

    let mut entries: Vec<&DigestEntry> = ctx.entries.iter().collect();
    entries.sort_by(|a, b| {
        a.evaluation
            .signal()
            .cmp(&b.evaluation.signal())
            .then_with(|| a.evaluation.symbol.cmp(&b.evaluation.symbol))
    });

    html.push_str(concat!(
        "<table>\n<tr><th>Symbol</th><th>Name</th><th>Price</th><th>SMA short</th>",
        "<th>SMA long</th><th>RSI</th><th>ADX</th><th>OBV</th><th>Signal</th>",
        "<th>Rationale</th></tr>\n"
    ));

    for entry in entries {
        let eval = &entry.evaluation;
        let ind = &eval.indicators;
        let synthetic = if eval.synthetic {
            " <em>(synthetic)</em>"
        } else {
            ""
        };
        let obv = ind
            .obv_trend
            .map(|t| t.to_string())
            .unwrap_or_else(|| "n/a".to_string());

        html.push_str(&format!(
            concat!(
                "<tr><td><strong>{}</strong>{}</td><td>{}</td><td>{:.2}</td>",
                "<td>{} <small>SMA{}</small></td><td>{} <small>SMA{}</small></td>",
                "<td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                "<td class=\"rationale\">{}</td></tr>\n"
            ),
            escape(&eval.symbol),
            synthetic,
            escape(&entry.name),
            eval.price,
            number(ind.sma_short),
            ind.sma_windows.short,
            number(ind.sma_long),
            ind.sma_windows.long,
            number(ind.rsi),
            number(ind.adx),
            obv,
            badge(eval.signal()),
            escape(&eval.classification.summary()),
        ));
    }

    html.push_str("</table>\n");
}

fn render_skipped(html: &mut String, ctx: &DigestContext) {
    if ctx.skipped.is_empty() {
        return;
    }

    html.push_str("<h2>Skipped</h2>\n<ul class=\"skipped\">\n");
    for skipped in &ctx.skipped {
        html.push_str(&format!(
            "<li><strong>{}</strong> ({}): {}</li>\n",
            escape(&skipped.symbol),
            escape(&skipped.name),
            escape(&skipped.reason)
        ));
    }
    html.push_str("</ul>\n");
}

fn badge(signal: Signal) -> String {
    format!(
        "<span class=\"badge\" style=\"background:{}\">{}</span>",
        signal.color(),
        signal.label()
    )
}

fn number(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
