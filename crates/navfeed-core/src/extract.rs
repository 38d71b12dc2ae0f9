//! NAV extraction from semi-structured fund-page HTML.
//!
//! The origin's markup drifts between deployments, so extraction is an
//! ordered chain of patterns from most to least specific. Each extractor
//! takes the raw page text and returns the first NAV candidate that parses
//! as a positive decimal; the chain stops at the first hit.
//!
//! 1. Element tagged with the `NetAssetValue` identifier.
//! 2. "Net Asset Value" phrase inside the fund-overview panel.
//! 3. "Net Asset Value" phrase anywhere on the page, tight window.

/// Marker for the element carrying the NAV figure.
const NAV_ELEMENT_ID: &str = "netassetvalue";
/// Marker for the fund-overview content panel.
const PANEL_MARKER: &str = "fund-overview";
const NAV_PHRASE: &str = "net asset value";

/// Dollar amount must appear this close after the tagged element.
const ELEMENT_WINDOW: usize = 64;
/// Search window after the phrase inside the overview panel.
const PANEL_WINDOW: usize = 300;
/// Tighter window for the whole-page fallback.
const PAGE_WINDOW: usize = 120;

type Extractor = fn(&str) -> Option<f64>;

const EXTRACTORS: [Extractor; 3] = [tagged_element, overview_panel, whole_page];

/// Run the extraction chain over fetched page text.
pub fn extract_nav(html: &str) -> Option<f64> {
    EXTRACTORS.iter().find_map(|extract| extract(html))
}

fn tagged_element(html: &str) -> Option<f64> {
    let lower = html.to_ascii_lowercase();
    let at = lower.find(NAV_ELEMENT_ID)?;
    // Skip past the rest of the opening tag before looking for the figure.
    let after_tag = at + lower[at..].find('>').map(|i| i + 1)?;
    dollar_amount_within(html, after_tag, ELEMENT_WINDOW)
}

fn overview_panel(html: &str) -> Option<f64> {
    let lower = html.to_ascii_lowercase();
    let panel_start = lower.find(PANEL_MARKER)?;
    let phrase = lower[panel_start..].find(NAV_PHRASE)?;
    let after_phrase = panel_start + phrase + NAV_PHRASE.len();
    dollar_amount_within(html, after_phrase, PANEL_WINDOW)
}

fn whole_page(html: &str) -> Option<f64> {
    let lower = html.to_ascii_lowercase();
    let phrase = lower.find(NAV_PHRASE)?;
    dollar_amount_within(html, phrase + NAV_PHRASE.len(), PAGE_WINDOW)
}

/// Find a `$`-prefixed amount starting within `window` bytes of `from` and
/// parse it. Returns `None` unless the amount is a finite positive decimal,
/// so a zero placeholder falls through to the next pattern.
fn dollar_amount_within(html: &str, from: usize, window: usize) -> Option<f64> {
    if from >= html.len() {
        return None;
    }
    let end = (from + window).min(html.len());
    // Clamp to a char boundary; markers and digits are all ASCII but the
    // surrounding copy may not be.
    let end = (from..=end).rev().find(|&i| html.is_char_boundary(i))?;
    let slice = &html[from..end];

    // A `$` can be decorative ("$ USD"); keep scanning until one is
    // followed by a parseable amount.
    slice
        .match_indices('$')
        .find_map(|(dollar, _)| parse_dollar_amount(&slice[dollar + 1..]))
}

/// Parse the leading decimal after a `$`, tolerating thousands separators.
fn parse_dollar_amount(text: &str) -> Option<f64> {
    let raw: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();

    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
