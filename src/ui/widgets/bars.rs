//! Inline horizontal bars for distribution rows

const EIGHTHS: [char; 8] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// A bar `width` cells wide at full scale, filled in eighth-cell steps.
/// Any non-zero value gets at least a sliver.
pub fn bar_text(value: f64, max: f64, width: usize) -> String {
    if width == 0 || value <= 0.0 || max <= 0.0 {
        return String::new();
    }

    let ratio = (value / max).min(1.0);
    let eighths = ((ratio * width as f64 * 8.0).round() as usize).max(1);
    let full = eighths / 8;
    let rest = eighths % 8;

    let mut bar = "█".repeat(full);
    if rest > 0 {
        bar.push(EIGHTHS[rest - 1]);
    }
    bar
}
