// Attainment donut contract: how much of the ring is filled, which colour it
// takes and what the centre says. Pixel layout is the renderer's business.
use crate::types::{ColorState, DisplayMode, DonutSpec, IndustrySummary};
use crate::util::format_number;

/// Centre label in percent mode. The ratio is clamped to [0, 1] first, so an
/// industry at 120% still reads "100%".
pub fn percent_label(ratio: f64) -> String {
    let clamped = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    format!("{}%", (clamped * 100.0).floor() as i64)
}

/// Centre label in value mode: realized value in thousands, e.g. "R$ 1.2k".
pub fn value_label(realized: f64) -> String {
    format!("R$ {}k", format_number(realized / 1000.0, 1))
}

pub fn donut_spec(summary: &IndustrySummary, mode: DisplayMode) -> DonutSpec {
    let realized = summary.realized_value;
    let target = summary.annual_value_target;
    let ratio = summary.attainment_ratio;
    // Colour uses the raw ratio; only the percent label is clamped.
    let color_state = if ratio >= 1.0 {
        ColorState::OnTarget
    } else {
        ColorState::BelowTarget
    };
    let center_label = match mode {
        DisplayMode::Percent => percent_label(ratio),
        DisplayMode::Value => value_label(realized),
    };
    DonutSpec {
        industry: summary.industry.clone(),
        realized,
        target,
        remaining: (target - realized).max(0.0),
        ratio,
        color_state,
        center_label,
    }
}

pub fn donut_specs(summaries: &[IndustrySummary], mode: DisplayMode) -> Vec<DonutSpec> {
    summaries.iter().map(|s| donut_spec(s, mode)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(realized: f64, target: f64, ratio: f64) -> IndustrySummary {
        IndustrySummary {
            industry: "A".to_string(),
            realized_value: realized,
            annual_value_target: target,
            attainment_ratio: ratio,
        }
    }

    #[test]
    fn over_target_is_clamped_in_label_only() {
        let s = summary(1200.0, 1000.0, 1.2);
        let d = donut_spec(&s, DisplayMode::Percent);
        assert_eq!(d.ratio, 1.2);
        assert_eq!(d.color_state, ColorState::OnTarget);
        assert_eq!(d.remaining, 0.0);
        assert_eq!(d.center_label, "100%");

        let v = donut_spec(&s, DisplayMode::Value);
        assert_eq!(v.center_label, "R$ 1.2k");
    }

    #[test]
    fn below_target() {
        let d = donut_spec(&summary(800.0, 1000.0, 0.8), DisplayMode::Percent);
        assert_eq!(d.color_state, ColorState::BelowTarget);
        assert_eq!(d.remaining, 200.0);
        assert_eq!(d.center_label, "80%");
    }

    #[test]
    fn percent_label_floors() {
        assert_eq!(percent_label(0.999), "99%");
        assert_eq!(percent_label(0.0), "0%");
        assert_eq!(percent_label(1.0), "100%");
    }

    #[test]
    fn missing_target_reads_zero() {
        let d = donut_spec(&summary(50.0, 0.0, 0.0), DisplayMode::Percent);
        assert_eq!(d.remaining, 0.0);
        assert_eq!(d.color_state, ColorState::BelowTarget);
        assert_eq!(d.center_label, "0%");
        assert_eq!(donut_spec(&summary(1_234_567.0, 0.0, 0.0), DisplayMode::Value).center_label, "R$ 1,234.6k");
    }
}
