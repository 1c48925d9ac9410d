//! Per-channel display state.
//!
//! Turns upstream frames into tile views. The spectral background is only
//! recomputed when a channel's reading moves by more than the configured
//! threshold, so a laser jittering by a few MHz keeps a stable color.

use chrono::{DateTime, Utc};
use spectrum_color::frequency_to_rgb;

use crate::models::{
    AppConfig, ChannelConfig, ChannelReading, ChannelView, DisplaySnapshot, Frame, CHANNEL_COUNT,
};

struct ChannelSlot {
    config: ChannelConfig,
    /// Reading the current background was computed from
    last_seen: f64,
    view: ChannelView,
}

impl ChannelSlot {
    fn new(config: ChannelConfig) -> Self {
        let view = ChannelView {
            index: config.index,
            label: config.display_label(),
            text: "No data".to_string(),
            power: None,
            background: None,
            color: None,
            reading: ChannelReading::NoData,
        };
        Self {
            config,
            last_seen: 0.0,
            view,
        }
    }

    fn apply(&mut self, reading: ChannelReading, raw: f64, precision: usize, threshold: f64) {
        self.view.reading = reading;

        match reading {
            ChannelReading::Measured { frequency, power } => {
                self.view.text = to_fixed(frequency, precision);
                self.view.power = power
                    .is_finite()
                    .then(|| format!("Power: {} uW", to_fixed(power, precision)));

                if (frequency - self.last_seen).abs() > threshold {
                    self.last_seen = frequency;
                    self.recolor(frequency);
                }
            }
            _ => {
                self.view.text = reading.status_text().unwrap_or("No data").to_string();
                self.view.power = None;
                self.view.background = None;
                self.view.color = None;
                // null readings must not block the next recolor
                self.last_seen = if raw.is_finite() { raw } else { 0.0 };
            }
        }
    }

    fn recolor(&mut self, frequency: f64) {
        if let Some(ref background) = self.config.background {
            self.view.background = Some(background.clone());
            self.view.color = None;
            return;
        }

        match frequency_to_rgb(frequency) {
            Ok(rgb) => {
                self.view.background = Some(rgb.gradient_css());
                self.view.color = Some(rgb.to_hex());
            }
            Err(e) => {
                tracing::warn!(channel = self.config.index, %e, "Cannot color reading");
                self.view.background = None;
                self.view.color = None;
            }
        }
    }
}

/// Format with `digits` decimals, rounding exact halves away from zero
/// (`format!` rounds them to even).
///
/// The decimal expansion of an `f64` ends within 1074 fractional digits,
/// so rounding on that string is exact.
fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = digits.min(1074);
    let exact = format!("{:.1074}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();

    if frac_part.as_bytes().get(digits).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|&d| d as char));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|&d| d as char));
    }
    out
}

/// Display state for all channels, updated frame by frame
pub struct DisplayState {
    precision: usize,
    recolor_threshold: f64,
    slots: Vec<ChannelSlot>,
    updated_at: Option<DateTime<Utc>>,
}

impl DisplayState {
    pub fn new(config: &AppConfig) -> Self {
        let slots = (0..CHANNEL_COUNT)
            .map(|i| {
                let channel = config
                    .channel(i)
                    .cloned()
                    .unwrap_or_else(|| ChannelConfig::numbered(i));
                ChannelSlot::new(channel)
            })
            .collect();

        Self {
            precision: config.precision,
            recolor_threshold: config.recolor_threshold,
            slots,
            updated_at: None,
        }
    }

    /// Apply a frame and return the updated views
    pub fn apply(&mut self, frame: &Frame) -> Vec<ChannelView> {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.apply(
                frame.channel(i),
                frame.readings[i],
                self.precision,
                self.recolor_threshold,
            );
        }
        self.updated_at = Some(frame.received_at);
        self.views()
    }

    /// Current views, ordered by channel index
    pub fn views(&self) -> Vec<ChannelView> {
        self.slots.iter().map(|s| s.view.clone()).collect()
    }

    pub fn snapshot(&self, connected: bool) -> DisplaySnapshot {
        DisplaySnapshot {
            connected,
            precision: self.precision,
            channels: self.views(),
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const F_450NM: f64 = 3.0e8 / 450.0;

    fn frame_with(ch: usize, reading: f64, power: f64) -> Frame {
        let mut readings = [0.0; CHANNEL_COUNT];
        let mut powers = [0.0; CHANNEL_COUNT];
        readings[ch] = reading;
        powers[ch] = power;
        Frame::new(readings, powers)
    }

    #[test]
    fn test_initial_views_show_no_data() {
        let state = DisplayState::new(&AppConfig::default());
        let views = state.views();

        assert_eq!(views.len(), CHANNEL_COUNT);
        assert_eq!(views[0].label, "Ch 1");
        assert_eq!(views[7].label, "Ch 8");
        assert!(views.iter().all(|v| v.text == "No data" && v.background.is_none()));
    }

    #[test]
    fn test_measured_reading_formats_and_colors() {
        let mut state = DisplayState::new(&AppConfig::default());
        let views = state.apply(&frame_with(0, F_450NM, 12.25));

        assert_eq!(views[0].text, "666666.667");
        assert_eq!(views[0].power.as_deref(), Some("Power: 12.250 uW"));
        assert_eq!(views[0].color.as_deref(), Some("#0046ff"));
        assert_eq!(
            views[0].background.as_deref(),
            Some("linear-gradient(135deg, rgb(0, 34, 125) 0%, rgb(0, 70, 255) 100%)")
        );
    }

    #[test]
    fn test_small_changes_keep_background() {
        let mut state = DisplayState::new(&AppConfig::default());
        state.apply(&frame_with(0, F_450NM, 1.0));

        let views = state.apply(&frame_with(0, F_450NM + 0.5, 1.0));
        assert_eq!(views[0].color.as_deref(), Some("#0046ff"));
        assert_eq!(views[0].text, "666667.167");

        // drift accumulates against the colored reading, not the previous frame
        let views = state.apply(&frame_with(0, F_450NM + 0.9, 1.0));
        assert_eq!(views[0].color.as_deref(), Some("#0046ff"));
    }

    #[test]
    fn test_large_change_recolors() {
        let mut state = DisplayState::new(&AppConfig::default());
        state.apply(&frame_with(0, F_450NM, 1.0));
        let views = state.apply(&frame_with(0, 3.0e8 / 700.0, 1.0));
        assert_eq!(views[0].color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_status_readings_reset_background() {
        let mut state = DisplayState::new(&AppConfig::default());
        state.apply(&frame_with(2, F_450NM, 1.0));

        let views = state.apply(&frame_with(2, -3000.0, 0.0));
        assert_eq!(views[2].text, "Underexposed");
        assert_eq!(views[2].power, None);
        assert_eq!(views[2].background, None);

        let views = state.apply(&frame_with(2, -4000.0, 0.0));
        assert_eq!(views[2].text, "Overexposed");

        let views = state.apply(&frame_with(2, 0.0, 0.0));
        assert_eq!(views[2].text, "No data");
        assert_eq!(views[2].reading, ChannelReading::NoData);

        // coming back recolors since the sentinel was remembered
        let views = state.apply(&frame_with(2, F_450NM, 1.0));
        assert_eq!(views[2].color.as_deref(), Some("#0046ff"));
    }

    #[test]
    fn test_null_reading_does_not_block_recolor() {
        let mut state = DisplayState::new(&AppConfig::default());
        let views = state.apply(&frame_with(1, f64::NAN, 0.0));
        assert_eq!(views[1].text, "No data");

        let views = state.apply(&frame_with(1, F_450NM, 1.0));
        assert!(views[1].background.is_some());
    }

    #[test]
    fn test_fixed_background_overrides_spectrum() {
        let mut config = AppConfig::default();
        config.channels[6].background = Some("#123456".to_string());
        let mut state = DisplayState::new(&config);

        let views = state.apply(&frame_with(6, F_450NM, 1.0));
        assert_eq!(views[6].background.as_deref(), Some("#123456"));
        assert_eq!(views[6].color, None);
    }

    #[test]
    fn test_unconfigured_channels_are_tracked() {
        let config = AppConfig {
            channels: vec![ChannelConfig {
                index: 3,
                label: Some("Repump".to_string()),
                background: None,
                centre: None,
            }],
            ..Default::default()
        };
        let mut state = DisplayState::new(&config);

        let views = state.apply(&frame_with(5, F_450NM, 1.0));
        assert_eq!(views[3].label, "Repump");
        assert_eq!(views[5].label, "Ch 6");
        assert!(views[5].background.is_some());
    }

    #[test]
    fn test_precision_applies_to_both_lines() {
        let config = AppConfig {
            precision: 1,
            ..Default::default()
        };
        let mut state = DisplayState::new(&config);
        let views = state.apply(&frame_with(0, 400000.04, 2.26));
        assert_eq!(views[0].text, "400000.0");
        assert_eq!(views[0].power.as_deref(), Some("Power: 2.3 uW"));

        let snapshot = state.snapshot(true);
        assert!(snapshot.connected);
        assert_eq!(snapshot.precision, 1);
        assert_eq!(snapshot.channels, views);
    }

    #[test]
    fn test_missing_power_hides_power_line() {
        let frame = Frame::parse(
            "[400000, 0, 0, 0, 0, 0, 0, 0, null, 0, 0, 0, 0, 0, 0, 0]",
        )
        .unwrap();
        let mut state = DisplayState::new(&AppConfig::default());

        let views = state.apply(&frame);

        assert_eq!(views[0].text, "400000.000");
        assert_eq!(views[0].power, None);
        assert!(views[0].background.is_some());
    }

    #[test]
    fn test_exact_halves_round_up() {
        let mut state = DisplayState::new(&AppConfig::default());

        let views = state.apply(&frame_with(0, 400000.0625, 0.0625));

        assert_eq!(views[0].text, "400000.063");
        assert_eq!(views[0].power.as_deref(), Some("Power: 0.063 uW"));
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        // 0.15 is stored slightly below the half
        assert_eq!(to_fixed(0.15, 1), "0.1");
        assert_eq!(to_fixed(9.9995, 3), "9.999");
        assert_eq!(to_fixed(9.99951, 3), "10.000");
        assert_eq!(to_fixed(-0.0625, 3), "-0.063");
        assert_eq!(to_fixed(-0.0001, 3), "-0.000");
        assert_eq!(to_fixed(-0.0, 1), "0.0");
        assert_eq!(to_fixed(666666.6666666666, 3), "666666.667");
        assert_eq!(to_fixed(12.0, 2), "12.00");
    }

    #[test]
    fn test_snapshot_records_frame_time() {
        let mut state = DisplayState::new(&AppConfig::default());
        assert_eq!(state.snapshot(false).updated_at, None);

        let frame = frame_with(0, F_450NM, 1.0);
        state.apply(&frame);

        assert_eq!(state.snapshot(true).updated_at, Some(frame.received_at));
    }
}
