// THEORY:
// The `settings` module is the boundary with the persistence collaborator. The
// persisted state is a flat text record of `key:value` lines - nothing more -
// and this module is the only code that knows those key names. It converts
// the record into the typed configuration the pipeline and game consume, and
// folds a finished round's score back into it.
//
// Reading and writing the file itself stays outside the crate; this module
// only parses and renders the text.

use anyhow::{Context, Result};

use crate::core_modules::color_spec::ColorSpec;

/// The persisted key:value record.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Audio volume in [0, 1]; carried for the audio collaborator, unused here.
    pub volume: f64,
    /// Hue tolerance (half-width of every channel's hue band).
    pub sens: u16,
    pub min_v: u8,
    pub max_v: u8,
    pub min_s: u8,
    pub max_s: u8,
    pub high_score: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            sens: 10,
            min_v: 100,
            max_v: 255,
            min_s: 100,
            max_s: 255,
            high_score: 0,
        }
    }
}

impl Settings {
    /// Parses a `key:value`-per-line record. Missing keys keep their
    /// defaults; unknown keys are logged and ignored; a malformed value for a
    /// known key is an error.
    pub fn parse(text: &str) -> Result<Settings> {
        let mut settings = Settings::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                log::warn!("settings line without ':' ignored: {:?}", line);
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            let parse_err = || format!("bad value for settings key {:?}: {:?}", key, value);
            match key {
                "volume" => settings.volume = value.parse().with_context(parse_err)?,
                "sens" => settings.sens = value.parse().with_context(parse_err)?,
                "min_v" => settings.min_v = value.parse().with_context(parse_err)?,
                "max_v" => settings.max_v = value.parse().with_context(parse_err)?,
                "min_s" => settings.min_s = value.parse().with_context(parse_err)?,
                "max_s" => settings.max_s = value.parse().with_context(parse_err)?,
                "high_score" => settings.high_score = value.parse().with_context(parse_err)?,
                _ => log::warn!("unknown settings key ignored: {:?}", key),
            }
        }

        Ok(settings)
    }

    /// Renders the record back to `key:value` lines.
    pub fn render(&self) -> String {
        format!(
            "volume:{}\nsens:{}\nmin_v:{}\nmax_v:{}\nmin_s:{}\nmax_s:{}\nhigh_score:{}\n",
            self.volume, self.sens, self.min_v, self.max_v, self.min_s, self.max_s, self.high_score
        )
    }

    /// The tracked color channels this record describes: the red/green/blue
    /// marker set sharing this record's tolerance and saturation/value bounds.
    pub fn channels(&self) -> Vec<ColorSpec> {
        ColorSpec::default_channels(self.sens, self.min_s, self.max_s, self.min_v, self.max_v)
    }

    /// Folds a finished round's score in. Returns true when it is a new high.
    pub fn record_score(&mut self, score: u32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }
}
