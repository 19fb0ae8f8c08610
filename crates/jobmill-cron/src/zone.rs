use chrono::{FixedOffset, Offset, Utc};

use crate::error::{CronError, Result};

/// Process-configured evaluation zone for cron projection.
///
/// Only `UTC` and fixed `±HH:MM` offsets are supported — fixed offsets keep
/// projection deterministic (no DST transitions) and avoid a tz database
/// dependency. The original `name` string is preserved because it is written
/// verbatim into mirrored crontab definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    name: String,
    offset: FixedOffset,
}

impl Zone {
    /// Parse a zone string: `"UTC"` (case-insensitive) or `"+HH:MM"` / `"-HH:MM"`.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("utc") {
            return Ok(Self {
                name: "UTC".to_string(),
                offset: Utc.fix(),
            });
        }

        let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
            (1i32, rest)
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            (-1i32, rest)
        } else {
            return Err(CronError::Zone(name.to_string()));
        };

        let (hh, mm) = rest
            .split_once(':')
            .ok_or_else(|| CronError::Zone(name.to_string()))?;
        let hours: i32 = hh.parse().map_err(|_| CronError::Zone(name.to_string()))?;
        let minutes: i32 = mm.parse().map_err(|_| CronError::Zone(name.to_string()))?;
        if hours > 23 || minutes > 59 {
            return Err(CronError::Zone(name.to_string()));
        }

        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .ok_or_else(|| CronError::Zone(name.to_string()))?;
        Ok(Self {
            name: trimmed.to_string(),
            offset,
        })
    }

    /// The zone label as configured (written into crontab definitions).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self {
            name: "UTC".to_string(),
            offset: Utc.fix(),
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
