use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Timelike, Utc};

use crate::error::{CronError, Result};
use crate::zone::Zone;

/// Projection horizon. Patterns that cannot fire within ~5 years (e.g.
/// `0 0 31 2 *`) yield `None` instead of looping forever. Five years is
/// enough to reach the rarest satisfiable pattern, Feb 29.
const HORIZON_DAYS: i64 = 366 * 5;

/// Per-field bounds and name aliases.
struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
    aliases: &'static [(&'static str, u32)],
}

const MINUTE: FieldSpec = FieldSpec {
    name: "minute",
    min: 0,
    max: 59,
    aliases: &[],
};
const HOUR: FieldSpec = FieldSpec {
    name: "hour",
    min: 0,
    max: 23,
    aliases: &[],
};
const DAY_OF_MONTH: FieldSpec = FieldSpec {
    name: "day of month",
    min: 1,
    max: 31,
    aliases: &[],
};
const MONTH: FieldSpec = FieldSpec {
    name: "month",
    min: 1,
    max: 12,
    aliases: &[
        ("jan", 1),
        ("feb", 2),
        ("mar", 3),
        ("apr", 4),
        ("may", 5),
        ("jun", 6),
        ("jul", 7),
        ("aug", 8),
        ("sep", 9),
        ("oct", 10),
        ("nov", 11),
        ("dec", 12),
    ],
};
// 0 and 7 both mean Sunday; values are normalised to 0-6 at parse time.
const DAY_OF_WEEK: FieldSpec = FieldSpec {
    name: "day of week",
    min: 0,
    max: 7,
    aliases: &[
        ("sun", 0),
        ("mon", 1),
        ("tue", 2),
        ("wed", 3),
        ("thu", 4),
        ("fri", 5),
        ("sat", 6),
    ],
};

/// One comma-separated item of a parsed field.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldPart {
    /// `start..=end` stepping by `step`. `*` is `min..=max` step 1.
    Stride { start: u32, end: u32, step: u32 },
    Value(u32),
}

impl FieldPart {
    fn matches(&self, value: u32) -> bool {
        match self {
            Self::Stride { start, end, step } => {
                value >= *start && value <= *end && (value - start) % step == 0
            }
            Self::Value(v) => *v == value,
        }
    }
}

#[derive(Debug, Clone)]
struct CronField {
    parts: Vec<FieldPart>,
    /// False only for a bare `*`. Drives the Vixie day-of-month/day-of-week
    /// rule: the union applies when both day fields are restricted.
    restricted: bool,
}

impl CronField {
    fn matches(&self, value: u32) -> bool {
        self.parts.iter().any(|p| p.matches(value))
    }
}

/// A validated 5-field cron expression.
#[derive(Debug, Clone)]
pub struct CronExpr {
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
    raw: [String; 5],
}

impl CronExpr {
    /// Parse and validate `minute hour day-of-month month day-of-week`.
    ///
    /// Blank input and any arity other than 5 are rejected before per-field
    /// parsing; field errors name the offending field.
    pub fn parse(expr: &str) -> Result<Self> {
        if expr.trim().is_empty() {
            return Err(CronError::Empty);
        }
        let tokens: Vec<&str> = expr.split_whitespace().collect();
        if tokens.len() != 5 {
            return Err(CronError::FieldCount {
                found: tokens.len(),
            });
        }

        Ok(Self {
            minute: parse_field(tokens[0], &MINUTE)?,
            hour: parse_field(tokens[1], &HOUR)?,
            day_of_month: parse_field(tokens[2], &DAY_OF_MONTH)?,
            month: parse_field(tokens[3], &MONTH)?,
            day_of_week: parse_field(tokens[4], &DAY_OF_WEEK)?,
            raw: [
                tokens[0].to_string(),
                tokens[1].to_string(),
                tokens[2].to_string(),
                tokens[3].to_string(),
                tokens[4].to_string(),
            ],
        })
    }

    /// The raw field strings in crontab order, for mirroring into an
    /// external crontab definition.
    pub fn fields(&self) -> &[String; 5] {
        &self.raw
    }

    /// True when the expression matches the wall-clock minute of `t`.
    fn matches_local(&self, t: &DateTime<FixedOffset>) -> bool {
        self.minute.matches(t.minute())
            && self.hour.matches(t.hour())
            && self.month.matches(t.month())
            && self.date_matches(t)
    }

    /// Vixie day rule: when both day fields are restricted, either may
    /// match; otherwise both must.
    fn date_matches(&self, t: &DateTime<FixedOffset>) -> bool {
        let dom_ok = self.day_of_month.matches(t.day());
        let dow_ok = self.day_of_week.matches(t.weekday().num_days_from_sunday());
        if self.day_of_month.restricted && self.day_of_week.restricted {
            dom_ok || dow_ok
        } else {
            dom_ok && dow_ok
        }
    }
}

impl std::fmt::Display for CronExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw.join(" "))
    }
}

impl std::str::FromStr for CronExpr {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// First fire time strictly after `from`, evaluated in `zone`, returned as
/// an offset-aware UTC instant.
///
/// Pure and deterministic for identical `(expr, from, zone)` input. Returns
/// `None` when no fire time exists within the search horizon.
pub fn next_fire_time(expr: &CronExpr, from: DateTime<Utc>, zone: &Zone) -> Option<DateTime<Utc>> {
    let offset = zone.offset();
    let local = from.with_timezone(&offset);

    // Truncate to the whole minute, then step one forward so the result is
    // strictly after `from`.
    let mut t = offset
        .with_ymd_and_hms(
            local.year(),
            local.month(),
            local.day(),
            local.hour(),
            local.minute(),
            0,
        )
        .single()?
        + Duration::minutes(1);
    let horizon = t + Duration::days(HORIZON_DAYS);

    // Skip whole months/days/hours that cannot match instead of scanning
    // minute by minute.
    while t <= horizon {
        if !expr.month.matches(t.month()) {
            t = start_of_next_month(&t)?;
            continue;
        }
        if !expr.date_matches(&t) {
            t = start_of_next_day(&t)?;
            continue;
        }
        if !expr.hour.matches(t.hour()) {
            t = start_of_next_hour(&t)?;
            continue;
        }
        if !expr.minute.matches(t.minute()) {
            t = t + Duration::minutes(1);
            continue;
        }
        return Some(t.with_timezone(&Utc));
    }
    None
}

fn start_of_next_month(t: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let (year, month) = if t.month() == 12 {
        (t.year() + 1, 1)
    } else {
        (t.year(), t.month() + 1)
    };
    t.timezone().with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

fn start_of_next_day(t: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let next = t.date_naive().succ_opt()?.and_hms_opt(0, 0, 0)?;
    t.timezone().from_local_datetime(&next).single()
}

fn start_of_next_hour(t: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let this_hour = t
        .timezone()
        .with_ymd_and_hms(t.year(), t.month(), t.day(), t.hour(), 0, 0)
        .single()?;
    Some(this_hour + Duration::hours(1))
}

fn parse_field(raw: &str, spec: &FieldSpec) -> Result<CronField> {
    let mut parts = Vec::new();
    for item in raw.split(',') {
        parts.push(parse_item(item, spec)?);
    }
    let mut field = CronField {
        parts,
        restricted: raw != "*",
    };
    if spec.name == DAY_OF_WEEK.name {
        normalise_sunday(&mut field);
    }
    Ok(field)
}

/// Parse one item: `*`, `*/n`, `a`, `a/n`, `a-b`, or `a-b/n`.
fn parse_item(item: &str, spec: &FieldSpec) -> Result<FieldPart> {
    let fail = |reason: String| CronError::Field {
        field: spec.name,
        reason,
    };
    if item.is_empty() {
        return Err(fail("empty item".to_string()));
    }

    let (body, step) = match item.split_once('/') {
        Some((body, step_str)) => {
            let step: u32 = step_str
                .parse()
                .map_err(|_| fail(format!("bad step '{step_str}'")))?;
            if step == 0 {
                return Err(fail("step must be at least 1".to_string()));
            }
            (body, Some(step))
        }
        None => (item, None),
    };

    if body == "*" {
        return Ok(FieldPart::Stride {
            start: spec.min,
            end: spec.max,
            step: step.unwrap_or(1),
        });
    }

    if let Some((lo, hi)) = body.split_once('-') {
        let start = resolve_value(lo, spec)?;
        let end = resolve_value(hi, spec)?;
        if start > end {
            return Err(fail(format!("range {start}-{end} is inverted")));
        }
        return Ok(FieldPart::Stride {
            start,
            end,
            step: step.unwrap_or(1),
        });
    }

    let value = resolve_value(body, spec)?;
    match step {
        // `5/15` means: start at 5, step 15 to the field maximum.
        Some(step) => Ok(FieldPart::Stride {
            start: value,
            end: spec.max,
            step,
        }),
        None => Ok(FieldPart::Value(value)),
    }
}

/// Resolve a single token to a numeric value: name alias first, then a
/// bounds-checked number.
fn resolve_value(token: &str, spec: &FieldSpec) -> Result<u32> {
    let lowered = token.to_ascii_lowercase();
    if let Some((_, v)) = spec.aliases.iter().find(|(name, _)| *name == lowered) {
        return Ok(*v);
    }
    let value: u32 = token.parse().map_err(|_| CronError::Field {
        field: spec.name,
        reason: format!("'{token}' is not a number"),
    })?;
    if value < spec.min || value > spec.max {
        return Err(CronError::Field {
            field: spec.name,
            reason: format!("value {} out of range {}-{}", value, spec.min, spec.max),
        });
    }
    Ok(value)
}

/// Fold 7 into 0 so the match side only ever sees Sunday as 0.
/// A stride ending at 7 (e.g. `5-7`) additionally covers Sunday.
fn normalise_sunday(field: &mut CronField) {
    let mut covers_sunday = false;
    for part in &mut field.parts {
        match part {
            FieldPart::Value(v) if *v == 7 => *v = 0,
            FieldPart::Stride { start, end, step } => {
                if *end == 7 {
                    // Only flag Sunday when the stride actually reaches 7.
                    if (7 - *start) % *step == 0 {
                        covers_sunday = true;
                    }
                    *end = 6;
                }
                if *start == 7 {
                    *start = 0;
                    *end = 0;
                }
            }
            _ => {}
        }
    }
    if covers_sunday {
        field.parts.push(FieldPart::Value(0));
    }
}
