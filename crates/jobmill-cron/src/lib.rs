//! `jobmill-cron` — 5-field cron validation and next-fire projection.
//!
//! # Overview
//!
//! A [`CronExpr`] is parsed from the classic crontab shape
//! `minute hour day-of-month month day-of-week`. Parsing is strict about
//! arity and per-field bounds and reports which field is at fault, so the
//! error can be surfaced to the user who typed the expression.
//!
//! Projection ([`next_fire_time`]) evaluates the expression in the
//! process-configured [`Zone`] and returns an offset-aware UTC instant,
//! never a naive timestamp. The function is pure: identical
//! `(expr, from, zone)` inputs always produce the identical instant.
//!
//! # Field grammar
//!
//! | Field        | Range | Extras                          |
//! |--------------|-------|---------------------------------|
//! | minute       | 0-59  | `*` `a-b` `a,b,c` `*/n` `a-b/n` |
//! | hour         | 0-23  | same                            |
//! | day of month | 1-31  | same                            |
//! | month        | 1-12  | names `jan`-`dec`               |
//! | day of week  | 0-7   | names `sun`-`sat`; 0 and 7 = Sunday |
//!
//! When both day-of-month and day-of-week are restricted, a date matches if
//! *either* does — the classic Vixie cron rule.

pub mod error;
pub mod expr;
pub mod zone;

pub use error::{CronError, Result};
pub use expr::{next_fire_time, CronExpr};
pub use zone::Zone;
