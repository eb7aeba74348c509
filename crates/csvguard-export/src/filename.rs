//! Suggested download file name.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// `YYYY-MM-DD-HH-MM-users.csv` for the given moment.
pub fn default_filename<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}-users.csv", now.format("%Y-%m-%d-%H-%M"))
}
