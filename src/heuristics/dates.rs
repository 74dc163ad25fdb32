use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, TimeDelta};
use regex::Regex;

use crate::lexicon::{CompiledLexicon, RelativeDay};

/// `D.M`, `D/M`, optionally followed by a year
static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}[./]\d{1,2}(?:[./]\d{2,4})?").unwrap());

/// `<day> <month-name>`
static DAY_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\s+([A-Za-zА-Яа-яЁё]+)").unwrap());

static FOUR_DIGIT_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

/// Resolve the due date of a task from its summary and the transcript.
///
/// Scans `summary + ". " + context` (lowercased) in order for:
/// 1. A relative-day keyword ("завтра", "next week", ...)
/// 2. A numeric date (`15.03`, `15/03/2025`), parsed with the explicit templates
/// 3. A weekday name, resolved to its next occurrence after today
///
/// The first hit wins.
pub fn heuristic_due(
    summary: &str,
    context: &str,
    lexicon: &CompiledLexicon,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let text = format!("{}. {}", summary, context).to_lowercase();

    if let Some(date) = relative_day(&text, lexicon, today) {
        return Some(date);
    }

    if let Some(m) = NUMERIC_DATE.find(&text) {
        if let Some(date) = parse_explicit_date(m.as_str(), lexicon, today) {
            return Some(date);
        }
    }

    weekday_mention(&text, lexicon, today)
}

/// Relative keyword first, then weekday name. Expects lowercased text.
pub fn parse_relative_keyword(
    text: &str,
    lexicon: &CompiledLexicon,
    today: NaiveDate,
) -> Option<NaiveDate> {
    relative_day(text, lexicon, today).or_else(|| weekday_mention(text, lexicon, today))
}

/// Today plus the offset of the first relative-day keyword, in table order,
/// found in the text.
///
/// A hit that only occurs inside a longer keyword's hit does not count, so
/// "послезавтра" is not read as "завтра".
pub fn relative_day(text: &str, lexicon: &CompiledLexicon, today: NaiveDate) -> Option<NaiveDate> {
    let table = &lexicon.relative_days;
    let keyword = table
        .iter()
        .find(|r| stands_alone(text, &r.keyword, table))?;
    today.checked_add_signed(TimeDelta::try_days(keyword.days)?)
}

fn stands_alone(text: &str, keyword: &str, table: &[RelativeDay]) -> bool {
    let longer: Vec<&str> = table
        .iter()
        .map(|r| r.keyword.as_str())
        .filter(|k| k.len() > keyword.len() && k.contains(keyword))
        .collect();

    text.match_indices(keyword).any(|(start, _)| {
        !longer.iter().any(|outer| {
            outer.match_indices(keyword).any(|(offset, _)| {
                start >= offset
                    && text
                        .get(start - offset..)
                        .is_some_and(|rest| rest.starts_with(outer))
            })
        })
    })
}

/// Next occurrence of the first weekday named in the text
pub fn weekday_mention(
    text: &str,
    lexicon: &CompiledLexicon,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let form = lexicon
        .lexicon
        .weekdays
        .iter()
        .find(|w| text.contains(&w.form.to_lowercase()))?;
    next_weekday(today, form.weekday)
}

/// The next date falling on `weekday` (0 = Monday), strictly after today.
///
/// When today already is that weekday the result is a week away.
pub fn next_weekday(today: NaiveDate, weekday: u32) -> Option<NaiveDate> {
    let current = today.weekday().num_days_from_monday();
    let days_ahead = match (weekday + 7 - current) % 7 {
        0 => 7,
        n => n,
    };
    today.checked_add_days(Days::new(u64::from(days_ahead)))
}

/// Parse an explicit date.
///
/// Tries the strict templates in order (`DD.MM.YYYY`, `DD.MM.YY`,
/// `DD/MM/YYYY`, `DD/MM/YY`, `YYYY-MM-DD`); a template without a year
/// takes the current one. Otherwise looks for `<day> <month-name>`: the year
/// comes from a 4-digit number in the text or defaults to the current year,
/// and a date already past rolls over to the next year. Past dates from the
/// templates are returned as-is.
pub fn parse_explicit_date(
    text: &str,
    lexicon: &CompiledLexicon,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let cleaned = text.trim();

    for template in &lexicon.date_templates {
        if !template.shape.is_match(cleaned) {
            continue;
        }
        let parsed = if template.has_year {
            NaiveDate::parse_from_str(cleaned, &template.format)
        } else {
            NaiveDate::parse_from_str(
                &format!("{} {}", cleaned, today.year()),
                &format!("{} %Y", template.format),
            )
        };
        if let Ok(date) = parsed {
            return Some(date);
        }
    }

    for caps in DAY_MONTH.captures_iter(cleaned) {
        let Ok(day) = caps[1].parse::<u32>() else {
            continue;
        };
        let token = caps[2].to_lowercase();
        let Some(month) = lexicon
            .lexicon
            .months
            .iter()
            .find(|m| token.starts_with(&m.prefix.to_lowercase()))
            .map(|m| m.month)
        else {
            continue;
        };

        let year = FOUR_DIGIT_YEAR
            .find(cleaned)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or_else(|| today.year());

        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        if date < today {
            return NaiveDate::from_ymd_opt(year + 1, month, day);
        }
        return Some(date);
    }

    None
}
