//! Mapping of bill JSON objects to flat records.
//!
//! Lookups are direct: a missing key is an error, a `null` value is not.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::error::{HarvesterError, Result};
use crate::types::{ActionRecord, BillRecord, IntroducedDate, IntroducedDateMode};

/// Extract general bill information.
///
/// # Arguments
/// * `bill` - One element of the response `results` array
/// * `mode` - How to interpret `introduced_date`
pub fn parse_general(bill: &Value, mode: IntroducedDateMode) -> Result<BillRecord> {
    let context = bill_context(bill);
    let get = |key: &str| field(bill, key, &context);

    let introduced_raw = get("introduced_date")?;
    let introduced_str = introduced_raw
        .as_str()
        .ok_or_else(|| invalid("introduced_date", &context, "a date string"))?;

    Ok(BillRecord {
        bill_type: text(get("bill_type")?),
        bill_id: required_text(get("bill_id")?, "bill_id", &context)?,
        session: text(get("congress")?),
        short_title: text(get("short_title")?),
        official_title: text(get("title")?),
        passed_house: !get("house_passage")?.is_null(),
        passed_senate: !get("senate_passage")?.is_null(),
        introduced: parse_introduced(introduced_str, mode)?,
        top_subject: text(get("primary_subject")?),
    })
}

/// Extract the bill's actions, earliest first.
///
/// The API lists actions newest first; the returned order is reversed.
pub fn parse_actions(bill: &Value) -> Result<Vec<ActionRecord>> {
    let context = bill_context(bill);
    let bill_id = required_text(field(bill, "bill_id", &context)?, "bill_id", &context)?;

    let actions = field(bill, "actions", &context)?
        .as_array()
        .ok_or_else(|| invalid("actions", &context, "an array"))?;

    let mut records = Vec::with_capacity(actions.len());
    for action in actions {
        let action_context = format!("action of {context}");
        let get = |key: &str| field(action, key, &action_context);

        let datetime = get("datetime")?
            .as_str()
            .ok_or_else(|| invalid("datetime", &action_context, "a date string"))?;
        let (date, time) = split_datetime(datetime)?;

        records.push(ActionRecord {
            bill_id: bill_id.clone(),
            action_id: text(get("id")?),
            date,
            time,
            action_type: text(get("action_type")?),
            action_text: text(get("description")?),
        });
    }

    records.reverse();
    Ok(records)
}

/// Split an action timestamp into its date and optional time of day.
///
/// The first 10 characters are the date (`%Y-%m-%d`). Characters 11..19 are
/// the time (`%H:%M:%S`) and are only read when the string is longer than 10.
pub fn split_datetime(value: &str) -> Result<(NaiveDate, Option<NaiveTime>)> {
    let malformed = || HarvesterError::MalformedDate {
        field: "datetime".to_string(),
        value: value.to_string(),
    };

    let date_part = value.get(..10).ok_or_else(malformed)?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| malformed())?;

    if value.len() <= 10 {
        return Ok((date, None));
    }

    let time_part = value.get(11..19).ok_or_else(malformed)?;
    let time = NaiveTime::parse_from_str(time_part, "%H:%M:%S").map_err(|_| malformed())?;
    Ok((date, Some(time)))
}

/// Parse `introduced_date` according to `mode`.
pub fn parse_introduced(value: &str, mode: IntroducedDateMode) -> Result<IntroducedDate> {
    let malformed = || HarvesterError::MalformedDate {
        field: "introduced_date".to_string(),
        value: value.to_string(),
    };

    match mode {
        IntroducedDateMode::Calendar => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(IntroducedDate::Date)
            .map_err(|_| malformed()),
        IntroducedDateMode::Legacy => parse_legacy_introduced(value)
            .map(IntroducedDate::Legacy)
            .ok_or_else(malformed),
    }
}

/// Read `YYYY-NN-DD` with the middle component as minutes past midnight on
/// day `DD` of January.
fn parse_legacy_introduced(value: &str) -> Option<NaiveDateTime> {
    let mut parts = value.split('-');
    let (year, minute, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() != 4 || minute.len() > 2 || day.len() > 2 {
        return None;
    }

    let year: i32 = year.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    let day: u32 = day.parse().ok()?;

    NaiveDate::from_ymd_opt(year, 1, day)?.and_hms_opt(0, minute, 0)
}

fn bill_context(bill: &Value) -> String {
    match bill.get("bill_id").and_then(Value::as_str) {
        Some(id) => format!("bill {id}"),
        None => "bill".to_string(),
    }
}

fn field<'a>(obj: &'a Value, key: &str, context: &str) -> Result<&'a Value> {
    obj.get(key).ok_or_else(|| HarvesterError::MissingField {
        field: key.to_string(),
        context: context.to_string(),
    })
}

fn invalid(field: &str, context: &str, expected: &str) -> HarvesterError {
    HarvesterError::InvalidField {
        field: field.to_string(),
        context: context.to_string(),
        expected: expected.to_string(),
    }
}

/// Render a scalar as cell text; `null` becomes `None`.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn required_text(value: &Value, field: &str, context: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(field, context, "a string"))
}
