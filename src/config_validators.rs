// These warnings conflict with the garde validator API.
#![allow(clippy::trivially_copy_pass_by_ref, clippy::ptr_arg)]

pub fn is_set(value: &String, _: &()) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("is not set"))
    } else {
        Ok(())
    }
}

/// Surfaces the failure of a parse done while reading the raw value.
pub fn is_parsed<T>(value: &Result<T, String>, _: &()) -> garde::Result {
    match value {
        Ok(_) => Ok(()),
        Err(message) => Err(garde::Error::new(message.clone())),
    }
}

pub fn parse_api_id(value: Option<&str>) -> Result<i32, String> {
    let value = set_value(value)?;

    value
        .parse()
        .map_err(|_| format!("'{value}' is not a valid integer"))
}

/// Splits a comma-separated id list, skipping entries that are blank after
/// trimming. At least one id is required.
pub fn parse_channel_list(value: Option<&str>) -> Result<Vec<i64>, String> {
    let value = set_value(value)?;

    let ids = value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse::<i64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("'{value}' is not a comma-separated list of integers"))?;

    if ids.is_empty() {
        return Err("contains no channel ids, provide at least one".to_owned());
    }

    Ok(ids)
}

fn set_value(value: Option<&str>) -> Result<&str, String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| "is not set".to_owned())
}
