//! The default converter profile: calendar dates, timestamps, big integers,
//! and the comma-delimited string list.
//!
//! These are pre-registered by [`ConverterRegistry::with_defaults`] and hence
//! by `JsonMapper::default()`. The structural defaults for the same types
//! (the `BindValue` impls below) use identical text forms, so the types
//! behave the same whether or not a registry carries the profile; the
//! registrations exist so the profile participates in converter precedence
//! and freezing like any user converter.
//!
//! Formats:
//!
//! - `NaiveDate` ↔ `"2024-03-15"`
//! - `NaiveDateTime` ↔ `"2024-03-15 10:30:00"`
//! - `DateTime<Utc>` ↔ RFC 3339, `"2024-03-15T10:30:00+00:00"`
//! - `BigInt` ↔ bare decimal digits on write; digits or a quoted string on
//!   read
//! - `Vec<String>` ↔ `"a,b,c"` (exact generic registration; reading also
//!   accepts a plain JSON array)

use crate::bind::{write_json_string, BindValue};
use crate::mapper::{ReadCtx, WriteCtx};
use crate::meta::TypeKey;
use crate::reader::{JsonReader, Token};
use crate::registry::{ConverterRegistry, JsonConverter};
use crate::typeref::TypeRef;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_bigint::BigInt;
use std::fmt::Write as _;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| Error::binding(format!("invalid date `{s}`: {e}")))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map_err(|e| Error::binding(format!("invalid datetime `{s}`: {e}")))
}

fn parse_utc(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::binding(format!("invalid timestamp `{s}`: {e}")))
}

fn expect_str(r: &mut JsonReader<'_>, what: &str) -> Result<String> {
    match r.token() {
        Token::Str => Ok(r.take_string()),
        other => Err(Error::binding(format!("cannot bind {other:?} to {what}"))),
    }
}

impl BindValue for NaiveDate {
    fn type_key() -> TypeKey {
        TypeKey::of::<NaiveDate>("NaiveDate", &[])
    }

    fn write_default(&self, out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
        write_json_string(out, &self.format(DATE_FORMAT).to_string());
        Ok(())
    }

    fn read_default(r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
        parse_date(&expect_str(r, "NaiveDate")?)
    }
}

impl BindValue for NaiveDateTime {
    fn type_key() -> TypeKey {
        TypeKey::of::<NaiveDateTime>("NaiveDateTime", &[])
    }

    fn write_default(&self, out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
        write_json_string(out, &self.format(DATETIME_FORMAT).to_string());
        Ok(())
    }

    fn read_default(r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
        parse_datetime(&expect_str(r, "NaiveDateTime")?)
    }
}

impl BindValue for DateTime<Utc> {
    fn type_key() -> TypeKey {
        TypeKey::of::<DateTime<Utc>>("DateTime", &[])
    }

    fn write_default(&self, out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
        write_json_string(out, &self.to_rfc3339());
        Ok(())
    }

    fn read_default(r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
        parse_utc(&expect_str(r, "DateTime<Utc>")?)
    }
}

impl BindValue for BigInt {
    fn type_key() -> TypeKey {
        TypeKey::of::<BigInt>("BigInt", &[])
    }

    fn write_default(&self, out: &mut String, _ctx: &mut WriteCtx<'_>) -> Result<()> {
        let _ = write!(out, "{}", self);
        Ok(())
    }

    fn read_default(r: &mut JsonReader<'_>, _ctx: &mut ReadCtx<'_>) -> Result<Self> {
        match r.token() {
            Token::Num if !r.is_double() => Ok(BigInt::from(r.long_val())),
            Token::Str => {
                let s = r.take_string();
                s.parse::<BigInt>()
                    .map_err(|e| Error::binding(format!("invalid big integer `{s}`: {e}")))
            }
            other => Err(Error::binding(format!("cannot bind {other:?} to BigInt"))),
        }
    }
}

/// `NaiveDate` ↔ `"%Y-%m-%d"` string.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveDateConverter;

impl JsonConverter<NaiveDate> for NaiveDateConverter {
    fn read(
        &self,
        r: &mut JsonReader<'_>,
        _declared: &TypeKey,
        _ctx: &mut ReadCtx<'_>,
    ) -> Result<NaiveDate> {
        parse_date(&expect_str(r, "NaiveDate")?)
    }

    fn write(
        &self,
        out: &mut String,
        value: &NaiveDate,
        _declared: &TypeKey,
        _ctx: &mut WriteCtx<'_>,
    ) -> Result<()> {
        write_json_string(out, &value.format(DATE_FORMAT).to_string());
        Ok(())
    }
}

/// `NaiveDateTime` ↔ `"%Y-%m-%d %H:%M:%S"` string.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveDateTimeConverter;

impl JsonConverter<NaiveDateTime> for NaiveDateTimeConverter {
    fn read(
        &self,
        r: &mut JsonReader<'_>,
        _declared: &TypeKey,
        _ctx: &mut ReadCtx<'_>,
    ) -> Result<NaiveDateTime> {
        parse_datetime(&expect_str(r, "NaiveDateTime")?)
    }

    fn write(
        &self,
        out: &mut String,
        value: &NaiveDateTime,
        _declared: &TypeKey,
        _ctx: &mut WriteCtx<'_>,
    ) -> Result<()> {
        write_json_string(out, &value.format(DATETIME_FORMAT).to_string());
        Ok(())
    }
}

/// `DateTime<Utc>` ↔ RFC 3339 string.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcDateTimeConverter;

impl JsonConverter<DateTime<Utc>> for UtcDateTimeConverter {
    fn read(
        &self,
        r: &mut JsonReader<'_>,
        _declared: &TypeKey,
        _ctx: &mut ReadCtx<'_>,
    ) -> Result<DateTime<Utc>> {
        parse_utc(&expect_str(r, "DateTime<Utc>")?)
    }

    fn write(
        &self,
        out: &mut String,
        value: &DateTime<Utc>,
        _declared: &TypeKey,
        _ctx: &mut WriteCtx<'_>,
    ) -> Result<()> {
        write_json_string(out, &value.to_rfc3339());
        Ok(())
    }
}

/// `BigInt` ↔ bare decimal digits (write) or digits/string (read).
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntConverter;

impl JsonConverter<BigInt> for BigIntConverter {
    fn read(
        &self,
        r: &mut JsonReader<'_>,
        _declared: &TypeKey,
        _ctx: &mut ReadCtx<'_>,
    ) -> Result<BigInt> {
        match r.token() {
            Token::Num if !r.is_double() => Ok(BigInt::from(r.long_val())),
            Token::Str => {
                let s = r.take_string();
                s.parse::<BigInt>()
                    .map_err(|e| Error::binding(format!("invalid big integer `{s}`: {e}")))
            }
            other => Err(Error::binding(format!("cannot bind {other:?} to BigInt"))),
        }
    }

    fn write(
        &self,
        out: &mut String,
        value: &BigInt,
        _declared: &TypeKey,
        _ctx: &mut WriteCtx<'_>,
    ) -> Result<()> {
        let _ = write!(out, "{}", value);
        Ok(())
    }
}

/// `Vec<String>` ↔ comma-delimited string.
///
/// Registered for exactly `Vec<String>` (via [`TypeRef`]), not every `Vec<T>`.
/// Reading accepts either the delimited string or a plain JSON array of
/// strings; an empty string decodes to an empty list. Elements containing
/// commas do not survive a round trip; use a plain array for those.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvListConverter;

impl JsonConverter<Vec<String>> for CsvListConverter {
    fn read(
        &self,
        r: &mut JsonReader<'_>,
        _declared: &TypeKey,
        _ctx: &mut ReadCtx<'_>,
    ) -> Result<Vec<String>> {
        match r.token() {
            Token::Str => {
                let s = r.take_string();
                if s.is_empty() {
                    Ok(Vec::new())
                } else {
                    Ok(s.split(',').map(str::to_string).collect())
                }
            }
            Token::StartArray => {
                let mut items = Vec::new();
                loop {
                    match r.next()? {
                        Token::EndArray => return Ok(items),
                        Token::Str => items.push(r.take_string()),
                        Token::Null => {
                            return Err(Error::binding(
                                "null element in delimited string list",
                            ))
                        }
                        Token::Eof => return Err(Error::structural("unterminated array")),
                        other => {
                            return Err(Error::binding(format!(
                                "cannot bind {other:?} element to String"
                            )))
                        }
                    }
                }
            }
            other => Err(Error::binding(format!(
                "cannot bind {other:?} to delimited string list"
            ))),
        }
    }

    fn write(
        &self,
        out: &mut String,
        value: &Vec<String>,
        _declared: &TypeKey,
        _ctx: &mut WriteCtx<'_>,
    ) -> Result<()> {
        write_json_string(out, &value.join(","));
        Ok(())
    }
}

/// Installs the default profile into `registry`.
pub(crate) fn install_defaults(registry: &ConverterRegistry) -> Result<()> {
    registry.register::<NaiveDate>(NaiveDateConverter)?;
    registry.register::<NaiveDateTime>(NaiveDateTimeConverter)?;
    registry.register::<DateTime<Utc>>(UtcDateTimeConverter)?;
    registry.register::<BigInt>(BigIntConverter)?;
    registry.register_ref(&TypeRef::<Vec<String>>::new(), CsvListConverter)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonMapper;

    #[test]
    fn test_naive_date_round_trip() {
        let mapper = JsonMapper::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let text = mapper.to_json(&date).unwrap();
        assert_eq!(text, "\"2024-03-15\"");
        assert_eq!(mapper.from_json::<NaiveDate>(&text).unwrap(), date);
    }

    #[test]
    fn test_naive_datetime_round_trip() {
        let mapper = JsonMapper::default();
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let text = mapper.to_json(&dt).unwrap();
        assert_eq!(text, "\"2024-03-15 10:30:00\"");
        assert_eq!(mapper.from_json::<NaiveDateTime>(&text).unwrap(), dt);
    }

    #[test]
    fn test_utc_datetime_round_trip() {
        let mapper = JsonMapper::default();
        let dt: DateTime<Utc> = "2024-03-15T10:30:00Z".parse().unwrap();
        let text = mapper.to_json(&dt).unwrap();
        assert_eq!(mapper.from_json::<DateTime<Utc>>(&text).unwrap(), dt);
    }

    #[test]
    fn test_invalid_date_is_binding_error() {
        let mapper = JsonMapper::default();
        assert!(matches!(
            mapper.from_json::<NaiveDate>("\"15/03/2024\""),
            Err(Error::Binding { .. })
        ));
    }

    #[test]
    fn test_bigint_writes_bare_digits() {
        let mapper = JsonMapper::default();
        let n = BigInt::from(42i64);
        assert_eq!(mapper.to_json(&n).unwrap(), "42");
    }

    #[test]
    fn test_bigint_reads_string() {
        let mapper = JsonMapper::default();
        let n: BigInt = mapper
            .from_json("\"123456789012345678901234567890\"")
            .unwrap();
        assert_eq!(n.to_string(), "123456789012345678901234567890");
    }

    #[test]
    fn test_csv_list_writes_delimited_string() {
        let mapper = JsonMapper::default();
        let list = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(mapper.to_json(&list).unwrap(), "\"a,b,c\"");
    }

    #[test]
    fn test_csv_list_reads_both_forms() {
        let mapper = JsonMapper::default();
        let expected = vec!["a".to_string(), "b".to_string()];
        assert_eq!(mapper.from_json::<Vec<String>>("\"a,b\"").unwrap(), expected);
        assert_eq!(
            mapper.from_json::<Vec<String>>(r#"["a","b"]"#).unwrap(),
            expected
        );
        assert!(mapper.from_json::<Vec<String>>("\"\"").unwrap().is_empty());
    }

    #[test]
    fn test_csv_list_rejects_null_element() {
        let mapper = JsonMapper::default();
        assert!(matches!(
            mapper.from_json::<Vec<String>>(r#"["a",null]"#),
            Err(Error::Binding { .. })
        ));
    }

    #[test]
    fn test_csv_list_does_not_claim_other_vecs() {
        let mapper = JsonMapper::default();
        assert_eq!(mapper.to_json(&vec![1i64, 2]).unwrap(), "[1,2]");
    }
}
